// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{anyhow, Context, Result};
use prospect_app::AuthRole;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

pub const APP_NAME: &str = "prospect";

/// The one process-wide session: a single typed record instead of the
/// browser front end's four parallel storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: AuthRole,
    pub token: String,
    #[serde(default, with = "time::serde::timestamp::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl Session {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// File-backed session storage with an explicit load/save/clear
/// lifecycle. Legacy files written by the browser client (one JSON
/// object holding `adminAuth`/`employeeAuth`/`customerAuth`/`authToken`
/// entries) are resolved into the typed form on load.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("PROSPECT_SESSION_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set PROSPECT_SESSION_PATH to the session file")
        })?;
        Ok(config_root.join(APP_NAME).join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session, or `None` when no usable session
    /// exists. Expired sessions are cleared on sight.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read session file {}", self.path.display()))?;

        let session = match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(_) => serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|value| resolve_legacy(&value)),
        };

        let Some(session) = session else {
            return Ok(None);
        };

        if session.is_expired(OffsetDateTime::now_utc()) {
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create session directory {}", parent.display()))?;
        }
        let encoded = serde_json::to_string_pretty(session).context("encode session")?;
        fs::write(&self.path, encoded)
            .with_context(|| format!("write session file {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove session file {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Resolves a legacy multi-key auth blob into one session, in the
/// browser client's priority order: admin, then employee, then customer,
/// then the bare `authToken` fallback (which carried no role and is
/// treated as an employee session).
fn resolve_legacy(value: &serde_json::Value) -> Option<Session> {
    const TYPED_KEYS: [(&str, AuthRole); 3] = [
        ("adminAuth", AuthRole::Admin),
        ("employeeAuth", AuthRole::Employee),
        ("customerAuth", AuthRole::Customer),
    ];

    for (key, role) in TYPED_KEYS {
        if let Some(entry) = value.get(key)
            && let Some(token) = entry.get("token").and_then(serde_json::Value::as_str)
            && !token.is_empty()
        {
            return Some(Session {
                role,
                token: token.to_owned(),
                expires_at: None,
            });
        }
    }

    let token = value.get("authToken")?.as_str()?;
    if token.is_empty() {
        return None;
    }
    Some(Session {
        role: AuthRole::Employee,
        token: token.to_owned(),
        expires_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve_legacy, Session, SessionStore};
    use anyhow::Result;
    use prospect_app::AuthRole;
    use time::{Duration, OffsetDateTime};

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at(dir.path().join("session.json"))
    }

    #[test]
    fn save_load_clear_round_trip() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let store = store_in(&temp);
        assert!(store.load()?.is_none());

        let session = Session {
            role: AuthRole::Admin,
            token: "tok-123".to_owned(),
            expires_at: None,
        };
        store.save(&session)?;
        assert_eq!(store.load()?, Some(session));

        store.clear()?;
        assert!(store.load()?.is_none());
        Ok(())
    }

    #[test]
    fn expired_session_is_cleared_on_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let store = store_in(&temp);
        store.save(&Session {
            role: AuthRole::Employee,
            token: "tok".to_owned(),
            expires_at: Some(OffsetDateTime::now_utc() - Duration::hours(1)),
        })?;

        assert!(store.load()?.is_none());
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn future_expiry_still_loads() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let store = store_in(&temp);
        let session = Session {
            role: AuthRole::Customer,
            token: "tok".to_owned(),
            expires_at: Some(OffsetDateTime::now_utc() + Duration::hours(8)),
        };
        store.save(&session)?;
        assert_eq!(store.load()?, Some(session));
        Ok(())
    }

    #[test]
    fn legacy_resolution_prefers_admin_over_other_keys() {
        let value = serde_json::json!({
            "customerAuth": {"token": "cust", "isAuthenticated": true},
            "adminAuth": {"token": "adm", "isAuthenticated": true},
            "employeeAuth": {"token": "emp", "isAuthenticated": true},
            "authToken": "bare",
        });
        let session = resolve_legacy(&value).expect("session from legacy blob");
        assert_eq!(session.role, AuthRole::Admin);
        assert_eq!(session.token, "adm");
    }

    #[test]
    fn legacy_bare_token_is_the_last_resort() {
        let value = serde_json::json!({ "authToken": "bare" });
        let session = resolve_legacy(&value).expect("session from bare token");
        assert_eq!(session.role, AuthRole::Employee);
        assert_eq!(session.token, "bare");

        assert!(resolve_legacy(&serde_json::json!({})).is_none());
        assert!(resolve_legacy(&serde_json::json!({"authToken": ""})).is_none());
    }

    #[test]
    fn legacy_file_loads_through_the_store() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let store = store_in(&temp);
        std::fs::write(
            store.path(),
            r#"{"employeeAuth":{"token":"emp-9","isAuthenticated":true}}"#,
        )?;

        let session = store.load()?.expect("legacy session resolves");
        assert_eq!(session.role, AuthRole::Employee);
        assert_eq!(session.token, "emp-9");
        Ok(())
    }
}
