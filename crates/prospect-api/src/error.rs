// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use thiserror::Error;

/// Classified request failures. Callers turn these into one short
/// status-line message; nothing here retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend server is not available -- check that the server at {base_url} is running")]
    NetworkUnavailable { base_url: String },

    #[error("session expired -- log in again with `prospect --login <role>`")]
    Unauthorized,

    #[error("access denied -- this account does not have permission for that action")]
    Forbidden,

    #[error("server error ({status}) -- try again later")]
    ServerError { status: u16 },

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("login rejected -- check the email and password and retry")]
    LoginRejected,

    #[error("decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

/// Builds the `Rejected` variant for a non-2xx status that is not one of
/// the specially-classified codes, preferring the server's own message
/// when the body carries one.
pub(crate) fn rejected(status: u16, body: &str) -> ApiError {
    if let Ok(envelope) = serde_json::from_str::<MessageEnvelope>(body)
        && let Some(message) = envelope.message
        && !message.is_empty()
    {
        return ApiError::Rejected { status, message };
    }

    if !body.is_empty() && body.len() < 200 && !body.contains('{') {
        return ApiError::Rejected {
            status,
            message: body.to_owned(),
        };
    }

    ApiError::Rejected {
        status,
        message: "request failed".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{rejected, ApiError};

    #[test]
    fn rejected_prefers_the_server_message_envelope() {
        let error = rejected(400, r#"{"message":"email already registered"}"#);
        assert!(error.to_string().contains("email already registered"));
    }

    #[test]
    fn rejected_uses_short_plain_bodies() {
        let error = rejected(404, "lead not found");
        assert!(error.to_string().contains("lead not found"));
    }

    #[test]
    fn rejected_falls_back_for_opaque_bodies() {
        let error = rejected(418, r#"{"unexpected":"shape"}"#);
        assert_eq!(error.to_string(), "request rejected (418): request failed");
    }

    #[test]
    fn unavailable_message_names_the_base_url() {
        let error = ApiError::NetworkUnavailable {
            base_url: "http://localhost:8080/api".to_owned(),
        };
        let message = error.to_string();
        assert!(message.contains("not available"));
        assert!(message.contains("http://localhost:8080/api"));
    }
}
