// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod session;

pub use error::{ApiError, ApiResult};
pub use session::{Session, SessionStore, APP_NAME};

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use url::Url;

use prospect_app::{
    AuthRole, CallLog, CallLogDraft, ConversionRequest, Customer, CustomerId, DashboardCounts,
    Employee, Lead, LeadDraft, LeadId, Note, NoteDraft, NoteId, NoteLocation, Opportunity,
    OpportunityDraft, OpportunityId, ResolvedTicket,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking REST client for the CRM backend. One attempt per request --
/// no retry, no backoff; callers surface the classified error and wait
/// for a manual refresh.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: HttpClient,
    sessions: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, sessions: SessionStore) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("api.base_url {base_url:?} must use http or https");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            http,
            sessions,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn active_session(&self) -> Option<Session> {
        self.sessions.load().ok().flatten()
    }

    // -- leads ------------------------------------------------------------

    pub fn list_leads(&self) -> ApiResult<Vec<Lead>> {
        self.get_json("/leads", "lead list")
    }

    pub fn get_lead(&self, id: LeadId) -> ApiResult<Lead> {
        self.get_json(&format!("/leads/{}", id.get()), "lead")
    }

    pub fn create_lead(&self, draft: &LeadDraft) -> ApiResult<Lead> {
        self.send_json(Method::POST, "/leads", draft, "created lead")
    }

    pub fn update_lead(&self, id: LeadId, draft: &LeadDraft) -> ApiResult<Lead> {
        self.send_json(
            Method::PUT,
            &format!("/leads/{}", id.get()),
            draft,
            "updated lead",
        )
    }

    pub fn delete_lead(&self, id: LeadId) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("/leads/{}", id.get()))
    }

    pub fn recycle_bin_leads(&self) -> ApiResult<Vec<Lead>> {
        self.get_json("/leads/recycle-bin", "recycled lead list")
    }

    pub fn restore_lead(&self, id: LeadId) -> ApiResult<()> {
        self.send_empty(Method::PUT, &format!("/leads/restore/{}", id.get()))
    }

    pub fn purge_lead(&self, id: LeadId) -> ApiResult<()> {
        self.send_empty(
            Method::DELETE,
            &format!("/leads/delete-permanent/{}", id.get()),
        )
    }

    pub fn lead_count(&self) -> ApiResult<i64> {
        self.get_json("/leads/count", "lead count")
    }

    // -- opportunities ----------------------------------------------------

    pub fn list_opportunities(&self) -> ApiResult<Vec<Opportunity>> {
        self.get_json("/opportunities", "opportunity list")
    }

    pub fn create_opportunity(&self, draft: &OpportunityDraft) -> ApiResult<Opportunity> {
        self.send_json(Method::POST, "/opportunities", draft, "created opportunity")
    }

    pub fn update_opportunity(
        &self,
        id: OpportunityId,
        draft: &OpportunityDraft,
    ) -> ApiResult<Opportunity> {
        self.send_json(
            Method::PUT,
            &format!("/opportunities/{}", id.get()),
            draft,
            "updated opportunity",
        )
    }

    pub fn delete_opportunity(&self, id: OpportunityId) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("/opportunities/{}", id.get()))
    }

    pub fn recycle_bin_opportunities(&self) -> ApiResult<Vec<Opportunity>> {
        self.get_json("/opportunities/recycle-bin", "recycled opportunity list")
    }

    pub fn restore_opportunity(&self, id: OpportunityId) -> ApiResult<()> {
        self.send_empty(Method::PUT, &format!("/opportunities/restore/{}", id.get()))
    }

    pub fn purge_opportunity(&self, id: OpportunityId) -> ApiResult<()> {
        self.send_empty(
            Method::DELETE,
            &format!("/opportunities/delete-permanent/{}", id.get()),
        )
    }

    /// Promotes a lead; the backend removes the lead from the active
    /// list and answers with the created opportunity.
    pub fn convert_lead(&self, request: &ConversionRequest) -> ApiResult<Opportunity> {
        self.send_json(
            Method::POST,
            &format!("/opportunities/from-lead/{}", request.lead_id.get()),
            request,
            "converted opportunity",
        )
    }

    pub fn opportunity_count(&self) -> ApiResult<i64> {
        self.get_json("/opportunities/count", "opportunity count")
    }

    // -- customers / employees / tickets ----------------------------------

    pub fn list_customers(&self) -> ApiResult<Vec<Customer>> {
        self.get_json("/customers", "customer list")
    }

    pub fn delete_customer(&self, id: CustomerId) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("/customers/{}", id.get()))
    }

    pub fn customer_count(&self) -> ApiResult<i64> {
        self.get_json("/customers/count", "customer count")
    }

    pub fn list_employees(&self) -> ApiResult<Vec<Employee>> {
        self.get_json("/employees", "employee list")
    }

    pub fn employee_names(&self) -> ApiResult<Vec<String>> {
        self.get_json("/employees/names", "employee name list")
    }

    pub fn list_resolved_tickets(&self) -> ApiResult<Vec<ResolvedTicket>> {
        self.get_json("/resolved-tickets", "resolved ticket list")
    }

    pub fn ticket_count(&self) -> ApiResult<i64> {
        self.get_json("/resolved-tickets/count", "resolved ticket count")
    }

    // -- call logs / notes ------------------------------------------------

    pub fn list_call_logs(&self) -> ApiResult<Vec<CallLog>> {
        self.get_json("/call-logs", "call log list")
    }

    /// The backend keys call logs by customer name; the browser client
    /// fetched the whole collection and narrowed it locally, and this
    /// does the same.
    pub fn call_logs_for_customer(&self, customer_name: &str) -> ApiResult<Vec<CallLog>> {
        let needle = customer_name.to_lowercase();
        let mut logs = self.list_call_logs()?;
        logs.retain(|log| log.customer_name.to_lowercase() == needle);
        Ok(logs)
    }

    pub fn create_call_log(&self, draft: &CallLogDraft) -> ApiResult<CallLog> {
        self.send_json(Method::POST, "/call-logs", draft, "created call log")
    }

    pub fn update_call_log(&self, id: i64, draft: &CallLogDraft) -> ApiResult<CallLog> {
        self.send_json(
            Method::PUT,
            &format!("/call-logs/{id}"),
            draft,
            "updated call log",
        )
    }

    pub fn delete_call_log(&self, id: i64) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("/call-logs/{id}"))
    }

    pub fn notes_for(&self, location: NoteLocation, id: i64) -> ApiResult<Vec<Note>> {
        self.get_json(&format!("/notes/{}/{id}", location.as_str()), "note list")
    }

    pub fn create_note(&self, draft: &NoteDraft) -> ApiResult<Note> {
        self.send_json(Method::POST, "/notes", draft, "created note")
    }

    pub fn update_note(&self, id: NoteId, draft: &NoteDraft) -> ApiResult<Note> {
        self.send_json(
            Method::PUT,
            &format!("/notes/{}", id.get()),
            draft,
            "updated note",
        )
    }

    pub fn delete_note(&self, id: NoteId) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("/notes/{}", id.get()))
    }

    // -- auth / health / dashboard ----------------------------------------

    /// Authenticates against the role's login route and persists the
    /// session on success. Credential failures map to `LoginRejected`
    /// rather than the session-expiry path.
    pub fn login(&self, role: AuthRole, email: &str, password: &str) -> ApiResult<Session> {
        let body = LoginBody { email, password };
        let request = self
            .http
            .request(
                Method::POST,
                format!("{}/auth/login/{}", self.base_url, role.as_str()),
            )
            .json(&body);

        let response = request.send().map_err(|_| ApiError::NetworkUnavailable {
            base_url: self.base_url.clone(),
        })?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST
        ) {
            return Err(ApiError::LoginRejected);
        }
        if status.is_server_error() {
            return Err(ApiError::ServerError {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(error::rejected(status.as_u16(), &body));
        }

        let parsed: LoginResponse = decode_body(response, "login", &self.base_url)?;
        if !parsed.is_authenticated {
            return Err(ApiError::LoginRejected);
        }
        let Some(token) = parsed.token.filter(|token| !token.is_empty()) else {
            return Err(ApiError::LoginRejected);
        };

        let session = Session {
            role,
            token,
            expires_at: parsed
                .expires_at
                .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok()),
        };
        self.sessions.save(&session).map_err(|_| ApiError::Rejected {
            status: 0,
            message: "session could not be persisted".to_owned(),
        })?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.sessions.clear()
    }

    pub fn health(&self) -> bool {
        self.send(self.request(Method::GET, "/health")).is_ok()
    }

    /// Dashboard stats: four independent count fetches fanned out
    /// concurrently and joined when all complete. An individual failure
    /// contributes zero instead of failing the whole join.
    pub fn dashboard_counts(&self) -> DashboardCounts {
        thread::scope(|scope| {
            let leads = scope.spawn(|| self.lead_count().unwrap_or(0));
            let opportunities = scope.spawn(|| self.opportunity_count().unwrap_or(0));
            let customers = scope.spawn(|| self.customer_count().unwrap_or(0));
            let tickets = scope.spawn(|| self.ticket_count().unwrap_or(0));
            DashboardCounts {
                leads: leads.join().unwrap_or(0),
                opportunities: opportunities.join().unwrap_or(0),
                customers: customers.join().unwrap_or(0),
                tickets: tickets.join().unwrap_or(0),
            }
        })
    }

    // -- plumbing ---------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url));
        if let Ok(Some(session)) = self.sessions.load() {
            builder = builder.bearer_auth(session.token);
        }
        builder
    }

    /// Sends one request and classifies the outcome. A 401 clears the
    /// stored session before surfacing `Unauthorized`.
    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().map_err(|_| ApiError::NetworkUnavailable {
            base_url: self.base_url.clone(),
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let _ = self.sessions.clear();
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::Forbidden);
        }
        if status.is_server_error() {
            return Err(ApiError::ServerError {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(error::rejected(status.as_u16(), &body));
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &'static str) -> ApiResult<T> {
        let response = self.send(self.request(Method::GET, path))?;
        decode_body(response, what, &self.base_url)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        what: &'static str,
    ) -> ApiResult<T> {
        let response = self.send(self.request(method, path).json(body))?;
        decode_body(response, what, &self.base_url)
    }

    fn send_empty(&self, method: Method, path: &str) -> ApiResult<()> {
        self.send(self.request(method, path)).map(|_| ())
    }
}

fn decode_body<T: DeserializeOwned>(
    response: Response,
    what: &'static str,
    base_url: &str,
) -> ApiResult<T> {
    let body = response.text().map_err(|_| ApiError::NetworkUnavailable {
        base_url: base_url.to_owned(),
    })?;
    serde_json::from_str(&body).map_err(|source| ApiError::Decode { what, source })
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    is_authenticated: bool,
    token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}
