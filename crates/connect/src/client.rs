//! HTTP client for the Sayho REST API.
//!
//! Every shell talks to the backend through this client. Requests made on
//! behalf of the active session carry its bearer token; a 401 on any of them
//! is reported to the [`SessionContext`], which signs the user out once and
//! notifies the registered listener.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use sayho_core::errors::{Error, Result, ValidationError};
use sayho_core::funds::{
    FundCategory, FundCategoryUpdate, FundSnapshot, FundSnapshotUpdate, NewFundCategory,
    NewFundSnapshot,
};
use sayho_core::goals::{Goal, NewGoal, NewTransaction, Transaction};
use sayho_core::users::{AccessToken, NewUser, PasswordUpdate, User, UserUpdate};

use crate::session::SessionContext;
use crate::traits::{AuthApi, FinanceApi};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of a locally running backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Longest slice of a non-JSON error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the Sayho backend.
///
/// # Example
///
/// ```ignore
/// let context = Arc::new(SessionContext::new(token_store));
/// let client = ApiClient::new(&ApiClientConfig::default(), context)?;
/// let goals = client.list_goals().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Create a new API client bound to `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &ApiClientConfig, session: Arc<SessionContext>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ApiClient] {} {}", method, url);
        self.client.request(method, url)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| Error::NetworkOrServer(format!("Request failed: {}", e)))
    }

    /// Sends `request` with the active session's token.
    ///
    /// A 401 clears the session (once per token) and yields `SessionExpired`.
    async fn execute_authorized(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.session.bearer_token().ok_or(Error::SessionExpired)?;
        let response = Self::send(request.bearer_auth(&token)).await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized(&token);
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(error_from_response(status, &body));
        }
        Ok(response)
    }

    /// Sends `request` with an explicit token, outside the session's
    /// interception path.
    async fn execute_with_token(&self, request: RequestBuilder, token: &str) -> Result<Response> {
        let response = Self::send(request.bearer_auth(token)).await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(error_from_response(status, &body));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute_authorized(self.request(Method::GET, path)).await?;
        parse_json(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute_authorized(self.request(method, path).json(body))
            .await?;
        parse_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.execute_authorized(self.request(Method::DELETE, path))
            .await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Goal Endpoints
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn get_goal(&self, goal_id: i64) -> Result<Goal> {
        self.get_json(&format!("/goals/{}", goal_id)).await
    }

    pub async fn create_goal(&self, new_goal: &NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        let goal: Goal = self.send_json(Method::POST, "/goals/", new_goal).await?;
        info!("[ApiClient] Created goal {}", goal.id);
        Ok(goal)
    }

    pub async fn create_transaction(
        &self,
        goal_id: i64,
        new_transaction: &NewTransaction,
    ) -> Result<Transaction> {
        new_transaction.validate()?;
        self.send_json(
            Method::POST,
            &format!("/goals/{}/transactions/", goal_id),
            new_transaction,
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fund Category Endpoints
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_fund_category(&self, category: &NewFundCategory) -> Result<FundCategory> {
        category.validate()?;
        self.send_json(Method::POST, "/fund-categories/", category)
            .await
    }

    pub async fn update_fund_category(
        &self,
        category_id: i64,
        update: &FundCategoryUpdate,
    ) -> Result<FundCategory> {
        self.send_json(
            Method::PATCH,
            &format!("/fund-categories/{}", category_id),
            update,
        )
        .await
    }

    pub async fn delete_fund_category(&self, category_id: i64) -> Result<()> {
        self.delete(&format!("/fund-categories/{}", category_id))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fund Snapshot Endpoints
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_fund_snapshot(&self, snapshot: &NewFundSnapshot) -> Result<FundSnapshot> {
        snapshot.validate()?;
        self.send_json(Method::POST, "/fund-snapshots/", snapshot)
            .await
    }

    pub async fn update_fund_snapshot(
        &self,
        snapshot_id: i64,
        update: &FundSnapshotUpdate,
    ) -> Result<FundSnapshot> {
        self.send_json(
            Method::PATCH,
            &format!("/fund-snapshots/{}", snapshot_id),
            update,
        )
        .await
    }

    pub async fn delete_fund_snapshot(&self, snapshot_id: i64) -> Result<()> {
        self.delete(&format!("/fund-snapshots/{}", snapshot_id))
            .await
    }

    /// Downloads the spreadsheet template for bulk snapshot import.
    pub async fn download_snapshot_template(&self) -> Result<Vec<u8>> {
        let response = self
            .execute_authorized(self.request(Method::GET, "/fund-snapshots/template"))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::NetworkOrServer(format!("Failed to read response: {}", e)))?;
        Ok(bytes.to_vec())
    }

    /// Uploads a filled-in template; returns the snapshots the server created.
    pub async fn import_fund_snapshots(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<FundSnapshot>> {
        if contents.is_empty() {
            return Err(ValidationError::InvalidInput("Uploaded file is empty".to_string()).into());
        }

        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str(XLSX_MIME)
            .map_err(|e| Error::Unexpected(format!("Invalid upload content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .execute_authorized(
                self.request(Method::POST, "/fund-snapshots/import")
                    .multipart(form),
            )
            .await?;
        let created: Vec<FundSnapshot> = parse_json(response).await?;
        info!("[ApiClient] Imported {} fund snapshots", created.len());
        Ok(created)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AuthApi Trait Implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AuthApi for ApiClient {
    async fn signup(&self, new_user: &NewUser) -> Result<User> {
        let response = Self::send(self.request(Method::POST, "/auth/signup").json(new_user)).await?;

        let status = response.status();
        if status.is_client_error() {
            let body = read_body(response).await?;
            return Err(Error::AccountCreationFailed(extract_detail(status, &body)));
        }
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(error_from_response(status, &body));
        }
        parse_json(response).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let form = [("username", username), ("password", password)];
        let response = Self::send(self.request(Method::POST, "/auth/login").form(&form)).await?;

        let status = response.status();
        if status.is_client_error() {
            debug!("[ApiClient] Login rejected with HTTP {}", status.as_u16());
            return Err(Error::InvalidCredentials);
        }
        if !status.is_success() {
            let body = read_body(response).await?;
            return Err(error_from_response(status, &body));
        }
        parse_json(response).await
    }

    async fn fetch_current_user(&self, token: &str) -> Result<User> {
        let response = self
            .execute_with_token(self.request(Method::GET, "/users/me"), token)
            .await?;
        parse_json(response).await
    }

    async fn update_profile(&self, token: &str, update: &UserUpdate) -> Result<User> {
        let response = self
            .execute_with_token(self.request(Method::PATCH, "/users/me").json(update), token)
            .await?;
        parse_json(response).await
    }

    async fn change_password(&self, token: &str, update: &PasswordUpdate) -> Result<()> {
        self.execute_with_token(
            self.request(Method::PATCH, "/users/me/password").json(update),
            token,
        )
        .await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FinanceApi Trait Implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl FinanceApi for ApiClient {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let goals: Vec<Goal> = self.get_json("/goals/").await?;
        debug!("[ApiClient] Fetched {} goals", goals.len());
        Ok(goals)
    }

    async fn list_transactions(&self, goal_id: i64) -> Result<Vec<Transaction>> {
        self.get_json(&format!("/goals/{}/transactions/", goal_id))
            .await
    }

    async fn list_fund_categories(&self) -> Result<Vec<FundCategory>> {
        self.get_json("/fund-categories/").await
    }

    async fn list_fund_snapshots(&self) -> Result<Vec<FundSnapshot>> {
        let snapshots: Vec<FundSnapshot> = self.get_json("/fund-snapshots/").await?;
        debug!("[ApiClient] Fetched {} fund snapshots", snapshots.len());
        Ok(snapshots)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn read_body(response: Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| Error::NetworkOrServer(format!("Failed to read response: {}", e)))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = read_body(response).await?;
    serde_json::from_str(&body)
        .map_err(|e| Error::NetworkOrServer(format!("Failed to parse response: {}", e)))
}

/// Maps a non-success, non-401 response to an error.
fn error_from_response(status: StatusCode, body: &str) -> Error {
    Error::NetworkOrServer(format!(
        "HTTP {}: {}",
        status.as_u16(),
        extract_detail(status, body)
    ))
}

/// Pulls the human-readable message out of an error body.
///
/// The backend answers `{"detail": "..."}`; validation failures carry a
/// structured `detail`, which is kept as JSON text.
fn extract_detail(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        match map.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(detail) if !detail.is_null() => return detail.to_string(),
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
