//! Traits defining the contract with the Sayho REST backend.

use async_trait::async_trait;

use sayho_core::errors::Result;
use sayho_core::funds::{FundCategory, FundSnapshot};
use sayho_core::goals::{Goal, Transaction};
use sayho_core::users::{AccessToken, NewUser, PasswordUpdate, User, UserUpdate};

/// Account and credential endpoints the session manager depends on.
///
/// Calls taking a `token` use it verbatim instead of the session's active
/// token, so the manager can vet a new token before committing it. A 401 on
/// those calls is reported as `Error::SessionExpired` without any global
/// side effect; the caller decides what it means.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/signup`. Rejections map to `Error::AccountCreationFailed`.
    async fn signup(&self, new_user: &NewUser) -> Result<User>;

    /// `POST /auth/login` (form-encoded). Rejections map to
    /// `Error::InvalidCredentials`.
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken>;

    /// `GET /users/me`
    async fn fetch_current_user(&self, token: &str) -> Result<User>;

    /// `PATCH /users/me`
    async fn update_profile(&self, token: &str, update: &UserUpdate) -> Result<User>;

    /// `PATCH /users/me/password`
    async fn change_password(&self, token: &str, update: &PasswordUpdate) -> Result<()>;
}

/// Read endpoints the dashboard needs, authenticated with the active session.
#[async_trait]
pub trait FinanceApi: Send + Sync {
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    async fn list_transactions(&self, goal_id: i64) -> Result<Vec<Transaction>>;

    async fn list_fund_categories(&self) -> Result<Vec<FundCategory>>;

    async fn list_fund_snapshots(&self) -> Result<Vec<FundSnapshot>>;
}
