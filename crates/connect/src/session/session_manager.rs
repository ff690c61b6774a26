//! Session lifecycle: bootstrap, login, signup, refresh and logout.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{watch, OnceCell};

use sayho_core::errors::{Error, Result};
use sayho_core::events::SessionEventSink;
use sayho_core::users::{NewUser, PasswordUpdate, User, UserUpdate};

use super::session_context::SessionContext;
use super::session_state::SessionState;
use crate::traits::AuthApi;

/// Drives every transition of a [`SessionContext`].
///
/// # Example
///
/// ```ignore
/// let context = Arc::new(SessionContext::new(token_store));
/// let client = Arc::new(ApiClient::new(&config, context.clone())?);
/// let session = SessionManager::new(client.clone(), context);
/// session.bootstrap().await;
/// ```
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    context: Arc<SessionContext>,
    bootstrapped: OnceCell<()>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AuthApi>, context: Arc<SessionContext>) -> Self {
        Self {
            api,
            context,
            bootstrapped: OnceCell::new(),
        }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.context.state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.context.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.context.state().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.context.subscribe()
    }

    /// Resolves once bootstrap has settled the state.
    pub async fn wait_until_settled(&self) -> SessionState {
        self.context.wait_until_settled().await
    }

    pub fn register_listener(&self, sink: Arc<dyn SessionEventSink>) {
        self.context.register_listener(sink);
    }

    /// Restores the persisted session. Runs once per manager; concurrent and
    /// later callers wait for that single run and get the settled state.
    pub async fn bootstrap(&self) -> SessionState {
        self.bootstrapped
            .get_or_init(|| self.run_bootstrap())
            .await;
        self.context.state()
    }

    async fn run_bootstrap(&self) {
        let token = match self.context.persisted_token() {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                debug!("[Session] No persisted token; starting anonymous");
                self.context.settle_anonymous(false);
                return;
            }
            Err(e) => {
                warn!("[Session] Could not read persisted token: {}", e);
                self.context.settle_anonymous(true);
                return;
            }
        };

        match self.api.fetch_current_user(&token).await {
            Ok(user) => {
                if !self.context.restore(token, user) {
                    // Signed out while the token was being validated.
                    self.context.settle_anonymous(false);
                }
            }
            Err(e) => {
                info!("[Session] Persisted token rejected ({}); starting anonymous", e);
                self.context.settle_anonymous(true);
            }
        }
    }

    /// Exchanges credentials for a token and signs in.
    ///
    /// The token is committed only after the current user was fetched with
    /// it, so a failure at any step leaves the previous state untouched.
    pub async fn login_with_credentials(&self, identifier: &str, secret: &str) -> Result<User> {
        self.bootstrap().await;

        let token = self.api.login(identifier, secret).await?;
        let user = self
            .api
            .fetch_current_user(&token.access_token)
            .await
            .map_err(|e| match e {
                Error::SessionExpired => Error::InvalidCredentials,
                other => other,
            })?;

        self.context.establish(token.access_token, user.clone())?;
        Ok(user)
    }

    /// Creates the account, then signs in with the same credentials.
    pub async fn signup_and_login(&self, email: &str, name: &str, secret: &str) -> Result<User> {
        let new_user = NewUser {
            email: email.trim().to_string(),
            name: name.trim().to_string(),
            password: secret.to_string(),
        };
        new_user.validate()?;

        let created = self.api.signup(&new_user).await?;
        debug!("[Session] Created account {}", created.id);

        self.login_with_credentials(&new_user.email, secret).await
    }

    /// Re-fetches the current user with the active token.
    pub async fn refresh_user(&self) -> Result<User> {
        let token = self.active_token()?;
        let user = self.intercept(&token, self.api.fetch_current_user(&token).await)?;
        if !self.context.replace_user_for_token(&token, user.clone()) {
            // Signed out (or in as someone else) while the request was in flight.
            return Err(Error::SessionExpired);
        }
        Ok(user)
    }

    /// Replaces the cached user with one a mutation already returned.
    pub fn set_user(&self, user: User) -> bool {
        self.context.replace_user(user)
    }

    /// Updates name/theme and caches the returned user.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        let token = self.active_token()?;
        let user = self.intercept(&token, self.api.update_profile(&token, update).await)?;
        if !self.context.replace_user_for_token(&token, user.clone()) {
            return Err(Error::SessionExpired);
        }
        Ok(user)
    }

    pub async fn change_password(&self, update: &PasswordUpdate) -> Result<()> {
        update.validate()?;
        let token = self.active_token()?;
        self.intercept(&token, self.api.change_password(&token, update).await)
    }

    /// Signs out locally. There is no server-side session to revoke.
    pub fn logout(&self) -> Result<()> {
        self.context.logout()
    }

    /// Unregisters the listener; the manager must not be used afterwards.
    pub fn shutdown(&self) {
        self.context.clear_listener();
    }

    fn active_token(&self) -> Result<String> {
        self.context.bearer_token().ok_or(Error::SessionExpired)
    }

    fn intercept<T>(&self, token: &str, result: Result<T>) -> Result<T> {
        if let Err(Error::SessionExpired) = &result {
            self.context.handle_unauthorized(token);
        }
        result
    }
}
