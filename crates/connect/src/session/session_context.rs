//! Shared session holder: token, cached user, state and listener slot.
//!
//! One `SessionContext` exists per client instance, shared through `Arc`
//! between the [`SessionManager`](super::SessionManager) and the
//! [`ApiClient`](crate::ApiClient). Every mutation happens under a single
//! mutex so the in-memory token, the persisted token and the published state
//! never disagree.

use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use sayho_core::constants::ACCESS_TOKEN_KEY;
use sayho_core::errors::Result;
use sayho_core::events::{SessionEvent, SessionEventSink, SessionListenerSlot};
use sayho_core::secrets::TokenStore;
use sayho_core::users::User;

use super::session_state::SessionState;

struct SessionInner {
    state: SessionState,
    token: Option<String>,
}

pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    inner: Mutex<SessionInner>,
    state_tx: watch::Sender<SessionState>,
    listeners: SessionListenerSlot,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Loading);
        Self {
            store,
            inner: Mutex::new(SessionInner {
                state: SessionState::Loading,
                token: None,
            }),
            state_tx,
            listeners: SessionListenerSlot::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // State is always written whole, so a poisoned guard is still coherent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, inner: &mut SessionInner, state: SessionState) {
        inner.state = state.clone();
        self.state_tx.send_replace(state);
    }

    // ── Readers ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().state.user().cloned()
    }

    /// Bearer token for authenticated requests, if signed in.
    pub fn bearer_token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Resolves once the state is no longer `Loading`.
    pub async fn wait_until_settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    pub(crate) fn persisted_token(&self) -> Result<Option<String>> {
        self.store.get_token(ACCESS_TOKEN_KEY)
    }

    // ── Listener slot ───────────────────────────────────────────────────────

    /// Registers the session listener, replacing any previous one.
    pub fn register_listener(&self, sink: Arc<dyn SessionEventSink>) {
        if self.listeners.register(sink).is_some() {
            debug!("[Session] Replaced previously registered session listener");
        }
    }

    pub fn clear_listener(&self) {
        self.listeners.clear();
    }

    // ── Transitions ─────────────────────────────────────────────────────────

    /// Commits a freshly obtained token and its user.
    ///
    /// The token is persisted first; if that fails nothing changes.
    pub(crate) fn establish(&self, token: String, user: User) -> Result<()> {
        let mut inner = self.lock();
        self.store.set_token(ACCESS_TOKEN_KEY, &token)?;
        info!("[Session] Signed in as user {}", user.id);
        inner.token = Some(token);
        self.publish(&mut inner, SessionState::Authenticated(user));
        Ok(())
    }

    /// Adopts a persisted token that the backend just accepted.
    ///
    /// Commits only while still loading and while `token` is still the
    /// persisted one; a logout during validation wins. Returns whether the
    /// session was restored.
    pub(crate) fn restore(&self, token: String, user: User) -> bool {
        let mut inner = self.lock();
        if !inner.state.is_loading() {
            debug!("[Session] Session settled during validation; not restoring");
            return false;
        }
        match self.store.get_token(ACCESS_TOKEN_KEY) {
            Ok(Some(persisted)) if persisted == token => {}
            Ok(_) => {
                debug!("[Session] Persisted token changed during validation; not restoring");
                return false;
            }
            Err(e) => {
                warn!("[Session] Could not re-read persisted token: {}", e);
                return false;
            }
        }
        info!("[Session] Restored session for user {}", user.id);
        inner.token = Some(token);
        self.publish(&mut inner, SessionState::Authenticated(user));
        true
    }

    /// Drops any persisted token and settles into the anonymous state.
    pub(crate) fn settle_anonymous(&self, discard_persisted: bool) {
        let mut inner = self.lock();
        if discard_persisted {
            self.discard_persisted();
        }
        inner.token = None;
        self.publish(&mut inner, SessionState::Anonymous);
    }

    /// Replaces the cached user. Ignored unless authenticated.
    pub fn replace_user(&self, user: User) -> bool {
        let mut inner = self.lock();
        if !inner.state.is_authenticated() {
            debug!("[Session] Ignoring user update while not authenticated");
            return false;
        }
        self.publish(&mut inner, SessionState::Authenticated(user));
        true
    }

    /// Replaces the cached user only if `token` is still the active one.
    pub(crate) fn replace_user_for_token(&self, token: &str, user: User) -> bool {
        let mut inner = self.lock();
        if inner.token.as_deref() != Some(token) {
            return false;
        }
        self.publish(&mut inner, SessionState::Authenticated(user));
        true
    }

    /// Clears token and user. Safe to call any number of times.
    ///
    /// The persisted token is removed first; if that fails the session is
    /// left as it was.
    pub fn logout(&self) -> Result<()> {
        let mut inner = self.lock();
        self.store.clear_token(ACCESS_TOKEN_KEY)?;
        let was_authenticated = inner.state.is_authenticated();
        inner.token = None;
        self.publish(&mut inner, SessionState::Anonymous);
        if was_authenticated {
            info!("[Session] Signed out");
        }
        Ok(())
    }

    /// Reacts to a 401 observed on a request that carried `token_used`.
    ///
    /// Only the first report for the active token clears the session and
    /// notifies the listener; reports for a token that is already gone
    /// (concurrent failures, or a request that raced a new login) are
    /// ignored. Returns whether this call performed the clear.
    pub fn handle_unauthorized(&self, token_used: &str) -> bool {
        let user_id = {
            let mut inner = self.lock();
            if inner.token.as_deref() != Some(token_used) {
                debug!("[Session] Ignoring 401 for a token that is no longer active");
                return false;
            }
            inner.token = None;
            self.discard_persisted();
            let user_id = inner.state.user().map(|u| u.id);
            self.publish(&mut inner, SessionState::Anonymous);
            user_id
        };

        warn!("[Session] Server rejected the session token; signed out");
        self.listeners.emit(SessionEvent::expired(user_id));
        true
    }

    fn discard_persisted(&self) {
        if let Err(e) = self.store.clear_token(ACCESS_TOKEN_KEY) {
            warn!("[Session] Failed to clear persisted token: {}", e);
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .field("listener_registered", &self.listeners.is_registered())
            .finish()
    }
}
