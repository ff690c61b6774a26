use serde::Serialize;

use sayho_core::users::User;

/// Authentication state of the client.
///
/// `Loading` only exists until the first bootstrap settles; afterwards the
/// session moves between `Anonymous` and `Authenticated`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}
