//! Session event types.

use serde::{Deserialize, Serialize};

/// Events the session layer reports to the UI shell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The server rejected the session's token. The token and cached user
    /// have already been cleared; the shell should route to its login screen.
    Expired {
        /// Id of the user who was signed in, when known.
        user_id: Option<i64>,
    },
}

impl SessionEvent {
    pub fn expired(user_id: Option<i64>) -> Self {
        SessionEvent::Expired { user_id }
    }
}
