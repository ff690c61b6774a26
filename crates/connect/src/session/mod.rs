//! Authentication session lifecycle.

mod session_context;
mod session_manager;
mod session_state;


pub use session_context::SessionContext;
pub use session_manager::SessionManager;
pub use session_state::SessionState;
