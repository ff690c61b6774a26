//! Sayho Connect - Backend access and session lifecycle for Sayho clients.
//!
//! This crate talks to the Sayho REST backend and owns the authentication
//! session: bootstrap from the persisted token, login, signup, logout and the
//! forced logout that follows a rejected token. It also loads the dashboard
//! data and hands it to the aggregators in `sayho-core`.

mod client;
pub mod dashboard;
pub mod session;
pub mod traits;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use dashboard::DashboardLoader;
pub use session::{SessionContext, SessionManager, SessionState};
pub use traits::{AuthApi, FinanceApi};
