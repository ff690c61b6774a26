//! Sayho Core - Domain entities, aggregation and session seams.
//!
//! This crate holds everything the savings tracker computes without I/O:
//! wire models, goal progress, fund trends and dashboard view-state. It also
//! defines the traits (`TokenStore`, `SessionEventSink`) that runtime shells
//! implement for the session layer in `sayho-connect`.

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod events;
pub mod funds;
pub mod goals;
pub mod secrets;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
