//! Session events module.
//!
//! Provides the events the session layer reports and the sink trait through
//! which runtime shells (CLI, desktop, web) receive them.

mod session_event;
mod sink;

pub use session_event::*;
pub use sink::*;
