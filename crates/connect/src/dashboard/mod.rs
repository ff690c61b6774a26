//! Fetches everything the dashboard shows and folds it into view-state.

mod loader;

pub use loader::DashboardLoader;
