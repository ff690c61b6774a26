//! Dashboard module - platform-agnostic view-state built from fetched data.

mod dashboard_builder;
mod dashboard_model;

#[cfg(test)]
mod dashboard_tests;

pub use dashboard_builder::{build_dashboard, build_goal_progress_views};
pub use dashboard_model::{DashboardView, FundOverview, GoalProgressView, GoalTransactionsState};
