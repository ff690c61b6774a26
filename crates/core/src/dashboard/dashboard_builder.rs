use rust_decimal::Decimal;
use std::collections::HashMap;

use super::dashboard_model::{DashboardView, FundOverview, GoalProgressView, GoalTransactionsState};
use crate::funds::{
    compute_fund_breakdown, compute_fund_trend_with_categories, FundCategory, FundSnapshot,
    FundTrendPoint,
};
use crate::goals::{compute_goal_progress, Goal};

/// Builds one progress card per goal, in the order the goals were given.
///
/// A goal absent from `states` is treated as still loading.
pub fn build_goal_progress_views(
    goals: &[Goal],
    states: &HashMap<i64, GoalTransactionsState>,
) -> Vec<GoalProgressView> {
    goals
        .iter()
        .map(|goal| {
            let state = states.get(&goal.id);
            let transactions = state.map(|s| s.transactions()).unwrap_or(&[]);
            let progress = compute_goal_progress(&goal.target_amount, transactions);
            let load_error = match state {
                Some(GoalTransactionsState::Failed(message)) => Some(message.clone()),
                _ => None,
            };

            GoalProgressView {
                goal_id: goal.id,
                title: goal.title.clone(),
                status: goal.status.clone(),
                target_amount: goal.target_amount.clone(),
                target_date: goal.target_date,
                percentage: progress.percentage,
                total_saved: progress.total_saved,
                is_loading: state.map_or(true, GoalTransactionsState::is_loading),
                load_error,
                transaction_count: transactions.len(),
            }
        })
        .collect()
}

impl FundOverview {
    pub fn from_trend(points: Vec<FundTrendPoint>) -> Self {
        let latest = points.last().cloned();
        let previous = points.len().checked_sub(2).and_then(|i| points.get(i));

        let (change_from_previous, liquid_change_from_previous) = match (&latest, previous) {
            (Some(latest), Some(previous)) => (
                latest.total.checked_sub(previous.total),
                latest.liquid_total.checked_sub(previous.liquid_total),
            ),
            _ => (None, None),
        };

        Self {
            points,
            latest,
            change_from_previous,
            liquid_change_from_previous,
        }
    }
}

/// Assembles the full dashboard from whatever has been fetched so far.
pub fn build_dashboard(
    goals: &[Goal],
    states: &HashMap<i64, GoalTransactionsState>,
    snapshots: &[FundSnapshot],
    categories: &[FundCategory],
) -> DashboardView {
    let goal_views = build_goal_progress_views(goals, states);
    let total_saved = goal_views
        .iter()
        .filter(|view| !view.is_loading && view.load_error.is_none())
        .fold(Decimal::ZERO, |acc, view| {
            acc.checked_add(view.total_saved).unwrap_or(acc)
        });

    DashboardView {
        goals: goal_views,
        total_saved,
        funds: FundOverview::from_trend(compute_fund_trend_with_categories(snapshots, categories)),
        breakdown: compute_fund_breakdown(snapshots, categories),
    }
}
