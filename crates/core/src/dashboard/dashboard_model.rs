//! Dashboard view-state shared by every rendering shell.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::funds::{FundBreakdownEntry, FundTrendPoint};
use crate::goals::Transaction;
use crate::utils::decimal_serde::{decimal_display, decimal_display_option};

/// Load status of one goal's transaction list.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalTransactionsState {
    Loading,
    Loaded(Vec<Transaction>),
    Failed(String),
}

impl GoalTransactionsState {
    /// Transactions to aggregate; anything not loaded counts as none.
    pub fn transactions(&self) -> &[Transaction] {
        match self {
            GoalTransactionsState::Loaded(transactions) => transactions,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, GoalTransactionsState::Loading)
    }
}

/// Progress card of a single goal.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressView {
    pub goal_id: i64,
    pub title: String,
    pub status: String,
    pub target_amount: String,
    pub target_date: Option<NaiveDate>,
    pub percentage: u32,
    #[serde(with = "decimal_display")]
    pub total_saved: Decimal,
    /// Transactions are still in flight; progress shows zero meanwhile.
    pub is_loading: bool,
    /// Transactions could not be fetched.
    pub load_error: Option<String>,
    /// Number of loaded transactions (zero while loading or failed).
    pub transaction_count: usize,
}

/// Fund status panel: the trend series plus its latest movement.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundOverview {
    pub points: Vec<FundTrendPoint>,
    pub latest: Option<FundTrendPoint>,
    /// `latest.total` minus the previous point's total.
    #[serde(with = "decimal_display_option")]
    pub change_from_previous: Option<Decimal>,
    #[serde(with = "decimal_display_option")]
    pub liquid_change_from_previous: Option<Decimal>,
}

/// Everything the dashboard screen renders.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub goals: Vec<GoalProgressView>,
    /// Net saved across every goal whose transactions are loaded.
    #[serde(with = "decimal_display")]
    pub total_saved: Decimal,
    pub funds: FundOverview,
    pub breakdown: Vec<FundBreakdownEntry>,
}
