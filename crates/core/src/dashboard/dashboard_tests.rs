use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::*;
use crate::funds::{AssetType, FundCategory, FundSnapshot};
use crate::goals::{Goal, Transaction, TransactionType};

fn goal(id: i64, target: &str) -> Goal {
    Goal {
        id,
        title: format!("Goal {}", id),
        description: None,
        target_amount: target.to_string(),
        target_date: None,
        status: "active".to_string(),
        created_at: "2024-01-01T00:00:00".to_string(),
        owner_id: Some(1),
        members: vec![],
    }
}

fn deposit(goal_id: i64, amount: &str) -> Transaction {
    Transaction {
        id: 1,
        goal_id,
        user_id: 1,
        transaction_type: TransactionType::Deposit,
        amount: amount.to_string(),
        category: None,
        occurred_on: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        memo: None,
        created_at: "2024-01-02T00:00:00".to_string(),
    }
}

fn snapshot(id: i64, date: &str, amount: &str, category_id: Option<i64>) -> FundSnapshot {
    FundSnapshot {
        id,
        user_id: 1,
        reference_date: date.to_string(),
        amount: amount.to_string(),
        category_id,
        created_at: "2024-01-01T00:00:00".to_string(),
        category: None,
    }
}

fn savings_category(id: i64) -> FundCategory {
    FundCategory {
        id,
        user_id: 1,
        asset_type: AssetType::Savings,
        name: "Savings".to_string(),
        is_active: true,
        is_liquid: true,
        note: None,
        created_at: "2024-01-01T00:00:00".to_string(),
        updated_at: "2024-01-01T00:00:00".to_string(),
    }
}

#[test]
fn test_loading_goal_is_distinct_from_empty_goal() {
    let goals = vec![goal(1, "100"), goal(2, "100")];
    let mut states = HashMap::new();
    states.insert(1, GoalTransactionsState::Loading);
    states.insert(2, GoalTransactionsState::Loaded(vec![]));

    let views = build_goal_progress_views(&goals, &states);
    assert!(views[0].is_loading);
    assert_eq!(views[0].percentage, 0);
    assert!(!views[1].is_loading);
    assert_eq!(views[1].percentage, 0);
    assert_eq!(views[1].transaction_count, 0);
}

#[test]
fn test_missing_state_counts_as_loading() {
    let views = build_goal_progress_views(&[goal(5, "10")], &HashMap::new());
    assert!(views[0].is_loading);
    assert_eq!(views[0].total_saved, Decimal::ZERO);
}

#[test]
fn test_failed_goal_reports_error() {
    let mut states = HashMap::new();
    states.insert(1, GoalTransactionsState::Failed("timeout".to_string()));
    let views = build_goal_progress_views(&[goal(1, "100")], &states);
    assert!(!views[0].is_loading);
    assert_eq!(views[0].load_error.as_deref(), Some("timeout"));
    assert_eq!(views[0].percentage, 0);
}

#[test]
fn test_dashboard_totals_only_loaded_goals() {
    let goals = vec![goal(1, "1000"), goal(2, "500"), goal(3, "200")];
    let mut states = HashMap::new();
    states.insert(1, GoalTransactionsState::Loaded(vec![deposit(1, "250")]));
    states.insert(2, GoalTransactionsState::Loaded(vec![deposit(2, "500")]));
    states.insert(3, GoalTransactionsState::Loading);

    let view = build_dashboard(&goals, &states, &[], &[]);
    assert_eq!(view.goals.len(), 3);
    assert_eq!(view.goals[0].percentage, 25);
    assert_eq!(view.goals[1].percentage, 100);
    assert_eq!(view.total_saved, dec!(750));
    assert!(view.funds.points.is_empty());
    assert_eq!(view.funds.latest, None);
}

#[test]
fn test_dashboard_fund_overview_changes() {
    let categories = vec![savings_category(9)];
    let snapshots = vec![
        snapshot(1, "2024-01-31", "1000", Some(9)),
        snapshot(2, "2024-1-31", "5000", None),
        snapshot(3, "2024-02-29", "1200", Some(9)),
        snapshot(4, "2024-02-29", "4900", None),
    ];

    let view = build_dashboard(&[], &HashMap::new(), &snapshots, &categories);
    assert_eq!(view.funds.points.len(), 2);
    let latest = view.funds.latest.clone().unwrap();
    assert_eq!(latest.total, dec!(6100));
    assert_eq!(latest.liquid_total, dec!(1200));
    assert_eq!(view.funds.change_from_previous, Some(dec!(100)));
    assert_eq!(view.funds.liquid_change_from_previous, Some(dec!(200)));
    assert_eq!(view.breakdown.len(), 2);
}

#[test]
fn test_fund_overview_single_point_has_no_change() {
    let overview = FundOverview::from_trend(crate::funds::compute_fund_trend(&[snapshot(
        1,
        "2024-01-01",
        "10",
        None,
    )]));
    assert!(overview.latest.is_some());
    assert_eq!(overview.change_from_previous, None);
}

#[test]
fn test_dashboard_serializes_for_shells() {
    let mut states = HashMap::new();
    states.insert(1, GoalTransactionsState::Loaded(vec![deposit(1, "12.345")]));
    let view = build_dashboard(&[goal(1, "100")], &states, &[], &[]);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["totalSaved"], "12.35");
    assert_eq!(json["goals"][0]["percentage"], 12);
    assert_eq!(json["goals"][0]["isLoading"], false);
}
