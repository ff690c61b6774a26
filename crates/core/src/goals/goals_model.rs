//! Goals and goal transaction domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Result, ValidationError};
use crate::utils::decimal_serde::{amount_string, decimal_display};
use crate::utils::number_utils::parse_amount;

/// Domain model representing a savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "amount_string")]
    pub target_amount: String,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub members: Vec<GoalMember>,
}

/// A user sharing a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalMember {
    pub id: i64,
    pub user_id: i64,
    pub role: String,
    #[serde(default)]
    pub contribution_ratio: Option<f64>,
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_ratio: Option<f64>,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }
        validate_non_negative(&self.target_amount)
    }
}

/// Direction of a goal transaction. The stored amount is always a magnitude.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    /// Applies the direction to a magnitude.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Deposit => amount,
            TransactionType::Withdrawal => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// A deposit or withdrawal recorded against a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub goal_id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "amount_string")]
    pub amount: String,
    #[serde(default)]
    pub category: Option<String>,
    pub occurred_on: NaiveDate,
    #[serde(default)]
    pub memo: Option<String>,
    pub created_at: String,
}

/// Input model for `POST /goals/{id}/transactions/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub occurred_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_non_negative(&self.amount)
    }
}

/// Savings progress of a single goal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Whole percent, always within `0..=100`.
    pub percentage: u32,
    /// Deposits minus withdrawals; negative when more was withdrawn.
    #[serde(with = "decimal_display")]
    pub total_saved: Decimal,
}

fn validate_non_negative(raw: &str) -> Result<()> {
    let amount =
        parse_amount(raw).ok_or_else(|| ValidationError::InvalidAmount(raw.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount(raw.to_string()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_deserializes_type_field() {
        let json = r#"{
            "id": 3,
            "goal_id": 1,
            "user_id": 9,
            "type": "withdrawal",
            "amount": "25.00",
            "category": null,
            "occurred_on": "2024-02-10",
            "memo": "rent",
            "created_at": "2024-02-10T09:00:00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Withdrawal);
        assert_eq!(tx.amount, "25.00");
        assert_eq!(tx.memo.as_deref(), Some("rent"));
    }

    #[test]
    fn test_goal_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": 1,
            "title": "Trip",
            "target_amount": "1500.00",
            "status": "active",
            "created_at": "2024-01-01T00:00:00"
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.target_amount, "1500.00");
        assert!(goal.members.is_empty());
        assert_eq!(goal.target_date, None);
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(TransactionType::Deposit.signed(dec!(10)), dec!(10));
        assert_eq!(TransactionType::Withdrawal.signed(dec!(10)), dec!(-10));
    }

    #[test]
    fn test_new_transaction_serializes_type() {
        let tx = NewTransaction {
            transaction_type: TransactionType::Deposit,
            amount: "10".to_string(),
            category: None,
            occurred_on: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            memo: None,
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "deposit");
        assert_eq!(value["amount"], "10");
        assert_eq!(value["occurred_on"], "2024-01-05");
        assert!(value.get("memo").is_none());
    }

    #[test]
    fn test_new_transaction_rejects_negative_or_garbage() {
        let mut tx = NewTransaction {
            transaction_type: TransactionType::Deposit,
            amount: "-5".to_string(),
            category: None,
            occurred_on: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            memo: None,
        };
        assert!(tx.validate().is_err());
        tx.amount = "five".to_string();
        assert!(tx.validate().is_err());
        tx.amount = "0".to_string();
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_goal_progress_serializes_total_as_string() {
        let progress = GoalProgress {
            percentage: 60,
            total_saved: dec!(600),
        };
        let value = serde_json::to_value(progress).unwrap();
        assert_eq!(value["percentage"], 60);
        assert_eq!(value["totalSaved"], "600");
    }
}
