//! Fund status domain models: asset categories and balance snapshots.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Result, ValidationError};
use crate::utils::decimal_serde::{amount_string, decimal_display};
use crate::utils::number_utils::parse_amount;

/// Classification of a fund category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    RealEstate,
    Stock,
    Deposit,
    Liability,
    Savings,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::RealEstate => "real_estate",
            AssetType::Stock => "stock",
            AssetType::Deposit => "deposit",
            AssetType::Liability => "liability",
            AssetType::Savings => "savings",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined asset or liability bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundCategory {
    pub id: i64,
    pub user_id: i64,
    pub asset_type: AssetType,
    pub name: String,
    pub is_active: bool,
    pub is_liquid: bool,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FundCategory {
    /// Whether snapshots of this category count toward the liquid total.
    pub fn counts_as_liquid(&self) -> bool {
        self.is_active && self.is_liquid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFundCategory {
    pub asset_type: AssetType,
    pub name: String,
    pub is_active: bool,
    pub is_liquid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewFundCategory {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}

/// Partial update for `PATCH /fund-categories/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liquid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A dated balance observation. Liabilities carry negative amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundSnapshot {
    pub id: i64,
    pub user_id: i64,
    pub reference_date: String,
    #[serde(with = "amount_string")]
    pub amount: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub created_at: String,
    #[serde(default)]
    pub category: Option<FundCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFundSnapshot {
    pub reference_date: NaiveDate,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl NewFundSnapshot {
    pub fn validate(&self) -> Result<()> {
        parse_amount(&self.amount)
            .map(|_| ())
            .ok_or_else(|| ValidationError::InvalidAmount(self.amount.clone()).into())
    }
}

/// Partial update for `PATCH /fund-snapshots/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundSnapshotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// One point of the fund trend chart.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FundTrendPoint {
    pub date: NaiveDate,
    #[serde(with = "decimal_display")]
    pub total: Decimal,
    #[serde(with = "decimal_display")]
    pub liquid_total: Decimal,
}

/// Total of one asset type at a reference date.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FundBreakdownEntry {
    /// `None` collects snapshots without a resolvable category.
    pub asset_type: Option<AssetType>,
    #[serde(with = "decimal_display")]
    pub total: Decimal,
}
