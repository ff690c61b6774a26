//! Fund status module - asset categories, balance snapshots and trend series.

mod fund_trend;
mod funds_model;

pub use fund_trend::{compute_fund_breakdown, compute_fund_trend, compute_fund_trend_with_categories};
pub use funds_model::{
    AssetType, FundBreakdownEntry, FundCategory, FundCategoryUpdate, FundSnapshot,
    FundSnapshotUpdate, FundTrendPoint, NewFundCategory, NewFundSnapshot,
};
