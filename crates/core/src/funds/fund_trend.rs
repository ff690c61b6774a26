//! Fund trend aggregation over dated balance snapshots.
//!
//! Every function recomputes from its input; nothing is memoized, so a
//! changed snapshot set always yields a fresh series.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::funds_model::{
    AssetType, FundBreakdownEntry, FundCategory, FundSnapshot, FundTrendPoint,
};
use crate::utils::number_utils::amount_or_zero;
use crate::utils::time_utils::normalize_reference_date;

#[derive(Default)]
struct DayTotals {
    total: Decimal,
    liquid_total: Decimal,
}

/// Groups snapshots by normalized reference date, ascending by calendar date.
///
/// Liquidity is taken from each snapshot's embedded category. Snapshots
/// without one count toward `total` only.
pub fn compute_fund_trend(snapshots: &[FundSnapshot]) -> Vec<FundTrendPoint> {
    aggregate(snapshots, |snapshot| snapshot.category.as_ref())
}

/// Like [`compute_fund_trend`], resolving `category_id` against `categories`
/// when a snapshot carries no embedded category.
pub fn compute_fund_trend_with_categories(
    snapshots: &[FundSnapshot],
    categories: &[FundCategory],
) -> Vec<FundTrendPoint> {
    let by_id = index_categories(categories);
    aggregate(snapshots, |snapshot| resolve_category(snapshot, &by_id))
}

/// Totals per asset type at the latest reference date present.
pub fn compute_fund_breakdown(
    snapshots: &[FundSnapshot],
    categories: &[FundCategory],
) -> Vec<FundBreakdownEntry> {
    let by_id = index_categories(categories);
    let dated: Vec<(NaiveDate, &FundSnapshot)> = snapshots
        .iter()
        .filter_map(|s| normalize_reference_date(&s.reference_date).map(|d| (d, s)))
        .collect();

    let latest = match dated.iter().map(|(date, _)| *date).max() {
        Some(latest) => latest,
        None => return Vec::new(),
    };

    let mut totals: BTreeMap<Option<AssetType>, Decimal> = BTreeMap::new();
    for (date, snapshot) in dated {
        if date != latest {
            continue;
        }
        let asset_type = resolve_category(snapshot, &by_id).map(|c| c.asset_type);
        let entry = totals.entry(asset_type).or_default();
        *entry = entry
            .checked_add(amount_or_zero(&snapshot.amount))
            .unwrap_or(*entry);
    }

    totals
        .into_iter()
        .map(|(asset_type, total)| FundBreakdownEntry { asset_type, total })
        .collect()
}

fn aggregate<'a, F>(snapshots: &'a [FundSnapshot], category_of: F) -> Vec<FundTrendPoint>
where
    F: Fn(&'a FundSnapshot) -> Option<&'a FundCategory>,
{
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for snapshot in snapshots {
        let Some(date) = normalize_reference_date(&snapshot.reference_date) else {
            debug!(
                "Skipping snapshot {} with unreadable reference date '{}'",
                snapshot.id, snapshot.reference_date
            );
            continue;
        };

        let amount = amount_or_zero(&snapshot.amount);
        let day = days.entry(date).or_default();
        day.total = day.total.checked_add(amount).unwrap_or(day.total);

        if category_of(snapshot).is_some_and(FundCategory::counts_as_liquid) {
            day.liquid_total = day
                .liquid_total
                .checked_add(amount)
                .unwrap_or(day.liquid_total);
        }
    }

    days.into_iter()
        .map(|(date, totals)| FundTrendPoint {
            date,
            total: totals.total,
            liquid_total: totals.liquid_total,
        })
        .collect()
}

fn index_categories(categories: &[FundCategory]) -> HashMap<i64, &FundCategory> {
    categories.iter().map(|c| (c.id, c)).collect()
}

fn resolve_category<'a>(
    snapshot: &'a FundSnapshot,
    by_id: &HashMap<i64, &'a FundCategory>,
) -> Option<&'a FundCategory> {
    snapshot.category.as_ref().or_else(|| {
        snapshot
            .category_id
            .and_then(|id| by_id.get(&id).copied())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn category(id: i64, asset_type: AssetType, is_active: bool, is_liquid: bool) -> FundCategory {
        FundCategory {
            id,
            user_id: 1,
            asset_type,
            name: format!("category-{}", id),
            is_active,
            is_liquid,
            note: None,
            created_at: "2024-01-01T00:00:00".to_string(),
            updated_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    fn snapshot(id: i64, date: &str, amount: &str, category: Option<FundCategory>) -> FundSnapshot {
        FundSnapshot {
            id,
            user_id: 1,
            reference_date: date.to_string(),
            amount: amount.to_string(),
            category_id: category.as_ref().map(|c| c.id),
            created_at: "2024-01-01T00:00:00".to_string(),
            category,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trend_merges_unpadded_dates() {
        let liquid = category(1, AssetType::Deposit, true, true);
        let snapshots = vec![
            snapshot(1, "2024-3-1", "100", None),
            snapshot(2, "2024-03-01", "50", Some(liquid)),
        ];
        let trend = compute_fund_trend(&snapshots);
        assert_eq!(
            trend,
            vec![FundTrendPoint {
                date: date(2024, 3, 1),
                total: dec!(150),
                liquid_total: dec!(50),
            }]
        );
    }

    #[test]
    fn test_trend_sorts_by_calendar_date() {
        let snapshots = vec![
            snapshot(1, "2024-10-1", "10", None),
            snapshot(2, "2024-9-15", "20", None),
            snapshot(3, "2023-12-31", "30", None),
        ];
        let dates: Vec<NaiveDate> = compute_fund_trend(&snapshots)
            .into_iter()
            .map(|p| p.date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2023, 12, 31), date(2024, 9, 15), date(2024, 10, 1)]
        );
    }

    #[test]
    fn test_trend_excludes_inactive_and_illiquid_from_liquid_total() {
        let inactive_liquid = category(1, AssetType::Deposit, false, true);
        let illiquid = category(2, AssetType::RealEstate, true, false);
        let liability = category(3, AssetType::Liability, true, false);
        let snapshots = vec![
            snapshot(1, "2024-01-31", "1000", Some(inactive_liquid)),
            snapshot(2, "2024-01-31", "250000", Some(illiquid)),
            snapshot(3, "2024-01-31", "-150000", Some(liability)),
        ];
        let trend = compute_fund_trend(&snapshots);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].total, dec!(101000));
        assert_eq!(trend[0].liquid_total, Decimal::ZERO);
    }

    #[test]
    fn test_trend_skips_malformed_amount_and_date() {
        let snapshots = vec![
            snapshot(1, "2024-02-01", "abc", None),
            snapshot(2, "2024-02-01", "75.5", None),
            snapshot(3, "not-a-date", "999", None),
        ];
        let trend = compute_fund_trend(&snapshots);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].total, dec!(75.5));
    }

    #[test]
    fn test_trend_empty_input() {
        assert!(compute_fund_trend(&[]).is_empty());
    }

    #[test]
    fn test_trend_is_recomputed_after_changes() {
        let mut snapshots = vec![snapshot(1, "2024-01-01", "10", None)];
        assert_eq!(compute_fund_trend(&snapshots)[0].total, dec!(10));
        snapshots.push(snapshot(2, "2024-01-01", "5", None));
        assert_eq!(compute_fund_trend(&snapshots)[0].total, dec!(15));
        snapshots.clear();
        assert!(compute_fund_trend(&snapshots).is_empty());
    }

    #[test]
    fn test_trend_resolves_category_ids() {
        let liquid = category(7, AssetType::Savings, true, true);
        let mut bare = snapshot(1, "2024-05-01", "40", None);
        bare.category_id = Some(7);

        let without = compute_fund_trend(std::slice::from_ref(&bare));
        assert_eq!(without[0].liquid_total, Decimal::ZERO);

        let with = compute_fund_trend_with_categories(&[bare], &[liquid]);
        assert_eq!(with[0].liquid_total, dec!(40));
    }

    #[test]
    fn test_breakdown_uses_latest_date_only() {
        let stock = category(1, AssetType::Stock, true, true);
        let liability = category(2, AssetType::Liability, true, false);
        let snapshots = vec![
            snapshot(1, "2024-01-01", "500", Some(stock.clone())),
            snapshot(2, "2024-02-01", "700", Some(stock.clone())),
            snapshot(3, "2024-2-1", "100", Some(stock)),
            snapshot(4, "2024-02-01", "-300", Some(liability)),
            snapshot(5, "2024-02-01", "20", None),
        ];
        let breakdown = compute_fund_breakdown(&snapshots, &[]);
        assert_eq!(
            breakdown,
            vec![
                FundBreakdownEntry {
                    asset_type: None,
                    total: dec!(20),
                },
                FundBreakdownEntry {
                    asset_type: Some(AssetType::Stock),
                    total: dec!(800),
                },
                FundBreakdownEntry {
                    asset_type: Some(AssetType::Liability),
                    total: dec!(-300),
                },
            ]
        );
    }

    #[test]
    fn test_breakdown_empty() {
        assert!(compute_fund_breakdown(&[], &[]).is_empty());
    }
}
