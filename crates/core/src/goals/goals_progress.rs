//! Goal savings progress calculation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::goals_model::{GoalProgress, Transaction};
use crate::constants::MAX_PROGRESS_PERCENTAGE;
use crate::utils::number_utils::{amount_or_zero, parse_amount};

/// Computes how far a goal's transactions have progressed toward its target.
///
/// Deposits add and withdrawals subtract; malformed amounts contribute zero.
/// The percentage is rounded to a whole number and clamped to `0..=100`, and
/// is zero whenever the target is missing, malformed or not positive.
pub fn compute_goal_progress(target_amount: &str, transactions: &[Transaction]) -> GoalProgress {
    let total_saved = net_saved(transactions);
    let target = parse_amount(target_amount).unwrap_or(Decimal::ZERO);

    GoalProgress {
        percentage: percentage_of(total_saved, target),
        total_saved,
    }
}

/// Sum of deposits minus withdrawals.
pub fn net_saved(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |acc, tx| {
        let signed = tx.transaction_type.signed(amount_or_zero(&tx.amount));
        // Overflowing records are dropped like malformed ones.
        acc.checked_add(signed).unwrap_or(acc)
    })
}

fn percentage_of(total_saved: Decimal, target: Decimal) -> u32 {
    if target <= Decimal::ZERO || total_saved <= Decimal::ZERO {
        return 0;
    }
    let max = Decimal::from(MAX_PROGRESS_PERCENTAGE);
    let ratio = match total_saved.checked_div(target) {
        Some(ratio) => ratio,
        None => return MAX_PROGRESS_PERCENTAGE,
    };
    let percent = match ratio.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => percent,
        None => return MAX_PROGRESS_PERCENTAGE,
    };
    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .min(max)
        .to_u32()
        .unwrap_or(0)
}
