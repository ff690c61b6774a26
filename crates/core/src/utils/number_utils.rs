use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a decimal amount, returning `None` for anything unparseable.
///
/// Plain (`"1000.50"`) and scientific (`"1e3"`) notation are accepted;
/// surrounding whitespace and a leading `+` are ignored.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parses an amount for aggregation, degrading to zero when malformed.
pub fn amount_or_zero(raw: &str) -> Decimal {
    parse_amount(raw).unwrap_or_else(|| {
        debug!("Ignoring malformed amount '{}'", raw);
        Decimal::ZERO
    })
}
