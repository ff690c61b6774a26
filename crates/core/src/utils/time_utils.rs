use chrono::NaiveDate;

use crate::constants::ISO_DATE_FORMAT;

/// Normalizes a loosely formatted reference date to a calendar date.
///
/// Accepts zero-padded or non-padded `Y-M-D` (`2024-3-1`), and timestamps
/// whose date part is followed by `T` or a space (`2024-03-01T00:00:00`).
/// Returns `None` for anything that does not name a real calendar day.
pub fn normalize_reference_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    let mut parts = date_part.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let year: i32 = parse_component(year, 4)?;
    let month: u32 = parse_component(month, 2)?;
    let day: u32 = parse_component(day, 2)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Canonical `YYYY-MM-DD` text of a date.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

fn parse_component<T: std::str::FromStr>(s: &str, max_len: usize) -> Option<T> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_padded_and_unpadded() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(normalize_reference_date("2024-03-01"), Some(expected));
        assert_eq!(normalize_reference_date("2024-3-1"), Some(expected));
        assert_eq!(normalize_reference_date(" 2024-3-01 "), Some(expected));
    }

    #[test]
    fn test_normalize_truncates_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            normalize_reference_date("2024-12-31T23:59:59"),
            Some(expected)
        );
        assert_eq!(normalize_reference_date("2024-12-31 08:00"), Some(expected));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_reference_date(""), None);
        assert_eq!(normalize_reference_date("March 1"), None);
        assert_eq!(normalize_reference_date("2024-02-30"), None);
        assert_eq!(normalize_reference_date("2024-01-01-01"), None);
        assert_eq!(normalize_reference_date("2024-+1-01"), None);
    }

    #[test]
    fn test_format_iso_date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_iso_date(date), "2024-03-01");
    }
}
