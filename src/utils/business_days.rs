use chrono::{Datelike, NaiveDate, Weekday};

/// Counts Monday–Friday dates in `start..=end`.
///
/// Returns 0 when either date is missing or the range is inverted. Public
/// holidays are not known to the client; the server has the final word on
/// the charged quantity.
pub fn count_business_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u32 {
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s <= e => (s, e),
        _ => return 0,
    };

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

/// Same as [`count_business_days`] for raw `YYYY-MM-DD` form input; blank
/// or unparseable input counts as missing.
pub fn count_business_days_str(start: &str, end: &str) -> u32 {
    count_business_days(parse_date(start), parse_date(end))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
