use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Text format used both in conversation and in the reservation store.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse `D.M.YYYY` / `DD.MM.YYYY`. The year must have exactly four digits.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if !has_date_shape(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// `%Y` alone would also take `24`, `+2024` or inner whitespace.
fn has_date_shape(text: &str) -> bool {
    let mut parts = text.split('.');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    digits(day, 1, 2) && digits(month, 1, 2) && digits(year, 4, 4)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Closed date range `[start, end]`; both days belong to the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `None` when `end` comes before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Ranges overlap when they share at least one day, boundaries included.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !(self.end < other.start || self.start > other.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    #[test]
    fn parses_and_formats_day_month_year() {
        let date = d("03.01.2024");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(format_date(date), "03.01.2024");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_date("  15.06.2025\n"), Some(d("15.06.2025")));
    }

    #[test]
    fn rejects_other_formats_and_impossible_dates() {
        assert_eq!(parse_date("2024-01-03"), None);
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("03.01.24"), None);
        assert_eq!(parse_date("03.01.+2024"), None);
        assert_eq!(parse_date("03. 01.2024"), None);
        assert_eq!(parse_date("03.01.02024"), None);
        assert_eq!(parse_date("03.01.2024."), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn accepts_single_digit_day_and_month() {
        assert_eq!(parse_date("3.1.2024"), Some(d("03.01.2024")));
    }

    #[test]
    fn range_rejects_end_before_start() {
        assert!(DateRange::new(d("05.01.2024"), d("04.01.2024")).is_none());
        assert!(DateRange::new(d("05.01.2024"), d("05.01.2024")).is_some());
    }

    #[test]
    fn shared_boundary_day_overlaps() {
        let a = DateRange::new(d("01.01.2024"), d("05.01.2024")).unwrap();
        let b = DateRange::new(d("05.01.2024"), d("07.01.2024")).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn next_day_does_not_overlap() {
        let a = DateRange::new(d("01.01.2024"), d("05.01.2024")).unwrap();
        let b = DateRange::new(d("06.01.2024"), d("07.01.2024")).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }
}
