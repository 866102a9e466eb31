use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{DateRange, format_date, parse_date};

/// A committed booking of one box for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub box_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub renter_name: String,
    pub renter_phone: String,
}

impl Reservation {
    /// The row written to the store: dates as `DD.MM.YYYY` text.
    pub fn to_row(&self) -> ReservationRow {
        ReservationRow {
            name: Some(self.renter_name.clone()),
            phone: Some(self.renter_phone.clone()),
            box_id: Some(self.box_id.clone()),
            start_date: Some(format_date(self.start)),
            end_date: Some(format_date(self.end)),
        }
    }
}

/// One row of the reservation table as stored, in column order
/// `Name, Phone, Box, Start date, End date`. Every cell may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRow {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub box_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReservationRow {
    /// Box and booked range, or `None` if a cell is missing, blank, or not a valid date.
    ///
    /// Stored ranges are taken as written, even inverted ones; the overlap test stays the
    /// plain `!(end < d1 || start > d2)` comparison against them.
    pub fn booked_interval(&self) -> Option<(&str, DateRange)> {
        let box_id = self.box_id.as_deref().filter(|b| !b.is_empty())?;
        let start = parse_date(self.start_date.as_deref()?)?;
        let end = parse_date(self.end_date.as_deref()?)?;
        Some((box_id, DateRange { start, end }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(box_id: Option<&str>, start: Option<&str>, end: Option<&str>) -> ReservationRow {
        ReservationRow {
            box_id: box_id.map(String::from),
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn reservation_row_uses_text_dates() {
        let reservation = Reservation {
            box_id: "Бокс 3".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            renter_name: "Ivan".to_string(),
            renter_phone: "12345".to_string(),
        };

        let row = reservation.to_row();
        assert_eq!(row.start_date.as_deref(), Some("01.01.2024"));
        assert_eq!(row.end_date.as_deref(), Some("05.01.2024"));
        assert_eq!(row.name.as_deref(), Some("Ivan"));
        assert_eq!(row.phone.as_deref(), Some("12345"));
    }

    #[test]
    fn incomplete_rows_have_no_interval() {
        assert!(row(None, Some("01.01.2024"), Some("02.01.2024")).booked_interval().is_none());
        assert!(row(Some(""), Some("01.01.2024"), Some("02.01.2024")).booked_interval().is_none());
        assert!(row(Some("X"), None, Some("02.01.2024")).booked_interval().is_none());
        assert!(row(Some("X"), Some("01.01.2024"), None).booked_interval().is_none());
    }

    #[test]
    fn unparseable_rows_have_no_interval() {
        assert!(row(Some("X"), Some("2024-01-01"), Some("02.01.2024")).booked_interval().is_none());
        assert!(row(Some("X"), Some("01.01.2024"), Some("32.01.2024")).booked_interval().is_none());
        assert!(row(Some("X"), Some("01.01.24"), Some("05.01.2024")).booked_interval().is_none());
    }

    #[test]
    fn valid_row_yields_interval() {
        let r = row(Some("X"), Some("01.01.2024"), Some("05.01.2024"));
        let (box_id, range) = r.booked_interval().unwrap();
        assert_eq!(box_id, "X");
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
