use std::collections::HashSet;

use tracing::warn;

use crate::{catalog::BoxCatalog, date::DateRange, models::ReservationRow};

/// Boxes from `catalog` that no stored reservation holds on any day of `query`, in catalog order.
///
/// Rows with a missing cell or an unparseable date are skipped. An empty result means the
/// catalog is fully booked for the range.
pub fn compute_available(
    reservations: &[ReservationRow],
    catalog: &BoxCatalog,
    query: &DateRange,
) -> Vec<String> {
    let busy = busy_boxes(reservations, query);
    catalog
        .boxes()
        .iter()
        .filter(|box_id| !busy.contains(box_id.as_str()))
        .cloned()
        .collect()
}

/// Whether `box_id` is still free for `query`.
pub fn is_box_free(reservations: &[ReservationRow], box_id: &str, query: &DateRange) -> bool {
    !busy_boxes(reservations, query).contains(box_id)
}

fn busy_boxes<'a>(reservations: &'a [ReservationRow], query: &DateRange) -> HashSet<&'a str> {
    let mut busy = HashSet::new();

    for row in reservations {
        match row.booked_interval() {
            Some((box_id, booked)) => {
                if query.overlaps(&booked) {
                    busy.insert(box_id);
                }
            }
            None => warn!(
                box_id = ?row.box_id,
                start_date = ?row.start_date,
                end_date = ?row.end_date,
                "skipping malformed reservation row"
            ),
        }
    }

    busy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;
    use proptest::prelude::*;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(parse_date(start).unwrap(), parse_date(end).unwrap()).unwrap()
    }

    fn booked(box_id: &str, start: &str, end: &str) -> ReservationRow {
        ReservationRow {
            name: Some("Renter".to_string()),
            phone: Some("000".to_string()),
            box_id: Some(box_id.to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    fn xy() -> BoxCatalog {
        BoxCatalog::new(["X", "Y"]).unwrap()
    }

    fn x_booked_first_week() -> Vec<ReservationRow> {
        vec![booked("X", "01.01.2024", "05.01.2024")]
    }

    #[test]
    fn overlapping_query_excludes_booked_box() {
        let available = compute_available(
            &x_booked_first_week(),
            &xy(),
            &range("03.01.2024", "04.01.2024"),
        );
        assert_eq!(available, ["Y"]);
    }

    #[test]
    fn query_after_booking_sees_everything() {
        let available = compute_available(
            &x_booked_first_week(),
            &xy(),
            &range("06.01.2024", "10.01.2024"),
        );
        assert_eq!(available, ["X", "Y"]);
    }

    #[test]
    fn booking_end_day_still_conflicts() {
        let available = compute_available(
            &x_booked_first_week(),
            &xy(),
            &range("05.01.2024", "05.01.2024"),
        );
        assert_eq!(available, ["Y"]);
    }

    #[test]
    fn booking_start_day_still_conflicts() {
        let available = compute_available(
            &x_booked_first_week(),
            &xy(),
            &range("20.12.2023", "01.01.2024"),
        );
        assert_eq!(available, ["Y"]);
    }

    #[test]
    fn fully_booked_catalog_is_empty() {
        let rows = vec![
            booked("X", "01.01.2024", "05.01.2024"),
            booked("Y", "04.01.2024", "09.01.2024"),
        ];
        assert!(compute_available(&rows, &xy(), &range("02.01.2024", "04.01.2024")).is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows = vec![
            ReservationRow {
                box_id: Some("X".to_string()),
                start_date: Some("01.01.2024".to_string()),
                ..Default::default()
            },
            booked("X", "not a date", "05.01.2024"),
            booked("Y", "01.01.2024", "05.01.2024"),
        ];
        let available = compute_available(&rows, &xy(), &range("02.01.2024", "03.01.2024"));
        assert_eq!(available, ["X"]);
    }

    #[test]
    fn bookings_for_unknown_boxes_are_ignored() {
        let rows = vec![booked("Z", "01.01.2024", "05.01.2024")];
        let available = compute_available(&rows, &xy(), &range("01.01.2024", "05.01.2024"));
        assert_eq!(available, ["X", "Y"]);
    }

    #[test]
    fn repeated_queries_agree() {
        let rows = x_booked_first_week();
        let query = range("03.01.2024", "08.01.2024");
        assert_eq!(
            compute_available(&rows, &xy(), &query),
            compute_available(&rows, &xy(), &query)
        );
    }

    #[test]
    fn single_box_check_matches_catalog_scan() {
        let rows = x_booked_first_week();
        let query = range("04.01.2024", "06.01.2024");
        assert!(!is_box_free(&rows, "X", &query));
        assert!(is_box_free(&rows, "Y", &query));
    }

    fn day(offset: i64) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    proptest! {
        #[test]
        fn ranges_one_day_apart_never_conflict(start in 0i64..500, len_a in 0i64..30, len_b in 0i64..30) {
            let a = DateRange::new(day(start), day(start + len_a)).unwrap();
            let b = DateRange::new(day(start + len_a + 1), day(start + len_a + 1 + len_b)).unwrap();
            prop_assert!(!a.overlaps(&b));
            prop_assert!(!b.overlaps(&a));
        }

        #[test]
        fn ranges_sharing_a_boundary_day_conflict(start in 0i64..500, len_a in 0i64..30, len_b in 0i64..30) {
            let a = DateRange::new(day(start), day(start + len_a)).unwrap();
            let b = DateRange::new(day(start + len_a), day(start + len_a + len_b)).unwrap();
            prop_assert!(a.overlaps(&b));
            prop_assert!(b.overlaps(&a));
        }

        #[test]
        fn available_boxes_follow_catalog_order(
            booked_mask in proptest::collection::vec(any::<bool>(), 10),
        ) {
            let catalog = BoxCatalog::default();
            let rows: Vec<ReservationRow> = catalog
                .boxes()
                .iter()
                .zip(&booked_mask)
                .filter(|(_, booked)| **booked)
                .map(|(box_id, _)| booked(box_id, "01.01.2024", "05.01.2024"))
                .collect();

            let available = compute_available(&rows, &catalog, &range("03.01.2024", "03.01.2024"));

            let expected: Vec<String> = catalog
                .boxes()
                .iter()
                .zip(&booked_mask)
                .filter(|(_, booked)| !**booked)
                .map(|(box_id, _)| box_id.clone())
                .collect();
            prop_assert_eq!(available, expected);
        }
    }
}
