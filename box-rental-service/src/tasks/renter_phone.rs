use std::sync::Arc;

use async_trait::async_trait;
use dialogue_flow::{NextAction, Result, Task, TaskResult};
use tracing::{error, info, warn};

use crate::{
    availability::is_box_free,
    date::DateRange,
    messages,
    models::Reservation,
    store::ReservationStore,
};

use super::types::{BookingDraft, BookingStep, missing};

/// Last step: the renter's phone, then the reservation is written.
///
/// Right before the write the chosen box is checked against the store once more, so a box
/// taken by another renter since the offer was made is not booked twice.
pub struct RenterPhoneTask {
    store: Arc<dyn ReservationStore>,
}

impl RenterPhoneTask {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    fn aborted(response: String, status: &str) -> Result<TaskResult> {
        Ok(TaskResult::new_with_status(
            Some(response),
            NextAction::Abort,
            Some(status.to_string()),
        ))
    }
}

#[async_trait]
impl Task<BookingDraft> for RenterPhoneTask {
    fn id(&self) -> &str {
        BookingStep::AwaitingPhone.task_id()
    }

    async fn run(&self, input: &str, state: &mut BookingDraft) -> Result<TaskResult> {
        info!("running task: {}", self.id());

        let phone = input.trim();
        if phone.is_empty() {
            return Ok(TaskResult::new(
                Some(messages::EMPTY_PHONE.to_string()),
                NextAction::WaitForInput,
            ));
        }
        state.renter_phone = Some(phone.to_string());

        let reservation = Reservation {
            box_id: state.box_id.clone().ok_or_else(|| missing("box_id"))?,
            start: state.start_date.ok_or_else(|| missing("start_date"))?,
            end: state.end_date.ok_or_else(|| missing("end_date"))?,
            renter_name: state.renter_name.clone().ok_or_else(|| missing("renter_name"))?,
            renter_phone: phone.to_string(),
        };
        let range = DateRange {
            start: reservation.start,
            end: reservation.end,
        };

        match self.store.list_reservations().await {
            Ok(rows) if is_box_free(&rows, &reservation.box_id, &range) => {}
            Ok(_) => {
                warn!(box_id = %reservation.box_id, "box was booked by someone else meanwhile");
                return Self::aborted(
                    messages::box_just_taken(&reservation.box_id),
                    "box no longer free",
                );
            }
            Err(e) => {
                error!(error = %e, "failed to re-check reservations before commit");
                return Self::aborted(
                    messages::BOOKING_NOT_SAVED.to_string(),
                    "reservation store unreadable",
                );
            }
        }

        if let Err(e) = self.store.append(&reservation).await {
            error!(error = %e, box_id = %reservation.box_id, "failed to save reservation");
            return Self::aborted(
                messages::BOOKING_NOT_SAVED.to_string(),
                "reservation not saved",
            );
        }

        info!(
            box_id = %reservation.box_id,
            start = %reservation.start,
            end = %reservation.end,
            "reservation saved"
        );

        Ok(TaskResult::new_with_status(
            Some(messages::booking_confirmed(
                &reservation.renter_name,
                &reservation.box_id,
                reservation.start,
                reservation.end,
            )),
            NextAction::End,
            Some(format!("{} booked", reservation.box_id)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::ReservationRow,
        store::{InMemoryReservationStore, StoreError},
    };
    use chrono::NaiveDate;

    /// Reads fine, refuses every write.
    struct ReadOnlyStore;

    #[async_trait]
    impl ReservationStore for ReadOnlyStore {
        async fn list_reservations(&self) -> std::result::Result<Vec<ReservationRow>, StoreError> {
            Ok(Vec::new())
        }

        async fn append(&self, _: &Reservation) -> std::result::Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }
    }

    fn complete_draft() -> BookingDraft {
        BookingDraft {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 3),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 4),
            available_boxes: Some(vec!["X".to_string(), "Y".to_string()]),
            box_id: Some("X".to_string()),
            renter_name: Some("Ivan".to_string()),
            renter_phone: None,
        }
    }

    #[tokio::test]
    async fn commits_and_confirms() {
        let store = Arc::new(InMemoryReservationStore::new());
        let mut draft = complete_draft();

        let result = RenterPhoneTask::new(store.clone())
            .run("12345", &mut draft)
            .await
            .unwrap();

        assert_eq!(result.next_action, NextAction::End);
        assert_eq!(
            result.response.as_deref(),
            Some("Спасибо, Ivan! Вы забронировали X с 03.01.2024 по 04.01.2024.")
        );

        let rows = store.list_reservations().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].phone.as_deref(), Some("12345"));
    }

    #[tokio::test]
    async fn blank_phone_reprompts() {
        let store = Arc::new(InMemoryReservationStore::new());
        let mut draft = complete_draft();

        let result = RenterPhoneTask::new(store.clone())
            .run("  ", &mut draft)
            .await
            .unwrap();

        assert_eq!(result.next_action, NextAction::WaitForInput);
        assert!(store.list_reservations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_never_confirmed() {
        let mut draft = complete_draft();
        let result = RenterPhoneTask::new(Arc::new(ReadOnlyStore))
            .run("12345", &mut draft)
            .await
            .unwrap();

        assert_eq!(result.next_action, NextAction::Abort);
        assert_eq!(result.response.as_deref(), Some(messages::BOOKING_NOT_SAVED));
    }

    #[tokio::test]
    async fn box_taken_meanwhile_is_not_booked_twice() {
        let store = Arc::new(InMemoryReservationStore::with_rows(vec![ReservationRow {
            name: Some("Olga".to_string()),
            phone: Some("555".to_string()),
            box_id: Some("X".to_string()),
            start_date: Some("04.01.2024".to_string()),
            end_date: Some("06.01.2024".to_string()),
        }]));
        let mut draft = complete_draft();

        let result = RenterPhoneTask::new(store.clone())
            .run("12345", &mut draft)
            .await
            .unwrap();

        assert_eq!(result.next_action, NextAction::Abort);
        assert_eq!(result.response, Some(messages::box_just_taken("X")));
        assert_eq!(store.list_reservations().await.unwrap().len(), 1);
    }
}
