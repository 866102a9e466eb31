use std::sync::Arc;

use async_trait::async_trait;
use dialogue_flow::{NextAction, Result, Task, TaskResult};
use tracing::{error, info};

use crate::{
    availability::compute_available,
    catalog::BoxCatalog,
    date::{DateRange, parse_date},
    messages,
    store::ReservationStore,
};

use super::types::{BookingDraft, BookingStep, missing};

/// Second step: the last rental day, followed by the availability check.
pub struct EndDateTask {
    store: Arc<dyn ReservationStore>,
    catalog: Arc<BoxCatalog>,
}

impl EndDateTask {
    pub fn new(store: Arc<dyn ReservationStore>, catalog: Arc<BoxCatalog>) -> Self {
        Self { store, catalog }
    }
}

#[async_trait]
impl Task<BookingDraft> for EndDateTask {
    fn id(&self) -> &str {
        BookingStep::AwaitingEnd.task_id()
    }

    async fn run(&self, input: &str, state: &mut BookingDraft) -> Result<TaskResult> {
        info!("running task: {}", self.id());

        let Some(end) = parse_date(input) else {
            return Ok(TaskResult::new(
                Some(messages::INVALID_DATE.to_string()),
                NextAction::WaitForInput,
            ));
        };

        let start = state.start_date.ok_or_else(|| missing("start_date"))?;
        let Some(range) = DateRange::new(start, end) else {
            return Ok(TaskResult::new(
                Some(messages::END_BEFORE_START.to_string()),
                NextAction::WaitForInput,
            ));
        };

        let reservations = match self.store.list_reservations().await {
            Ok(reservations) => reservations,
            Err(e) => {
                error!(error = %e, "failed to read reservations");
                return Ok(TaskResult::new_with_status(
                    Some(messages::AVAILABILITY_CHECK_FAILED.to_string()),
                    NextAction::Abort,
                    Some("reservation store unreadable".to_string()),
                ));
            }
        };

        state.end_date = Some(end);
        let available = compute_available(&reservations, &self.catalog, &range);
        info!(
            start = %range.start,
            end = %range.end,
            available = available.len(),
            "availability computed"
        );

        if available.is_empty() {
            return Ok(TaskResult::new_with_status(
                Some(messages::NO_AVAILABILITY.to_string()),
                NextAction::End,
                Some("no boxes free for the requested range".to_string()),
            ));
        }

        state.available_boxes = Some(available.clone());
        Ok(TaskResult::new_with_status(
            Some(messages::CHOOSE_BOX.to_string()),
            NextAction::Continue,
            Some(format!("{} boxes offered", available.len())),
        )
        .with_choices(available))
    }
}
