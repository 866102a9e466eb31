use async_trait::async_trait;
use dialogue_flow::{NextAction, Result, Task, TaskResult};
use tracing::{debug, info};

use crate::{date::parse_date, messages};

use super::types::{BookingDraft, BookingStep};

/// First step: the day the rental begins.
pub struct StartDateTask;

#[async_trait]
impl Task<BookingDraft> for StartDateTask {
    fn id(&self) -> &str {
        BookingStep::AwaitingStart.task_id()
    }

    async fn run(&self, input: &str, state: &mut BookingDraft) -> Result<TaskResult> {
        info!("running task: {}", self.id());

        let Some(start) = parse_date(input) else {
            debug!(input, "rejected start date");
            return Ok(TaskResult::new(
                Some(messages::INVALID_DATE.to_string()),
                NextAction::WaitForInput,
            ));
        };

        state.start_date = Some(start);
        Ok(TaskResult::new_with_status(
            Some(messages::ASK_END_DATE.to_string()),
            NextAction::Continue,
            Some(format!("start date set to {start}")),
        ))
    }
}
