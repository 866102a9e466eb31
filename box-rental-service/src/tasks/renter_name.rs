use async_trait::async_trait;
use dialogue_flow::{NextAction, Result, Task, TaskResult};
use tracing::info;

use crate::messages;

use super::types::{BookingDraft, BookingStep};

pub struct RenterNameTask;

#[async_trait]
impl Task<BookingDraft> for RenterNameTask {
    fn id(&self) -> &str {
        BookingStep::AwaitingName.task_id()
    }

    async fn run(&self, input: &str, state: &mut BookingDraft) -> Result<TaskResult> {
        info!("running task: {}", self.id());

        let name = input.trim();
        if name.is_empty() {
            return Ok(TaskResult::new(
                Some(messages::EMPTY_NAME.to_string()),
                NextAction::WaitForInput,
            ));
        }

        state.renter_name = Some(name.to_string());
        Ok(TaskResult::new(
            Some(messages::ASK_PHONE.to_string()),
            NextAction::Continue,
        ))
    }
}
