use async_trait::async_trait;
use dialogue_flow::{NextAction, Result, Task, TaskResult};
use tracing::{info, warn};

use crate::messages;

use super::types::{BookingDraft, BookingStep, missing};

/// Third step: pick one of the boxes offered for the chosen range.
pub struct SelectBoxTask;

#[async_trait]
impl Task<BookingDraft> for SelectBoxTask {
    fn id(&self) -> &str {
        BookingStep::AwaitingBox.task_id()
    }

    async fn run(&self, input: &str, state: &mut BookingDraft) -> Result<TaskResult> {
        info!("running task: {}", self.id());

        let offered = state
            .available_boxes
            .as_ref()
            .ok_or_else(|| missing("available_boxes"))?;

        let choice = input.trim();
        if !offered.iter().any(|box_id| box_id == choice) {
            warn!(choice, "selection is not among offered boxes");
            return Ok(TaskResult::new(
                Some(messages::UNKNOWN_BOX.to_string()),
                NextAction::WaitForInput,
            )
            .with_choices(offered.clone()));
        }

        state.box_id = Some(choice.to_string());
        Ok(TaskResult::new_with_status(
            Some(messages::ASK_NAME.to_string()),
            NextAction::Continue,
            Some(format!("{choice} selected")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offered(boxes: &[&str]) -> BookingDraft {
        BookingDraft {
            available_boxes: Some(boxes.iter().map(|b| b.to_string()).collect()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn offered_box_is_accepted() {
        let mut draft = offered(&["Бокс 3", "Бокс 10 LUX"]);
        let result = SelectBoxTask.run("Бокс 10 LUX", &mut draft).await.unwrap();

        assert_eq!(result.next_action, NextAction::Continue);
        assert_eq!(result.response.as_deref(), Some(messages::ASK_NAME));
        assert_eq!(draft.box_id.as_deref(), Some("Бокс 10 LUX"));
    }

    #[tokio::test]
    async fn unknown_box_reprompts_with_offer() {
        let mut draft = offered(&["Бокс 3", "Бокс 4"]);
        let result = SelectBoxTask.run("Бокс 7", &mut draft).await.unwrap();

        assert_eq!(result.next_action, NextAction::WaitForInput);
        assert_eq!(result.choices, ["Бокс 3", "Бокс 4"]);
        assert!(draft.box_id.is_none());
    }

    #[tokio::test]
    async fn selection_must_match_exactly() {
        let mut draft = offered(&["Бокс 3"]);
        let result = SelectBoxTask.run("бокс 3", &mut draft).await.unwrap();

        assert_eq!(result.next_action, NextAction::WaitForInput);
        assert!(draft.box_id.is_none());
    }
}
