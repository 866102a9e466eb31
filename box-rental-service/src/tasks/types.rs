use chrono::NaiveDate;
use dialogue_flow::{FlowError, Session};
use serde::{Deserialize, Serialize};

/// Where a booking dialogue currently waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStep {
    AwaitingStart,
    AwaitingEnd,
    AwaitingBox,
    AwaitingName,
    AwaitingPhone,
}

impl BookingStep {
    pub const ALL: [BookingStep; 5] = [
        BookingStep::AwaitingStart,
        BookingStep::AwaitingEnd,
        BookingStep::AwaitingBox,
        BookingStep::AwaitingName,
        BookingStep::AwaitingPhone,
    ];

    /// Id of the task that handles input for this step.
    pub const fn task_id(self) -> &'static str {
        match self {
            BookingStep::AwaitingStart => "start_date",
            BookingStep::AwaitingEnd => "end_date",
            BookingStep::AwaitingBox => "select_box",
            BookingStep::AwaitingName => "renter_name",
            BookingStep::AwaitingPhone => "renter_phone",
        }
    }

    pub fn from_task_id(task_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.task_id() == task_id)
    }
}

/// Everything collected so far in one booking dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Boxes offered for `[start_date, end_date]`
    pub available_boxes: Option<Vec<String>>,
    pub box_id: Option<String>,
    pub renter_name: Option<String>,
    pub renter_phone: Option<String>,
}

/// A renter's live booking dialogue, keyed by their identity.
pub type BookingSession = Session<BookingDraft>;

pub fn current_step(session: &BookingSession) -> Option<BookingStep> {
    BookingStep::from_task_id(&session.current_task_id)
}

/// A field an earlier step should have filled in is missing.
pub(crate) fn missing(field: &str) -> FlowError {
    FlowError::StateError(format!("{field} not set"))
}
