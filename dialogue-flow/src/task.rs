use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, storage::SessionState};

/// Result of a task execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Response to send to the user
    pub response: Option<String>,
    /// Finite set of answers to offer alongside the response
    pub choices: Vec<String>,
    /// Next action to take
    pub next_action: NextAction,
    /// Short description of where the session stands, for logs and inspection
    pub status_message: Option<String>,
    /// Id of the task that produced this result, filled in by the graph
    #[serde(default)]
    pub task_id: String,
}

impl TaskResult {
    pub fn new(response: Option<String>, next_action: NextAction) -> Self {
        Self {
            response,
            choices: Vec::new(),
            next_action,
            status_message: None,
            task_id: String::new(),
        }
    }

    pub fn new_with_status(
        response: Option<String>,
        next_action: NextAction,
        status_message: Option<String>,
    ) -> Self {
        Self {
            status_message,
            ..Self::new(response, next_action)
        }
    }

    /// Attach a list of choices to the response.
    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

/// Defines what should happen after a task completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// Advance to the next task along the default edge and wait for the next input there
    Continue,
    /// Stay on the current task and wait for new input
    WaitForInput,
    /// The dialogue reached its goal (or a defined terminal outcome)
    End,
    /// The dialogue cannot go on; the session is dropped without completing
    Abort,
}

/// One step of a dialogue.
///
/// A task receives the user's input for its step together with the mutable session state and
/// decides where the dialogue goes next. Tasks hold no per-user data themselves.
#[async_trait]
pub trait Task<S: SessionState>: Send + Sync {
    /// Unique identifier for this task
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Handle one input for this step
    async fn run(&self, input: &str, state: &mut S) -> Result<TaskResult>;
}
