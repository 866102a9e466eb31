//! Routes renters' messages to their booking dialogue.
//!
//! The driver owns session lifetimes: `/start` creates (or replaces) a renter's session,
//! `/cancel` and every terminal step discard it, other commands never reach a step, and
//! everything else goes to the step the session is waiting on.

use std::sync::Arc;

use dialogue_flow::{ExecutionStatus, FlowError, FlowRunner, Result, SessionStorage};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    messages,
    tasks::{BookingDraft, BookingSession, BookingStep, current_step},
};

/// Whether the renter is inside a booking dialogue after a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStatus {
    /// A session is live and waits for the next message
    Active,
    /// The session just ended (booked, cancelled, nothing free, or failed)
    Finished,
    /// There was no session to talk to
    Idle,
}

/// Text to send back, plus the choices to offer as buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub choices: Vec<String>,
    pub status: DialogueStatus,
}

impl Reply {
    fn new(text: impl Into<String>, status: DialogueStatus) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
            status,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Start,
    Cancel,
    Other(&'a str),
}

/// Any text whose first word starts with `/`, also in the `/start@bot_name` form chat
/// clients send.
fn parse_command(text: &str) -> Option<Command<'_>> {
    let word = text.split_whitespace().next()?;
    if !word.starts_with('/') {
        return None;
    }
    let command = word.split('@').next().unwrap_or(word);
    Some(match command {
        messages::START_COMMAND => Command::Start,
        messages::CANCEL_COMMAND => Command::Cancel,
        other => Command::Other(other),
    })
}

#[derive(Clone)]
pub struct DialogueDriver {
    runner: FlowRunner<BookingDraft>,
}

impl DialogueDriver {
    pub fn new(runner: FlowRunner<BookingDraft>) -> Self {
        Self { runner }
    }

    fn sessions(&self) -> &Arc<dyn SessionStorage<BookingDraft>> {
        self.runner.storage()
    }

    /// Handle one inbound message from `user_id`.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> Reply {
        match parse_command(text) {
            Some(Command::Start) => self.start(user_id).await,
            Some(Command::Cancel) => self.cancel(user_id).await,
            Some(Command::Other(command)) => self.unknown_command(user_id, command).await,
            None => self.continue_dialogue(user_id, text).await,
        }
    }

    /// Begin a new booking for `user_id`, dropping any dialogue already in progress.
    pub async fn start(&self, user_id: &str) -> Reply {
        match self.runner.start(user_id).await {
            Ok(_) => {
                info!(user_id, "booking session started");
                Reply::new(messages::ASK_START_DATE, DialogueStatus::Active)
            }
            Err(e) => {
                error!(user_id, error = %e, "failed to start booking session");
                Reply::new(messages::SOMETHING_WENT_WRONG, DialogueStatus::Finished)
            }
        }
    }

    /// Abandon `user_id`'s booking at whatever step it is.
    pub async fn cancel(&self, user_id: &str) -> Reply {
        let existing = match self.sessions().get(user_id).await {
            Ok(existing) => existing,
            Err(e) => {
                error!(user_id, error = %e, "failed to load session for cancel");
                None
            }
        };

        if let Err(e) = self.sessions().delete(user_id).await {
            error!(user_id, error = %e, "failed to discard session");
        }

        match existing {
            Some(session) => {
                info!(user_id, step = ?current_step(&session), "booking cancelled");
                Reply::new(messages::CANCELLED, DialogueStatus::Finished)
            }
            None => Reply::new(messages::NO_ACTIVE_BOOKING, DialogueStatus::Idle),
        }
    }

    /// Commands are never step input; the session stays as it is.
    async fn unknown_command(&self, user_id: &str, command: &str) -> Reply {
        let session = match self.sessions().get(user_id).await {
            Ok(session) => session,
            Err(e) => {
                error!(user_id, error = %e, "failed to load session");
                None
            }
        };
        info!(user_id, command, "ignoring unknown command");

        let Some(session) = session else {
            return Reply::new(messages::UNKNOWN_COMMAND, DialogueStatus::Idle);
        };
        let mut reply = Reply::new(messages::UNKNOWN_COMMAND, DialogueStatus::Active);
        // Keep the box keyboard up while a choice is pending.
        if current_step(&session) == Some(BookingStep::AwaitingBox) {
            reply.choices = session.state.available_boxes.unwrap_or_default();
        }
        reply
    }

    async fn continue_dialogue(&self, user_id: &str, text: &str) -> Reply {
        match self.runner.run(user_id, text).await {
            Ok(result) => {
                let status = match result.status {
                    ExecutionStatus::WaitingForInput => DialogueStatus::Active,
                    ExecutionStatus::Completed | ExecutionStatus::Aborted => {
                        info!(user_id, outcome = ?result.status, "booking session ended");
                        DialogueStatus::Finished
                    }
                };
                Reply {
                    text: result.response.unwrap_or_default(),
                    choices: result.choices,
                    status,
                }
            }
            Err(FlowError::SessionNotFound(_)) => {
                Reply::new(messages::NO_ACTIVE_BOOKING, DialogueStatus::Idle)
            }
            Err(e) => {
                error!(user_id, error = %e, "booking step failed");
                if let Err(e) = self.sessions().delete(user_id).await {
                    warn!(user_id, error = %e, "failed to discard broken session");
                }
                Reply::new(messages::SOMETHING_WENT_WRONG, DialogueStatus::Finished)
            }
        }
    }

    /// The live session of `user_id`, if any.
    pub async fn session(&self, user_id: &str) -> Result<Option<BookingSession>> {
        self.sessions().get(user_id).await
    }

    /// Drop sessions nobody has touched for `max_idle`.
    pub async fn evict_idle(&self, max_idle: chrono::Duration) -> Result<usize> {
        self.sessions().evict_idle(max_idle).await
    }
}
