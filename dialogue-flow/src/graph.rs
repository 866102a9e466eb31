use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{FlowError, Result},
    storage::{Session, SessionState},
    task::{NextAction, Task, TaskResult},
};

/// Edge between tasks in the graph
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// A graph of tasks that a session walks through one input at a time
pub struct Graph<S: SessionState> {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task<S>>>,
    edges: Vec<Edge>,
    start_task_id: Option<String>,
}

impl<S: SessionState> Graph<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: HashMap::new(),
            edges: Vec::new(),
            start_task_id: None,
        }
    }

    /// Run the session's current task with `input` and move the session accordingly.
    ///
    /// Exactly one task runs per call. A task answering [`NextAction::Continue`] moves the
    /// session along its outgoing edge, so the following input goes to the next task.
    pub async fn execute_session(
        &self,
        session: &mut Session<S>,
        input: &str,
    ) -> Result<ExecutionResult> {
        let result = self
            .execute_single_task(&session.current_task_id, input, &mut session.state)
            .await?;

        session.status_message = result.status_message.clone();
        session.touch();

        let status = match result.next_action {
            NextAction::Continue => {
                match self.find_next_task(&result.task_id) {
                    Some(next_task_id) => {
                        debug!(from = %result.task_id, to = %next_task_id, "advancing session");
                        session.current_task_id = next_task_id;
                        ExecutionStatus::WaitingForInput
                    }
                    // Continuing from the last task has nowhere to go
                    None => ExecutionStatus::Completed,
                }
            }
            NextAction::WaitForInput => {
                session.current_task_id = result.task_id.clone();
                ExecutionStatus::WaitingForInput
            }
            NextAction::End => ExecutionStatus::Completed,
            NextAction::Abort => ExecutionStatus::Aborted,
        };

        Ok(ExecutionResult {
            response: result.response,
            choices: result.choices,
            status,
        })
    }

    async fn execute_single_task(
        &self,
        task_id: &str,
        input: &str,
        state: &mut S,
    ) -> Result<TaskResult> {
        let task = self
            .tasks
            .get(task_id)
            .ok_or_else(|| FlowError::TaskNotFound(task_id.to_string()))?;

        let mut result = task.run(input, state).await?;

        // Set the task_id in the result to track which task generated it
        result.task_id = task_id.to_string();

        Ok(result)
    }

    /// Find the task reached from `current_task_id` along its outgoing edge
    pub fn find_next_task(&self, current_task_id: &str) -> Option<String> {
        self.edges
            .iter()
            .find(|edge| edge.from == current_task_id)
            .map(|edge| edge.to.clone())
    }

    /// Get the start task ID
    pub fn start_task_id(&self) -> Option<&str> {
        self.start_task_id.as_deref()
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }
}

/// Builder for creating graphs
pub struct GraphBuilder<S: SessionState> {
    graph: Graph<S>,
}

impl<S: SessionState> GraphBuilder<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: Graph::new(id),
        }
    }

    /// Add a task; the first one added becomes the start task
    pub fn add_task(mut self, task: Arc<dyn Task<S>>) -> Self {
        let task_id = task.id().to_string();
        if self.graph.start_task_id.is_none() {
            self.graph.start_task_id = Some(task_id.clone());
        }
        self.graph.tasks.insert(task_id, task);
        self
    }

    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.graph.edges.push(Edge {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn build(self) -> Graph<S> {
        self.graph
    }
}

/// Outcome of running one step of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub response: Option<String>,
    pub choices: Vec<String>,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Waiting for user input to continue
    WaitingForInput,
    /// Dialogue reached a terminal outcome
    Completed,
    /// Dialogue was abandoned because a step could not go on
    Aborted,
}

impl ExecutionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExecutionStatus::WaitingForInput)
    }
}
