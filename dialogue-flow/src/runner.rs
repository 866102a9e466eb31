//! FlowRunner – convenience wrapper that loads a session, executes exactly **one** graph step, and
//! writes the outcome back to storage.
//!
//! A session that is still waiting for input is saved for the next round-trip. A session that
//! reached a terminal status (completed or aborted) is deleted, so storage only ever holds live
//! dialogues.
//!
//! Use [`Graph::execute_session`] directly when you need to inspect the intermediate
//! [`Session`](crate::Session) before it is persisted.

use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{FlowError, Result},
    graph::{ExecutionResult, Graph},
    storage::{Session, SessionState, SessionStorage},
};

/// High-level helper that orchestrates the _load → execute → save/delete_ pattern.
pub struct FlowRunner<S: SessionState> {
    graph: Arc<Graph<S>>,
    storage: Arc<dyn SessionStorage<S>>,
}

impl<S: SessionState> Clone for FlowRunner<S> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            storage: self.storage.clone(),
        }
    }
}

impl<S: SessionState> FlowRunner<S> {
    pub fn new(graph: Arc<Graph<S>>, storage: Arc<dyn SessionStorage<S>>) -> Self {
        Self { graph, storage }
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage<S>> {
        &self.storage
    }

    /// Create a fresh session at the graph's start task, replacing any session under the same id.
    pub async fn start(&self, session_id: &str) -> Result<Session<S>> {
        let start_task_id = self
            .graph
            .start_task_id()
            .ok_or_else(|| FlowError::TaskNotFound(format!("start task of graph {}", self.graph.id)))?;

        let session = Session::new_from_task(session_id, start_task_id);
        self.storage.save(session.clone()).await?;
        Ok(session)
    }

    /// Execute **exactly one** task for the given `session_id` with `input`.
    pub async fn run(&self, session_id: &str, input: &str) -> Result<ExecutionResult> {
        let mut session = self
            .storage
            .get(session_id)
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.to_string()))?;

        let result = self.graph.execute_session(&mut session, input).await?;

        if result.status.is_terminal() {
            debug!(session_id, status = ?result.status, "session finished");
            self.storage.delete(session_id).await?;
        } else {
            self.storage.save(session).await?;
        }

        Ok(result)
    }
}
