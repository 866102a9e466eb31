use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::error::Result;

/// Data a dialogue accumulates between steps.
pub trait SessionState:
    Clone + Default + Send + Sync + Serialize + DeserializeOwned + 'static
{
}

impl<T> SessionState for T where
    T: Clone + Default + Send + Sync + Serialize + DeserializeOwned + 'static
{
}

/// Session information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "S: SessionState")]
pub struct Session<S: SessionState> {
    pub id: String,
    pub current_task_id: String,
    pub status_message: Option<String>,
    pub state: S,
    pub updated_at: DateTime<Utc>,
}

impl<S: SessionState> Session<S> {
    pub fn new_from_task(sid: impl Into<String>, task_id: &str) -> Self {
        Self {
            id: sid.into(),
            current_task_id: task_id.to_string(),
            status_message: None,
            state: S::default(),
            updated_at: Utc::now(),
        }
    }

    /// Mark the session as active now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> bool {
        now - self.updated_at > max_idle
    }
}

/// Trait for storing and retrieving sessions
#[async_trait]
pub trait SessionStorage<S: SessionState>: Send + Sync {
    async fn save(&self, session: Session<S>) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Session<S>>>;
    async fn delete(&self, id: &str) -> Result<()>;
    /// Drop every session untouched for longer than `max_idle`, returning how many went.
    async fn evict_idle(&self, max_idle: Duration) -> Result<usize>;
}

/// In-memory implementation of SessionStorage
pub struct InMemorySessionStorage<S: SessionState> {
    sessions: Arc<DashMap<String, Session<S>>>,
}

impl<S: SessionState> InMemorySessionStorage<S> {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<S: SessionState> Default for InMemorySessionStorage<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S: SessionState> SessionStorage<S> for InMemorySessionStorage<S> {
    async fn save(&self, session: Session<S>) -> Result<()> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session<S>>> {
        Ok(self.sessions.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn evict_idle(&self, max_idle: Duration) -> Result<usize> {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_idle(max_idle, now));
        Ok(before.saturating_sub(self.sessions.len()))
    }
}
