//! In-memory task store.
//!
//! Records live in a `BTreeMap` keyed by identity. Because identities are
//! handed out by a counter that only grows, key order is insertion order.
//! State is initialized once and dropped with the process; nothing survives
//! a restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Task, TaskId, TaskPatch};
use crate::infrastructure::{StoreError, TaskStore};

/// First identity handed out by a fresh store.
const FIRST_TASK_ID: u64 = 1;

#[derive(Debug)]
struct StoreState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: u64,
}

impl StoreState {
    const fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: FIRST_TASK_ID,
        }
    }

    const fn allocate_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, StoreError> {
        self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))
    }
}

/// In-memory implementation of [`TaskStore`].
///
/// Cloning shares the underlying state.
///
/// # Example
///
/// ```
/// use task_manager::infrastructure::{InMemoryTaskStore, TaskStore};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = InMemoryTaskStore::new();
/// let task = store.create("Buy milk".to_string(), None).await;
/// assert_eq!(task.id.value(), 1);
/// assert!(!task.completed);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryTaskStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::new())),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::significant_drop_tightening)]
#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, title: String, due_date: Option<String>) -> Task {
        let mut guard = self.state.write().await;
        let id = guard.allocate_id();
        let task = Task::new(id, title, due_date);
        guard.tasks.insert(id, task.clone());
        tracing::debug!(task_id = %id, "Task created");
        task
    }

    async fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        let guard = self.state.read().await;
        guard.tasks.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Vec<Task> {
        let guard = self.state.read().await;
        guard.tasks.values().cloned().collect()
    }

    async fn update_partial(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut guard = self.state.write().await;
        let task = guard.task_mut(id)?;
        task.apply(patch);
        tracing::debug!(task_id = %id, "Task updated");
        Ok(task.clone())
    }

    async fn replace_completion(&self, id: TaskId, completed: bool) -> Result<Task, StoreError> {
        let mut guard = self.state.write().await;
        let task = guard.task_mut(id)?;
        task.completed = completed;
        tracing::debug!(task_id = %id, completed, "Task completion replaced");
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let mut guard = self.state.write().await;
        guard
            .tasks
            .remove(&id)
            .map(|_| tracing::debug!(task_id = %id, "Task deleted"))
            .ok_or(StoreError::NotFound(id))
    }
}

// =============================================================================
// Tests
// =============================================================================
