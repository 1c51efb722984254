//! Store trait for task records.
//!
//! The store is the only owner of the task collection and the identity
//! counter. The API layer reaches it exclusively through [`TaskStore`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Task, TaskId, TaskPatch};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No task with the given identity exists.
    #[error("Task not found: {0}")]
    NotFound(TaskId),
}

// =============================================================================
// Task Store
// =============================================================================

/// Authoritative holder of task records.
///
/// Implementations must allocate identities from a counter that only ever
/// grows, independent of how many records are currently held, and must
/// list records in insertion order.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a new, not completed task and returns it.
    ///
    /// The identity is strictly greater than every identity allocated before.
    async fn create(&self, title: String, due_date: Option<String>) -> Task;

    /// Finds a task by its identity.
    async fn get(&self, id: TaskId) -> Result<Task, StoreError>;

    /// Lists all tasks in insertion order.
    async fn list(&self) -> Vec<Task>;

    /// Applies the fields present in `patch` and returns the updated task.
    async fn update_partial(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError>;

    /// Sets the completion flag without touching title or due date.
    async fn replace_completion(&self, id: TaskId, completed: bool) -> Result<Task, StoreError>;

    /// Removes a task. Remaining identities are not renumbered.
    async fn delete(&self, id: TaskId) -> Result<(), StoreError>;
}
