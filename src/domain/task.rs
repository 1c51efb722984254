//! Task domain model.
//!
//! A task is a short-lived record with a title, a completion flag and an
//! optional due date. Identity is an integer assigned by the store.

use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// This is a newtype wrapper around `u64`. Identities are allocated by the
/// task store from a monotonic counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from a raw integer.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parses a path segment into a `TaskId`.
    ///
    /// Returns `None` for anything that is not a non-negative integer
    /// representable as `u64`.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        segment.parse::<u64>().ok().map(Self)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// Task Entity
// =============================================================================

/// A task record.
///
/// `due_date` is an opaque calendar-date string. `None` (absent) is distinct
/// from `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identity.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Completion flag, `false` at creation.
    pub completed: bool,
    /// Optional due date.
    pub due_date: Option<String>,
}

impl Task {
    /// Creates a new, not yet completed task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, due_date: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            due_date,
        }
    }

    /// Applies a partial update, leaving absent fields untouched.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
    }
}

// =============================================================================
// Partial Update
// =============================================================================

/// A set of field changes for a task.
///
/// Every `Some` field is written, every `None` field is left as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// New due date.
    pub due_date: Option<String>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: None,
            completed: None,
            due_date: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.due_date.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================
