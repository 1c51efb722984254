//! View derivation over the client cache.
//!
//! Filtering is a pure function of the cached tasks and the filter mode; it
//! never changes the cache and keeps the cache's order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Task;

/// Which tasks to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks that are not completed.
    NotCompleted,
}

impl FilterMode {
    /// Returns true if `task` is displayed under this mode.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::NotCompleted => !task.completed,
        }
    }

    /// The wire/select value of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::NotCompleted => "not-completed",
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// An unknown filter mode name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown filter mode: {0}")]
pub struct UnknownFilterMode(pub String);

impl FromStr for FilterMode {
    type Err = UnknownFilterMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "not-completed" => Ok(Self::NotCompleted),
            other => Err(UnknownFilterMode(other.to_string())),
        }
    }
}

/// Returns the tasks displayed under `mode`, in cache order.
#[must_use]
pub fn filter_tasks(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

/// Renders the list line for a task.
///
/// `"Buy milk - Not Completed (Due: 2024-05-01)"`; the due date part is
/// omitted when the due date is absent or empty.
#[must_use]
pub fn display_line(task: &Task) -> String {
    let state = if task.completed {
        "Completed"
    } else {
        "Not Completed"
    };
    match task.due_date.as_deref() {
        Some(due_date) if !due_date.is_empty() => {
            format!("{} - {state} (Due: {due_date})", task.title)
        }
        _ => format!("{} - {state}", task.title),
    }
}
