//! Domain module for task management.
//!
//! This module contains the task record and its partial-update type.

pub mod task;

pub use task::{Task, TaskId, TaskPatch};
