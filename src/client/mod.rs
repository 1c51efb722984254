//! Client side of the task manager.
//!
//! The client keeps a non-authoritative [`TaskCache`] of the server's tasks
//! and changes it only from server responses. [`TaskListController`] drives
//! user actions through a [`TaskGateway`].

pub mod cache;
pub mod controller;
pub mod error;
pub mod filter;
pub mod gateway;

pub use cache::{
    Acknowledgement, ActionOutcome, CacheError, EditSession, LOAD_FAILURE_MESSAGE, LoadState,
    Mutation, TaskCache, TaskDraft,
};
pub use controller::{TaskListController, dispatch};
pub use error::ClientError;
pub use filter::{FilterMode, UnknownFilterMode, display_line, filter_tasks};
pub use gateway::{ClientConfig, DEFAULT_BASE_URL, HttpTaskGateway, TaskGateway};
