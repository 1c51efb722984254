//! Infrastructure module.
//!
//! This module contains the task store and server configuration.

pub mod config;
pub mod in_memory;
pub mod repository;

pub use config::{ConfigurationError, ServerConfig};
pub use in_memory::InMemoryTaskStore;
pub use repository::{StoreError, TaskStore};
