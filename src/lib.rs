//! # task-manager
//!
//! A small task manager: an HTTP API that owns an in-memory task collection,
//! and a client that mirrors it.
//!
//! ## Modules
//!
//! - [`domain`]: the task record and partial updates
//! - [`infrastructure`]: the task store and server configuration
//! - [`api`]: request validation, handlers and route registration
//! - [`client`]: HTTP gateway, local cache and reconciliation
//!
//! ## Example
//!
//! ```rust
//! use task_manager::api::{AppState, build_router};
//!
//! let router = build_router(AppState::in_memory());
//! assert!(router.is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
