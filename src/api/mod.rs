//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use dto::{CreateTaskRequest, SetCompletionRequest, TaskResponse, UpdateTaskRequest};
pub use error::{ApiError, ApiErrorResponse, ValidationError};
pub use handlers::{
    AppState, HealthResponse, JsonBody, TaskPath, create_task, delete_task, get_task, health_check, list_tasks,
    set_task_completion, update_task,
};
pub use routes::{RouteConflict, RouteTable, Verb, build_router, task_routes};
