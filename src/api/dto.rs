//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies arrive as untyped JSON and are checked field by field, in
//! a fixed order, so the first violated field can be reported. Nothing is
//! applied to the store until a whole request has passed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ApiErrorResponse, ValidationError};
use crate::domain::{Task, TaskId, TaskPatch};

/// JSON key of the title field.
pub const TITLE_FIELD: &str = "title";
/// JSON key of the completion flag.
pub const COMPLETED_FIELD: &str = "completed";
/// JSON key of the due date.
pub const DUE_DATE_FIELD: &str = "dueDate";

// =============================================================================
// Task DTOs
// =============================================================================

/// Request DTO for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title of the task.
    pub title: String,
    /// Optional due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    /// Validates a create body.
    ///
    /// # Errors
    ///
    /// Returns the first violated field: a missing, non-string or blank
    /// `title`, or a non-string `dueDate`.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let title = match body.get(TITLE_FIELD) {
            Some(value) => validate_title(value)?,
            None => return Err(ValidationError::new(TITLE_FIELD, "title is required")),
        };
        let due_date = optional_string(body, DUE_DATE_FIELD, "dueDate must be a string")?;

        Ok(Self { title, due_date })
    }
}

/// Request DTO for a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title for the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl UpdateTaskRequest {
    /// Validates a partial update body. Absent fields stay `None`.
    ///
    /// # Errors
    ///
    /// Returns the first present field that has the wrong type, or a blank
    /// `title`.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let title = body.get(TITLE_FIELD).map(validate_title).transpose()?;
        let completed = body
            .get(COMPLETED_FIELD)
            .map(validate_completed)
            .transpose()?;
        let due_date = optional_string(body, DUE_DATE_FIELD, "dueDate must be a string")?;

        Ok(Self {
            title,
            completed,
            due_date,
        })
    }
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            completed: request.completed,
            due_date: request.due_date,
        }
    }
}

/// Request DTO for a completion-only update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetCompletionRequest {
    /// The completion flag to store.
    pub completed: bool,
}

impl SetCompletionRequest {
    /// Validates a completion-only body. Every other field is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `completed` is missing or not a boolean.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        match body.get(COMPLETED_FIELD) {
            Some(value) => Ok(Self {
                completed: validate_completed(value)?,
            }),
            None => Err(ValidationError::new(
                COMPLETED_FIELD,
                "completed is required",
            )),
        }
    }
}

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task ID.
    pub id: TaskId,
    /// Title of the task.
    pub title: String,
    /// Whether the task is completed.
    pub completed: bool,
    /// Due date, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            completed: task.completed,
            due_date: task.due_date.clone(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            completed: task.completed,
            due_date: task.due_date,
        }
    }
}

impl From<TaskResponse> for Task {
    fn from(response: TaskResponse) -> Self {
        Self {
            id: response.id,
            title: response.title,
            completed: response.completed,
            due_date: response.due_date,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Requires the request body to be a JSON object.
///
/// # Errors
///
/// Returns a 400 `INVALID_JSON` response for arrays, scalars and `null`.
pub fn expect_object(body: &Value) -> Result<&Map<String, Value>, ApiErrorResponse> {
    body.as_object()
        .ok_or_else(|| ApiErrorResponse::invalid_json("Request body must be a JSON object"))
}

/// Validates a task title.
///
/// # Validation Rules
///
/// - Title must be a string
/// - Title must contain at least one non-whitespace character
///
/// The accepted title is returned verbatim.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the `title` field.
pub fn validate_title(value: &Value) -> Result<String, ValidationError> {
    let Some(title) = value.as_str() else {
        return Err(ValidationError::new(TITLE_FIELD, "title must be a string"));
    };
    if title.trim().is_empty() {
        return Err(ValidationError::new(TITLE_FIELD, "title must not be empty"));
    }
    Ok(title.to_string())
}

/// Validates a completion flag.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the `completed` field unless the value
/// is a JSON boolean.
pub fn validate_completed(value: &Value) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or_else(|| ValidationError::new(COMPLETED_FIELD, "completed must be a boolean"))
}

/// Reads an optional string field. `null` counts as present and invalid.
fn optional_string(
    body: &Map<String, Value>,
    field: &'static str,
    message: &str,
) -> Result<Option<String>, ValidationError> {
    body.get(field)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::new(field, message))
        })
        .transpose()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_create_valid_without_due_date() {
        let request = CreateTaskRequest::from_json(&object(json!({"title": "Buy milk"}))).unwrap();
        assert_eq!(request.title, "Buy milk");
        assert!(request.due_date.is_none());
    }

    #[rstest]
    fn test_create_keeps_empty_due_date() {
        let request =
            CreateTaskRequest::from_json(&object(json!({"title": "Call", "dueDate": ""}))).unwrap();
        assert_eq!(request.due_date.as_deref(), Some(""));
    }

    #[rstest]
    #[case(json!({}), "title", "title is required")]
    #[case(json!({"title": 5}), "title", "title must be a string")]
    #[case(json!({"title": null}), "title", "title must be a string")]
    #[case(json!({"title": ""}), "title", "title must not be empty")]
    #[case(json!({"title": "   "}), "title", "title must not be empty")]
    #[case(json!({"title": "ok", "dueDate": 20240101}), "dueDate", "dueDate must be a string")]
    #[case(json!({"title": "ok", "dueDate": null}), "dueDate", "dueDate must be a string")]
    #[case(json!({"dueDate": 1}), "title", "title is required")]
    fn test_create_rejects_first_violation(
        #[case] body: Value,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        let error = CreateTaskRequest::from_json(&object(body)).unwrap_err();
        assert_eq!(error.field, field);
        assert_eq!(error.message, message);
    }

    #[rstest]
    fn test_create_ignores_unknown_fields() {
        let request =
            CreateTaskRequest::from_json(&object(json!({"title": "x", "completed": true})))
                .unwrap();
        assert_eq!(request.title, "x");
    }

    #[rstest]
    fn test_create_request_serializes_without_absent_due_date() {
        let request = CreateTaskRequest {
            title: "Buy milk".to_string(),
            due_date: None,
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"title": "Buy milk"}));
    }

    // -------------------------------------------------------------------------
    // Partial update
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_update_empty_body_is_empty_patch() {
        let request = UpdateTaskRequest::from_json(&Map::new()).unwrap();
        assert!(TaskPatch::from(request).is_empty());
    }

    #[rstest]
    fn test_update_only_completed() {
        let request = UpdateTaskRequest::from_json(&object(json!({"completed": true}))).unwrap();
        assert_eq!(TaskPatch::from(request), TaskPatch::new().with_completed(true));
    }

    #[rstest]
    fn test_update_all_fields() {
        let request = UpdateTaskRequest::from_json(&object(
            json!({"title": "New", "completed": false, "dueDate": "2024-06-01"}),
        ))
        .unwrap();
        assert_eq!(
            TaskPatch::from(request),
            TaskPatch::new()
                .with_title("New")
                .with_completed(false)
                .with_due_date("2024-06-01")
        );
    }

    #[rstest]
    #[case(json!({"title": ""}), "title")]
    #[case(json!({"title": 1}), "title")]
    #[case(json!({"completed": "true"}), "completed")]
    #[case(json!({"completed": null}), "completed")]
    #[case(json!({"dueDate": false}), "dueDate")]
    #[case(json!({"title": "fine", "completed": 1, "dueDate": 2}), "completed")]
    fn test_update_rejects_invalid_present_field(#[case] body: Value, #[case] field: &str) {
        let error = UpdateTaskRequest::from_json(&object(body)).unwrap_err();
        assert_eq!(error.field, field);
    }

    // -------------------------------------------------------------------------
    // Completion-only update
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_set_completion_ignores_other_fields() {
        let request = SetCompletionRequest::from_json(&object(
            json!({"completed": true, "title": "ignored", "dueDate": 3}),
        ))
        .unwrap();
        assert!(request.completed);
    }

    #[rstest]
    #[case(json!({}), "completed is required")]
    #[case(json!({"title": "x"}), "completed is required")]
    #[case(json!({"completed": "yes"}), "completed must be a boolean")]
    #[case(json!({"completed": 0}), "completed must be a boolean")]
    fn test_set_completion_rejects(#[case] body: Value, #[case] message: &str) {
        let error = SetCompletionRequest::from_json(&object(body)).unwrap_err();
        assert_eq!(error.field, COMPLETED_FIELD);
        assert_eq!(error.message, message);
    }

    // -------------------------------------------------------------------------
    // Body shape and response
    // -------------------------------------------------------------------------

    #[rstest]
    #[case(json!([]))]
    #[case(json!("title"))]
    #[case(Value::Null)]
    fn test_expect_object_rejects_non_objects(#[case] body: Value) {
        assert!(expect_object(&body).is_err());
    }

    #[rstest]
    fn test_task_response_wire_shape() {
        let task = Task::new(TaskId::new(1), "Buy milk", None);
        let json = serde_json::to_value(TaskResponse::from(&task)).unwrap();
        assert_eq!(json, json!({"id": 1, "title": "Buy milk", "completed": false}));

        let task = Task::new(TaskId::new(2), "Call", Some(String::new()));
        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();
        assert_eq!(json["dueDate"], "");
    }

    #[rstest]
    fn test_task_response_reads_back_into_task() {
        let response: TaskResponse =
            serde_json::from_value(json!({"id": 4, "title": "Read", "completed": true})).unwrap();
        let task = Task::from(response);
        assert_eq!(task.id, TaskId::new(4));
        assert!(task.completed);
        assert!(task.due_date.is_none());
    }
}
