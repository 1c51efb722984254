//! Client-side task cache.
//!
//! The cache mirrors the server's task list for rendering. It is never
//! authoritative: it is changed only when a response arrives, and then only
//! with what the server returned. Requests are planned from the current
//! cache state ([`TaskCache::plan_create`], [`TaskCache::plan_toggle`], ...)
//! and their outcomes are folded back in with [`TaskCache::apply`]. Outcomes
//! are applied in arrival order, so when two requests for the same task are
//! in flight the later response wins.

use crate::api::{CreateTaskRequest, UpdateTaskRequest};
use crate::domain::{Task, TaskId};

use super::error::ClientError;
use super::filter::{FilterMode, filter_tasks};

// =============================================================================
// Requests and Acknowledgements
// =============================================================================

/// A change the client asks the server to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// `POST /tasks`
    Create(CreateTaskRequest),
    /// `PUT /tasks/{id}`
    SetCompletion {
        /// Target task.
        id: TaskId,
        /// Requested flag.
        completed: bool,
    },
    /// `PATCH /tasks/{id}`
    Edit {
        /// Target task.
        id: TaskId,
        /// Fields to change.
        request: UpdateTaskRequest,
    },
    /// `DELETE /tasks/{id}`
    Delete(TaskId),
}

impl Mutation {
    /// The user-visible message shown when this mutation fails.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Create(_) => "Error adding task",
            Self::SetCompletion { .. } => "Error updating task",
            Self::Edit { .. } => "Error editing task",
            Self::Delete(_) => "Error deleting task",
        }
    }
}

/// A successful server response to a [`Mutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The server created this record.
    Created(Task),
    /// The server's record after an update.
    Updated(Task),
    /// The server removed the task.
    Deleted(TaskId),
}

/// What a user action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing was sent or nothing was applied: empty input, unknown task,
    /// no edit session, or a response that does not match its request.
    Skipped,
    /// The server acknowledged and the cache was reconciled.
    Applied,
    /// The request failed; the cache is unchanged and an error is shown.
    Failed,
}

// =============================================================================
// Error State
// =============================================================================

/// The error currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheError {
    /// User-visible message.
    pub message: &'static str,
    /// What actually went wrong.
    pub cause: ClientError,
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.message)
    }
}

/// Message shown when the initial load fails.
pub const LOAD_FAILURE_MESSAGE: &str = "Error fetching tasks";

// =============================================================================
// Drafts
// =============================================================================

/// Input fields of the "new task" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title input.
    pub title: String,
    /// Date input; empty means no due date.
    pub due_date: String,
}

impl TaskDraft {
    /// Returns true if the inputs still hold what `request` was built from.
    fn is_request(&self, request: &CreateTaskRequest) -> bool {
        self.title == request.title && non_empty(&self.due_date) == request.due_date
    }
}

/// The single open edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Task being edited.
    pub id: TaskId,
    /// Title input.
    pub title: String,
    /// Date input.
    pub due_date: String,
    had_due_date: bool,
}

// =============================================================================
// Task Cache
// =============================================================================

/// Load progress of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The initial fetch has not completed.
    #[default]
    Pending,
    /// The server's list has been mirrored.
    Loaded,
    /// The initial fetch failed; the cache stays empty.
    Failed,
}

/// Local mirror of the server's tasks plus the UI state around it.
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    tasks: Vec<Task>,
    load_state: LoadState,
    error: Option<CacheError>,
    draft: TaskDraft,
    edit: Option<EditSession>,
    filter: FilterMode,
}

impl TaskCache {
    /// Creates an empty, not yet loaded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// All cached tasks in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a cached task.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Load progress.
    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// The error currently shown, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&CacheError> {
        self.error.as_ref()
    }

    /// Hides the current error.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// The "new task" form inputs.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Mutable access to the "new task" form inputs.
    pub const fn draft_mut(&mut self) -> &mut TaskDraft {
        &mut self.draft
    }

    /// The open edit session, if any.
    #[must_use]
    pub const fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Current filter mode.
    #[must_use]
    pub const fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Changes the filter mode. The cache itself is untouched.
    pub const fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    /// Tasks to display under the current filter, in cache order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.filter)
    }

    // -------------------------------------------------------------------------
    // Edit session
    // -------------------------------------------------------------------------

    /// Opens an edit session for a cached task, seeded with its current
    /// title and due date. Any other session and its draft are discarded.
    ///
    /// Returns false if the task is not cached.
    pub fn start_editing(&mut self, id: TaskId) -> bool {
        let Some(task) = self.get(id) else {
            return false;
        };
        self.edit = Some(EditSession {
            id,
            title: task.title.clone(),
            due_date: task.due_date.clone().unwrap_or_default(),
            had_due_date: task.due_date.is_some(),
        });
        true
    }

    /// Sets the title input of the open session.
    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() {
            session.title = title.into();
        }
    }

    /// Sets the due date input of the open session.
    pub fn set_edit_due_date(&mut self, due_date: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() {
            session.due_date = due_date.into();
        }
    }

    /// Closes the edit session without saving.
    pub fn cancel_editing(&mut self) {
        self.edit = None;
    }

    // -------------------------------------------------------------------------
    // Planning
    // -------------------------------------------------------------------------

    /// Builds the create request from the form. `None` when the title input
    /// is empty. An empty date input is sent as no due date.
    #[must_use]
    pub fn plan_create(&self) -> Option<Mutation> {
        if self.draft.title.is_empty() {
            return None;
        }
        Some(Mutation::Create(CreateTaskRequest {
            title: self.draft.title.clone(),
            due_date: non_empty(&self.draft.due_date),
        }))
    }

    /// Builds the completion request that flips a cached task.
    #[must_use]
    pub fn plan_toggle(&self, id: TaskId) -> Option<Mutation> {
        self.get(id).map(|task| Mutation::SetCompletion {
            id,
            completed: !task.completed,
        })
    }

    /// Builds the partial update for the open edit session. `None` without a
    /// session or with an empty title input.
    ///
    /// An empty date input is only sent when the task had a due date, so
    /// that clearing it reaches the server.
    #[must_use]
    pub fn plan_save_edit(&self) -> Option<Mutation> {
        let session = self.edit.as_ref()?;
        if session.title.is_empty() {
            return None;
        }
        let due_date = if session.due_date.is_empty() && !session.had_due_date {
            None
        } else {
            Some(session.due_date.clone())
        };
        Some(Mutation::Edit {
            id: session.id,
            request: UpdateTaskRequest {
                title: Some(session.title.clone()),
                completed: None,
                due_date,
            },
        })
    }

    /// Builds the delete request for a task.
    #[must_use]
    pub const fn plan_delete(id: TaskId) -> Mutation {
        Mutation::Delete(id)
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Mirrors the result of the initial list fetch.
    pub fn apply_loaded(&mut self, result: Result<Vec<Task>, ClientError>) -> ActionOutcome {
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.load_state = LoadState::Loaded;
                ActionOutcome::Applied
            }
            Err(cause) => {
                tracing::warn!(error = %cause, "Failed to load tasks");
                self.tasks.clear();
                self.load_state = LoadState::Failed;
                self.error = Some(CacheError {
                    message: LOAD_FAILURE_MESSAGE,
                    cause,
                });
                ActionOutcome::Failed
            }
        }
    }

    /// Folds the outcome of `mutation` into the cache.
    ///
    /// On success every field of the server's record replaces the cached
    /// one. The "new task" inputs are cleared only if they still hold what
    /// was sent. An acknowledgement that does not answer `mutation` (another
    /// kind, or another task) changes nothing and yields
    /// [`ActionOutcome::Skipped`].
    ///
    /// On failure only the error state changes; drafts and the edit session
    /// are kept so the user can retry.
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        result: Result<Acknowledgement, ClientError>,
    ) -> ActionOutcome {
        let acknowledgement = match result {
            Ok(acknowledgement) => acknowledgement,
            Err(cause) => {
                tracing::warn!(error = %cause, message = mutation.failure_message(), "Task request failed");
                self.error = Some(CacheError {
                    message: mutation.failure_message(),
                    cause,
                });
                return ActionOutcome::Failed;
            }
        };

        match (mutation, acknowledgement) {
            (Mutation::Create(request), Acknowledgement::Created(task)) => {
                self.tasks.push(task);
                if self.draft.is_request(request) {
                    self.draft = TaskDraft::default();
                }
            }
            (Mutation::SetCompletion { id, .. }, Acknowledgement::Updated(task))
                if task.id == *id =>
            {
                self.replace(task);
            }
            (Mutation::Edit { id, .. }, Acknowledgement::Updated(task)) if task.id == *id => {
                self.replace(task);
                if self.editing(*id) {
                    self.edit = None;
                }
            }
            (Mutation::Delete(id), Acknowledgement::Deleted(deleted)) if deleted == *id => {
                self.tasks.retain(|task| task.id != deleted);
                if self.editing(deleted) {
                    self.edit = None;
                }
            }
            (mutation, acknowledgement) => {
                tracing::warn!(
                    ?mutation,
                    ?acknowledgement,
                    "Acknowledgement does not answer the request"
                );
                return ActionOutcome::Skipped;
            }
        }
        ActionOutcome::Applied
    }

    /// Overwrites the cached record with the server's. A record that is no
    /// longer cached is not brought back.
    fn replace(&mut self, task: Task) {
        if let Some(cached) = self.tasks.iter_mut().find(|cached| cached.id == task.id) {
            *cached = task;
        }
    }

    fn editing(&self, id: TaskId) -> bool {
        self.edit.as_ref().is_some_and(|session| session.id == id)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// =============================================================================
// Tests
// =============================================================================
