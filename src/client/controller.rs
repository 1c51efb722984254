//! User actions against the Task API.
//!
//! [`TaskListController`] wires a [`TaskGateway`] to a [`TaskCache`]: each
//! action plans a request from the cache, sends it, and folds the response
//! back in.

use super::cache::{Acknowledgement, ActionOutcome, Mutation, TaskCache};
use super::error::ClientError;
use super::gateway::TaskGateway;
use crate::domain::TaskId;

/// Sends `mutation` through `gateway` and returns the server's answer.
///
/// Kept separate from the cache so several requests can be in flight at
/// once and applied in whatever order they complete.
///
/// # Errors
///
/// Returns the gateway's [`ClientError`] unchanged.
pub async fn dispatch<G>(gateway: &G, mutation: &Mutation) -> Result<Acknowledgement, ClientError>
where
    G: TaskGateway + ?Sized,
{
    match mutation {
        Mutation::Create(request) => gateway
            .create_task(request)
            .await
            .map(Acknowledgement::Created),
        Mutation::SetCompletion { id, completed } => gateway
            .set_completion(*id, *completed)
            .await
            .map(Acknowledgement::Updated),
        Mutation::Edit { id, request } => gateway
            .update_task(*id, request)
            .await
            .map(Acknowledgement::Updated),
        Mutation::Delete(id) => gateway
            .delete_task(*id)
            .await
            .map(|()| Acknowledgement::Deleted(*id)),
    }
}

/// The task list screen: a cache plus the gateway it syncs through.
pub struct TaskListController<G> {
    gateway: G,
    cache: TaskCache,
}

impl<G: TaskGateway> TaskListController<G> {
    /// Creates a controller with an empty, unloaded cache.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            cache: TaskCache::new(),
        }
    }

    /// The cache backing the view.
    pub const fn cache(&self) -> &TaskCache {
        &self.cache
    }

    /// Mutable access for draft inputs, edit sessions and filter changes.
    pub const fn cache_mut(&mut self) -> &mut TaskCache {
        &mut self.cache
    }

    /// The gateway requests go through.
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetches the task list and mirrors it.
    pub async fn load(&mut self) -> ActionOutcome {
        let result = self.gateway.list_tasks().await;
        self.cache.apply_loaded(result)
    }

    /// Submits the "new task" form.
    pub async fn add_task(&mut self) -> ActionOutcome {
        let Some(mutation) = self.cache.plan_create() else {
            return ActionOutcome::Skipped;
        };
        self.run(mutation).await
    }

    /// Flips the completion flag of a cached task.
    pub async fn toggle(&mut self, id: TaskId) -> ActionOutcome {
        let Some(mutation) = self.cache.plan_toggle(id) else {
            return ActionOutcome::Skipped;
        };
        self.run(mutation).await
    }

    /// Saves the open edit session.
    pub async fn save_edit(&mut self) -> ActionOutcome {
        let Some(mutation) = self.cache.plan_save_edit() else {
            return ActionOutcome::Skipped;
        };
        self.run(mutation).await
    }

    /// Deletes a task.
    pub async fn delete(&mut self, id: TaskId) -> ActionOutcome {
        self.run(TaskCache::plan_delete(id)).await
    }

    async fn run(&mut self, mutation: Mutation) -> ActionOutcome {
        let result = dispatch(&self.gateway, &mutation).await;
        self.cache.apply(&mutation, result)
    }
}
