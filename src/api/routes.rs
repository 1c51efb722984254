//! Route registration.
//!
//! Routes are collected in a table keyed by (verb, path) before the axum
//! `Router` is built. Registering the same pair twice is an error, so a
//! second handler can never be silently shadowed by the first.

use std::collections::{BTreeMap, BTreeSet};

use axum::{
    Router,
    handler::Handler,
    routing::{MethodFilter, MethodRouter},
};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_task, delete_task, get_task, health_check, list_tasks, set_task_completion,
    update_task,
};

/// HTTP verbs the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Verb {
    const fn method_filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
            Self::Patch => MethodFilter::PATCH,
            Self::Delete => MethodFilter::DELETE,
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        formatter.write_str(name)
    }
}

/// A (verb, path) pair was registered more than once.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Route already registered: {verb} {path}")]
pub struct RouteConflict {
    /// Conflicting verb.
    pub verb: Verb,
    /// Conflicting path.
    pub path: &'static str,
}

/// Collects one handler per (verb, path) pair.
pub struct RouteTable {
    paths: BTreeMap<&'static str, MethodRouter<AppState>>,
    registered: BTreeSet<(Verb, &'static str)>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paths: BTreeMap::new(),
            registered: BTreeSet::new(),
        }
    }

    /// Registers `handler` for `verb` on `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConflict`] if the pair is already registered.
    pub fn register<H, T>(
        mut self,
        verb: Verb,
        path: &'static str,
        handler: H,
    ) -> Result<Self, RouteConflict>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        if !self.registered.insert((verb, path)) {
            return Err(RouteConflict { verb, path });
        }
        let method_router = self.paths.remove(path).unwrap_or_default();
        self.paths
            .insert(path, method_router.on(verb.method_filter(), handler));
        Ok(self)
    }

    /// Returns true if the pair has a handler.
    #[must_use]
    pub fn contains(&self, verb: Verb, path: &'static str) -> bool {
        self.registered.contains(&(verb, path))
    }

    /// Number of registered (verb, path) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Builds the axum router.
    pub fn into_router(self) -> Router<AppState> {
        self.paths
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(path, method_router)
            })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers every API route.
///
/// # Errors
///
/// Returns [`RouteConflict`] if two registrations share a (verb, path).
pub fn task_routes() -> Result<RouteTable, RouteConflict> {
    RouteTable::new()
        .register(Verb::Get, "/health", health_check)?
        .register(Verb::Post, "/tasks", create_task)?
        .register(Verb::Get, "/tasks", list_tasks)?
        .register(Verb::Get, "/tasks/{id}", get_task)?
        .register(Verb::Patch, "/tasks/{id}", update_task)?
        .register(Verb::Put, "/tasks/{id}", set_task_completion)?
        .register(Verb::Delete, "/tasks/{id}", delete_task)
}

/// Builds the complete application: routes, CORS, tracing and state.
///
/// Cross-origin requests are allowed from any origin so the browser client
/// can reach the API from its own address.
///
/// # Errors
///
/// Returns [`RouteConflict`] if route registration collides.
pub fn build_router(state: AppState) -> Result<Router, RouteConflict> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = task_routes()?
        .into_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}

// =============================================================================
// Tests
// =============================================================================
