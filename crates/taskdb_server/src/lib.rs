//! # TaskDB Server
//!
//! HTTP API surface for TaskDB.
//!
//! An axum server exposing the task and user collections under `/api`:
//! list routes with `where`/`sort`/`select`/`skip`/`limit`/`count`
//! query parameters, and create/fetch/replace/delete per entity. Every
//! response uses the `{ "message": ..., "data": ... }` envelope.
//!
//! The routing layer parses and maps; all mutation semantics live in
//! [`taskdb_core::SyncEngine`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod routes;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use taskdb_core::SyncEngine;
use taskdb_store::Store;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The sync engine over the store's collections.
    pub engine: Arc<SyncEngine>,
    /// Server start time, for the health route's uptime.
    pub started: Instant,
}

impl AppState {
    /// Creates application state over a store.
    #[must_use]
    pub fn new(store: &Store) -> Self {
        Self {
            engine: Arc::new(SyncEngine::new(store)),
            started: Instant::now(),
        }
    }
}

/// Builds the API router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(routes::home::health))
        .route(
            "/api/tasks",
            get(routes::tasks::list).post(routes::tasks::create),
        )
        .route(
            "/api/tasks/{id}",
            get(routes::tasks::fetch)
                .put(routes::tasks::update)
                .delete(routes::tasks::remove),
        )
        .route(
            "/api/users",
            get(routes::users::list).post(routes::users::create),
        )
        .route(
            "/api/users/{id}",
            get(routes::users::fetch)
                .put(routes::users::update)
                .delete(routes::users::remove),
        )
        .fallback(routes::home::not_found)
        .with_state(state)
}
