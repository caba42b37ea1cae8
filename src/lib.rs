//! people-svc library - person registry with name-based enrichment
//!
//! Create/list/update/delete for person records in PostgreSQL, with creates
//! and name-changing updates enriched from three external classification
//! services (gender, age, nationality) keyed by first name.

use axum::routing::{post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod model;

pub use config::Config;
pub use error::{Error, Result};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Person persistence over the shared pool
    pub store: db::PersonStore,
    /// Remote classification sources
    pub sources: Arc<enrich::HttpSources>,
}

impl AppState {
    pub fn new(store: db::PersonStore, sources: enrich::HttpSources) -> Self {
        Self {
            store,
            sources: Arc::new(sources),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/people", post(api::create_person).get(api::list_people))
        .route(
            "/people/:id",
            put(api::update_person).delete(api::delete_person),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
