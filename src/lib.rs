//! Library crate for mafia-moderator, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, state::AppState};

/// Build the shared state for `config`, picking the session log backend it names.
pub fn build_state(config: AppConfig) -> state::SharedState {
    let store = dao::session_store::from_config(&config);
    AppState::new(Arc::new(config), store)
}

/// Build the top-level router and attach cross-cutting middleware layers.
pub fn build_router(state: state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
