// Gather API server library
// Decision: router construction lives here so the binary and the integration
// tests drive the exact same app

pub mod api;
pub mod auth;
pub mod openapi;
pub mod services;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use auth::{AuthConfig, AuthState};
use gather_storage::StorageBackend;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage_mode: &'static str,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    storage_mode: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage_mode: state.storage_mode,
    })
}

/// Build the application router over the given storage backend.
pub fn build_router(storage: Arc<StorageBackend>, auth_config: AuthConfig) -> Router {
    let auth_state = AuthState::new(auth_config, storage.clone());

    let health_state = HealthState {
        storage_mode: if storage.is_dev_mode() {
            "in-memory"
        } else {
            "postgres"
        },
    };

    Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(auth::routes::routes(auth_state.clone()))
        .merge(api::events::routes(api::events::EventsState::new(
            storage.clone(),
            auth_state.clone(),
        )))
        .merge(api::clubs::routes(api::clubs::ClubsState::new(
            storage.clone(),
            auth_state.clone(),
        )))
        .merge(api::platform::routes(api::platform::PlatformState::new(
            storage, auth_state,
        )))
}
