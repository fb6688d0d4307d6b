// Platform routes: contact form, landing page data, member dashboard

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::clubs::ClubResponse;
use super::common::ErrorResponse;
use super::events::EventResponse;
use super::validation::validate_contact;
use crate::auth::middleware::{AuthState, AuthUser, FromRef};
use crate::services::{ClubService, EventService};
use gather_storage::{ClubFilter, CreateContactMessage, EventFilter, StorageBackend};

/// How many events and clubs the landing payload carries.
const HOME_LIST_LIMIT: i64 = 6;

/// App state for platform routes
#[derive(Clone)]
pub struct PlatformState {
    pub storage: Arc<StorageBackend>,
    pub events: Arc<EventService>,
    pub clubs: Arc<ClubService>,
    pub auth: AuthState,
}

impl PlatformState {
    pub fn new(storage: Arc<StorageBackend>, auth: AuthState) -> Self {
        Self {
            events: Arc::new(EventService::new(storage.clone())),
            clubs: Arc::new(ClubService::new(storage.clone())),
            storage,
            auth,
        }
    }
}

impl FromRef<PlatformState> for AuthState {
    fn from_ref(input: &PlatformState) -> Self {
        input.auth.clone()
    }
}

/// Contact form request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Stored contact message
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactMessageResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Platform-wide counters for the landing page
#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStats {
    pub total_events: i64,
    pub total_clubs: i64,
    pub total_cities: i64,
    pub total_members: i64,
}

/// Landing page payload
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub upcoming_events: Vec<EventResponse>,
    pub newest_clubs: Vec<ClubResponse>,
    pub stats: PlatformStats,
}

/// Member dashboard payload
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub registered_events: Vec<EventResponse>,
    pub clubs: Vec<ClubResponse>,
}

/// Create platform routes
pub fn routes(state: PlatformState) -> Router {
    Router::new()
        .route("/v1/contact", post(create_contact_message))
        .route("/v1/home", get(get_home))
        .route("/v1/dashboard", get(get_dashboard))
        .with_state(state)
}

/// POST /v1/contact - Send a contact message
///
/// Open to anonymous callers.
#[utoipa::path(
    post,
    path = "/v1/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ContactMessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "platform"
)]
pub async fn create_contact_message(
    State(state): State<PlatformState>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactMessageResponse>), (StatusCode, Json<ErrorResponse>)> {
    validate_contact(&req.name, &req.email, &req.message)?;

    let row = state
        .storage
        .create_contact_message(CreateContactMessage {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            message: req.message.trim().to_string(),
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to store contact message: {}", e);
            ErrorResponse::new("Failed to send message")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ContactMessageResponse {
            id: row.id,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: row.created_at,
        }),
    ))
}

/// GET /v1/home - Landing page data
#[utoipa::path(
    get,
    path = "/v1/home",
    responses(
        (status = 200, description = "Landing page payload", body = HomeResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "platform"
)]
pub async fn get_home(
    State(state): State<PlatformState>,
) -> Result<Json<HomeResponse>, StatusCode> {
    let internal = |e: gather_core::GatherError| {
        tracing::error!("Failed to build home payload: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let upcoming_events = state
        .events
        .list_upcoming_with_spots(EventFilter {
            limit: Some(HOME_LIST_LIMIT),
            ..Default::default()
        })
        .await
        .map_err(internal)?
        .into_iter()
        .map(|(event, spots)| EventResponse::from_event(event, spots))
        .collect();

    let newest_clubs = state
        .clubs
        .list_with_member_counts(ClubFilter {
            limit: Some(HOME_LIST_LIMIT),
            ..Default::default()
        })
        .await
        .map_err(internal)?
        .into_iter()
        .map(|(club, members)| ClubResponse::from_club(club, members))
        .collect();

    let stats = PlatformStats {
        total_events: state.storage.count_events().await.map_err(internal)?,
        total_clubs: state.storage.count_clubs().await.map_err(internal)?,
        total_cities: state.storage.count_event_cities().await.map_err(internal)?,
        total_members: state.storage.count_users().await.map_err(internal)?,
    };

    Ok(Json(HomeResponse {
        upcoming_events,
        newest_clubs,
        stats,
    }))
}

/// GET /v1/dashboard - Caller's upcoming registrations and clubs
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard payload", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "platform"
)]
pub async fn get_dashboard(
    State(state): State<PlatformState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, StatusCode> {
    let internal = |e: gather_core::GatherError| {
        tracing::error!("Failed to build dashboard payload: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let registered_events = state
        .events
        .list_registered_with_spots(user.id)
        .await
        .map_err(internal)?
        .into_iter()
        .map(|(event, spots)| EventResponse::from_event(event, spots))
        .collect();

    let clubs = state
        .clubs
        .list_for_user(user.id)
        .await
        .map_err(internal)?
        .into_iter()
        .map(|(club, members)| ClubResponse::from_club(club, members))
        .collect();

    Ok(Json(DashboardResponse {
        registered_events,
        clubs,
    }))
}
