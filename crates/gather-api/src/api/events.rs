// Events API routes
// Decision: registration is POST /v1/events/{id}/registrations; every
// admission outcome maps to exactly one status code and one message
// Decision: role gating for event creation lives here in the handler,
// outside the admission path

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ErrorResponse, ListResponse};
use super::validation::validate_create_event;
use crate::auth::middleware::{AuthState, AuthUser, FromRef, OptionalAuthUser};
use crate::services::{AdmissionService, EventService};
use gather_core::{AdmissionOutcome, Event, GatherError, PaymentStatus, Registration};
use gather_storage::{CreateEvent, EventFilter, StorageBackend};

/// One human-readable message per admission outcome.
pub const EVENT_FULL_MESSAGE: &str = "Sorry, this event is full.";
pub const ALREADY_REGISTERED_MESSAGE: &str = "You are already registered for this event.";
pub const REGISTRATION_BUSY_MESSAGE: &str = "Registration is busy. Please try again.";

/// App state for events routes
#[derive(Clone)]
pub struct EventsState {
    pub events: Arc<EventService>,
    pub admission: Arc<AdmissionService>,
    pub auth: AuthState,
}

impl EventsState {
    pub fn new(storage: Arc<StorageBackend>, auth: AuthState) -> Self {
        Self {
            events: Arc::new(EventService::new(storage.clone())),
            admission: Arc::new(AdmissionService::new(storage)),
            auth,
        }
    }
}

impl FromRef<EventsState> for AuthState {
    fn from_ref(input: &EventsState) -> Self {
        input.auth.clone()
    }
}

/// Event as returned by the API, with spots derived at read time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub city: String,
    pub price_cents: i64,
    pub capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub creator_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Capacity minus committed registrations at read time.
    pub available_spots: i64,
    pub is_free: bool,
}

impl EventResponse {
    pub fn from_event(event: Event, available_spots: i64) -> Self {
        let is_free = event.is_free();
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            category: event.category,
            starts_at: event.starts_at,
            location: event.location,
            city: event.city,
            price_cents: event.price_cents,
            capacity: event.capacity,
            image_url: event.image_url,
            creator_id: event.creator_id,
            club_id: event.club_id,
            created_at: event.created_at,
            available_spots,
            is_free,
        }
    }
}

/// Event detail with the caller's registration state
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    pub event: EventResponse,
    /// False for anonymous callers.
    pub is_registered: bool,
}

/// Committed registration as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub payment_status: PaymentStatus,
    pub registered_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            event_id: r.event_id,
            payment_status: r.payment_status,
            registered_at: r.registered_at,
        }
    }
}

/// Request to create an event
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub city: String,
    /// Price in cents; zero means free.
    #[serde(default)]
    pub price_cents: i64,
    pub capacity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub club_id: Option<Uuid>,
}

/// Query parameters for listing events
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListEventsQuery {
    /// Exact category match
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive city substring match
    #[serde(default)]
    pub city: Option<String>,
}

/// Create events routes
pub fn routes(state: EventsState) -> Router {
    Router::new()
        .route("/v1/events", get(list_events).post(create_event))
        .route("/v1/events/:event_id", get(get_event))
        .route(
            "/v1/events/:event_id/registrations",
            post(register_for_event),
        )
        .with_state(state)
}

/// GET /v1/events - List upcoming events
#[utoipa::path(
    get,
    path = "/v1/events",
    params(
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("city" = Option<String>, Query, description = "Case-insensitive city substring")
    ),
    responses(
        (status = 200, description = "Upcoming events, soonest first", body = ListResponse<EventResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<EventsState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<EventResponse>>, StatusCode> {
    let filter = EventFilter {
        category: query.category,
        city: query.city,
        limit: None,
    };

    let events = state
        .events
        .list_upcoming_with_spots(filter)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list events: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        events
            .into_iter()
            .map(|(event, spots)| EventResponse::from_event(event, spots))
            .collect(),
    )))
}

/// POST /v1/events - Create a new event
///
/// Requires the club_manager or admin role.
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not create events", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<EventsState>,
    user: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), (StatusCode, Json<ErrorResponse>)> {
    if !user.role.can_create_events() {
        return Err(ErrorResponse::new("Only club managers can create events")
            .into_response(StatusCode::FORBIDDEN));
    }

    validate_create_event(
        &req.title,
        &req.description,
        &req.category,
        &req.location,
        &req.city,
        req.price_cents,
        req.capacity,
    )?;

    if req.starts_at <= Utc::now() {
        return Err(ErrorResponse::new("Event must start in the future")
            .into_response(StatusCode::BAD_REQUEST));
    }

    let event = state
        .events
        .create(CreateEvent {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            category: req.category,
            starts_at: req.starts_at,
            location: req.location.trim().to_string(),
            city: req.city.trim().to_string(),
            price_cents: req.price_cents,
            capacity: req.capacity,
            image_url: req.image_url,
            creator_id: user.id,
            club_id: req.club_id,
        })
        .await
        .map_err(|e| match e {
            GatherError::Validation(message) => {
                ErrorResponse::new(message).into_response(StatusCode::BAD_REQUEST)
            }
            other => {
                tracing::error!("Failed to create event: {}", other);
                ErrorResponse::new("Failed to create event")
                    .into_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        })?;

    let spots = i64::from(event.capacity);
    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_event(event, spots)),
    ))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventDetailResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<EventsState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetailResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (event, spots) = state
        .events
        .get_with_spots(event_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get event: {}", e);
            ErrorResponse::new("Failed to load event")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        })?
        .ok_or_else(|| {
            ErrorResponse::new("Event not found").into_response(StatusCode::NOT_FOUND)
        })?;

    let is_registered = match &user {
        Some(user) => state
            .events
            .is_registered(user.id, event.id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check registration: {}", e);
                ErrorResponse::new("Failed to load event")
                    .into_response(StatusCode::INTERNAL_SERVER_ERROR)
            })?,
        None => false,
    };

    Ok(Json(EventDetailResponse {
        event: EventResponse::from_event(event, spots),
        is_registered,
    }))
}

/// POST /v1/events/{event_id}/registrations - Register for an event
///
/// The admission decision is atomic against the store; concurrent requests
/// for the last spot resolve to one 201 and one 409.
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/registrations",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 201, description = "Registered", body = RegistrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event full or already registered", body = ErrorResponse),
        (status = 503, description = "Transient contention, retry later", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn register_for_event(
    State(state): State<EventsState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RegistrationResponse>), (StatusCode, Json<ErrorResponse>)> {
    let outcome = state
        .admission
        .register(user.id, event_id)
        .await
        .map_err(|e| {
            tracing::error!("Admission attempt failed: {}", e);
            ErrorResponse::new("Registration failed")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

    admission_response(outcome)
}

/// Map an admission outcome to its HTTP response. One status and one
/// human-readable message per outcome.
fn admission_response(
    outcome: AdmissionOutcome,
) -> Result<(StatusCode, Json<RegistrationResponse>), (StatusCode, Json<ErrorResponse>)> {
    match outcome {
        AdmissionOutcome::Admitted { registration } => Ok((
            StatusCode::CREATED,
            Json(RegistrationResponse::from(registration)),
        )),
        AdmissionOutcome::NotFound => {
            Err(ErrorResponse::new("Event not found").into_response(StatusCode::NOT_FOUND))
        }
        AdmissionOutcome::EventFull => {
            Err(ErrorResponse::new(EVENT_FULL_MESSAGE).into_response(StatusCode::CONFLICT))
        }
        AdmissionOutcome::AlreadyRegistered => {
            Err(ErrorResponse::new(ALREADY_REGISTERED_MESSAGE).into_response(StatusCode::CONFLICT))
        }
        AdmissionOutcome::TransientFailure => Err(ErrorResponse::new(REGISTRATION_BUSY_MESSAGE)
            .into_response(StatusCode::SERVICE_UNAVAILABLE)),
    }
}
