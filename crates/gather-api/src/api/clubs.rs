// Clubs API routes
// Decision: any authenticated user may create a club; creation enrolls the
// creator and promotes a plain user to club_manager
// Decision: join is POST /v1/clubs/{id}/memberships, mirroring the
// registration route shape

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
use super::events::EventResponse;
use super::validation::validate_create_club;
use crate::auth::middleware::{AuthState, AuthUser, FromRef, OptionalAuthUser};
use crate::services::{AdmissionService, ClubService, EventService};
use gather_core::{Club, JoinOutcome, Membership};
use gather_storage::{ClubFilter, CreateClub, StorageBackend};

/// One human-readable message per join outcome.
pub const ALREADY_MEMBER_MESSAGE: &str = "You are already a member of this club.";

/// App state for clubs routes
#[derive(Clone)]
pub struct ClubsState {
    pub clubs: Arc<ClubService>,
    pub events: Arc<EventService>,
    pub admission: Arc<AdmissionService>,
    pub auth: AuthState,
}

impl ClubsState {
    pub fn new(storage: Arc<StorageBackend>, auth: AuthState) -> Self {
        Self {
            clubs: Arc::new(ClubService::new(storage.clone())),
            events: Arc::new(EventService::new(storage.clone())),
            admission: Arc::new(AdmissionService::new(storage)),
            auth,
        }
    }
}

impl FromRef<ClubsState> for AuthState {
    fn from_ref(input: &ClubsState) -> Self {
        input.auth.clone()
    }
}

/// Club as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClubResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub city: String,
    pub category: String,
    pub manager_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
}

impl ClubResponse {
    pub fn from_club(club: Club, member_count: i64) -> Self {
        Self {
            id: club.id,
            name: club.name,
            description: club.description,
            city: club.city,
            category: club.category,
            manager_id: club.manager_id,
            image_url: club.image_url,
            created_at: club.created_at,
            member_count,
        }
    }
}

/// Club detail with the caller's membership state and the club's events
#[derive(Debug, Serialize, ToSchema)]
pub struct ClubDetailResponse {
    pub club: ClubResponse,
    /// False for anonymous callers.
    pub is_member: bool,
    pub upcoming_events: Vec<EventResponse>,
}

/// Committed membership as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct MembershipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub club_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            club_id: m.club_id,
            joined_at: m.joined_at,
        }
    }
}

/// Request to create a club
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateClubRequest {
    pub name: String,
    pub description: String,
    pub city: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Query parameters for listing clubs
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListClubsQuery {
    /// Exact category match
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive city substring match
    #[serde(default)]
    pub city: Option<String>,
}

/// Create clubs routes
pub fn routes(state: ClubsState) -> Router {
    Router::new()
        .route("/v1/clubs", get(list_clubs).post(create_club))
        .route("/v1/clubs/:club_id", get(get_club))
        .route("/v1/clubs/:club_id/memberships", post(join_club))
        .with_state(state)
}

/// GET /v1/clubs - List clubs, newest first
#[utoipa::path(
    get,
    path = "/v1/clubs",
    params(
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("city" = Option<String>, Query, description = "Case-insensitive city substring")
    ),
    responses(
        (status = 200, description = "Clubs, newest first", body = ListResponse<ClubResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "clubs"
)]
pub async fn list_clubs(
    State(state): State<ClubsState>,
    Query(query): Query<ListClubsQuery>,
) -> Result<Json<ListResponse<ClubResponse>>, StatusCode> {
    let filter = ClubFilter {
        category: query.category,
        city: query.city,
        limit: None,
    };

    let clubs = state
        .clubs
        .list_with_member_counts(filter)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list clubs: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ListResponse::new(
        clubs
            .into_iter()
            .map(|(club, members)| ClubResponse::from_club(club, members))
            .collect(),
    )))
}

/// POST /v1/clubs - Create a new club
#[utoipa::path(
    post,
    path = "/v1/clubs",
    request_body = CreateClubRequest,
    responses(
        (status = 201, description = "Club created", body = ClubResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "clubs"
)]
pub async fn create_club(
    State(state): State<ClubsState>,
    user: AuthUser,
    Json(req): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<ClubResponse>), (StatusCode, Json<ErrorResponse>)> {
    validate_create_club(&req.name, &req.description, &req.city, &req.category)?;

    let club = state
        .clubs
        .create(
            CreateClub {
                name: req.name.trim().to_string(),
                description: req.description.trim().to_string(),
                city: req.city.trim().to_string(),
                category: req.category,
                manager_id: user.id,
                image_url: req.image_url,
            },
            user.role,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to create club: {}", e);
            ErrorResponse::new("Failed to create club")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

    // The creator is the first member
    Ok((
        StatusCode::CREATED,
        Json(ClubResponse::from_club(club, 1)),
    ))
}

/// GET /v1/clubs/{club_id} - Get club by ID
#[utoipa::path(
    get,
    path = "/v1/clubs/{club_id}",
    params(
        ("club_id" = Uuid, Path, description = "Club ID")
    ),
    responses(
        (status = 200, description = "Club found", body = ClubDetailResponse),
        (status = 404, description = "Club not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "clubs"
)]
pub async fn get_club(
    State(state): State<ClubsState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(club_id): Path<Uuid>,
) -> Result<Json<ClubDetailResponse>, (StatusCode, Json<ErrorResponse>)> {
    let internal = |e: gather_core::GatherError| {
        tracing::error!("Failed to load club: {}", e);
        ErrorResponse::new("Failed to load club").into_response(StatusCode::INTERNAL_SERVER_ERROR)
    };

    let club = state
        .clubs
        .get(club_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            ErrorResponse::new("Club not found").into_response(StatusCode::NOT_FOUND)
        })?;

    let member_count = state.clubs.member_count(club.id).await.map_err(internal)?;

    let is_member = match &user {
        Some(user) => state
            .clubs
            .is_member(user.id, club.id)
            .await
            .map_err(internal)?,
        None => false,
    };

    let upcoming_events = state
        .events
        .list_for_club_with_spots(club.id)
        .await
        .map_err(internal)?
        .into_iter()
        .map(|(event, spots)| EventResponse::from_event(event, spots))
        .collect();

    Ok(Json(ClubDetailResponse {
        club: ClubResponse::from_club(club, member_count),
        is_member,
        upcoming_events,
    }))
}

/// POST /v1/clubs/{club_id}/memberships - Join a club
#[utoipa::path(
    post,
    path = "/v1/clubs/{club_id}/memberships",
    params(
        ("club_id" = Uuid, Path, description = "Club ID")
    ),
    responses(
        (status = 201, description = "Joined", body = MembershipResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Club not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "clubs"
)]
pub async fn join_club(
    State(state): State<ClubsState>,
    user: AuthUser,
    Path(club_id): Path<Uuid>,
) -> Result<(StatusCode, Json<MembershipResponse>), (StatusCode, Json<ErrorResponse>)> {
    let outcome = state
        .admission
        .join_club(user.id, club_id)
        .await
        .map_err(|e| {
            tracing::error!("Join attempt failed: {}", e);
            ErrorResponse::new("Join failed").into_response(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

    match outcome {
        JoinOutcome::Joined { membership } => Ok((
            StatusCode::CREATED,
            Json(MembershipResponse::from(membership)),
        )),
        JoinOutcome::NotFound => {
            Err(ErrorResponse::new("Club not found").into_response(StatusCode::NOT_FOUND))
        }
        JoinOutcome::AlreadyMember => {
            Err(ErrorResponse::new(ALREADY_MEMBER_MESSAGE).into_response(StatusCode::CONFLICT))
        }
    }
}
