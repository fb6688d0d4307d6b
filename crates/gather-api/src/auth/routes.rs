// Authentication HTTP routes
// Decision: /v1/auth/* prefix, consistent with the other API routes
// Decision: token in the JSON body for API clients and in a cookie for
// browsers; both paths validate the same way

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::middleware::{AuthError, AuthState, AuthUser};
use crate::api::validation::validate_signup;
use gather_core::{GatherError, UserRole};
use gather_storage::{
    password::{hash_password, verify_password},
    CreateUser, UserRow,
};

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub city: Option<String>,
}

/// Token response
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/me", get(get_current_user))
        .with_state(state)
}

/// POST /v1/auth/register - Register a new user
pub async fn register(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<TokenResponse>), AuthError> {
    if state.config.disable_signup {
        return Err(AuthError::forbidden("Registration is disabled"));
    }

    validate_signup(
        &req.email,
        &req.password,
        &req.first_name,
        &req.last_name,
        req.city.as_deref(),
    )?;

    let email = req.email.trim().to_lowercase();

    // Check if user already exists
    let existing = state.storage.get_user_by_email(&email).await.map_err(|e| {
        tracing::error!("Database error during registration: {}", e);
        AuthError::internal("Registration failed")
    })?;

    if existing.is_some() {
        return Err(AuthError::conflict("Email already registered"));
    }

    // Hash password
    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing error: {}", e);
        AuthError::internal("Registration failed")
    })?;

    // Create user; the unique index on email backstops the pre-check above
    let user = state
        .storage
        .create_user(CreateUser {
            email,
            password_hash,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            role: UserRole::User,
            bio: None,
            city: req.city.map(|c| c.trim().to_string()),
            interests: Vec::new(),
        })
        .await
        .map_err(|e| match e {
            GatherError::Validation(_) => AuthError::conflict("Email already registered"),
            other => {
                tracing::error!("User creation error: {}", other);
                AuthError::internal("Registration failed")
            }
        })?;

    let (jar, json) = token_response(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, json))
}

/// POST /v1/auth/login - Login with email and password
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), AuthError> {
    // Find user by email; same message for unknown email and wrong password
    let user = state
        .storage
        .get_user_by_email(&req.email.trim().to_lowercase())
        .await
        .map_err(|e| {
            tracing::error!("Database error during login: {}", e);
            AuthError::internal("Login failed")
        })?
        .ok_or_else(|| AuthError::unauthorized("Invalid email or password"))?;

    let valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {}", e);
        AuthError::internal("Login failed")
    })?;

    if !valid {
        return Err(AuthError::unauthorized("Invalid email or password"));
    }

    token_response(&state, jar, &user)
}

/// POST /v1/auth/logout - Logout (clear the cookie)
pub async fn logout(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build("access_token").path("/"))
}

/// GET /v1/auth/me - Get current user info
pub async fn get_current_user(
    State(state): State<AuthState>,
    user: AuthUser,
) -> Result<Json<UserInfoResponse>, AuthError> {
    let row = state
        .storage
        .get_user(user.id)
        .await
        .map_err(|e| {
            tracing::error!("Database error fetching current user: {}", e);
            AuthError::internal("Failed to load user")
        })?
        .ok_or_else(|| AuthError::unauthorized("Invalid or expired token"))?;

    Ok(Json(UserInfoResponse {
        id: row.id,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        role: UserRole::from(row.role.as_str()),
        bio: row.bio,
        city: row.city,
        interests: row.interests,
        created_at: row.created_at,
    }))
}

/// Helper: Generate token response with cookie
fn token_response(
    state: &AuthState,
    jar: CookieJar,
    user: &UserRow,
) -> Result<(CookieJar, Json<TokenResponse>), AuthError> {
    let name = format!("{} {}", user.first_name, user.last_name);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.email, &name, &user.role)
        .map_err(|e| {
            tracing::error!("Token generation error: {}", e);
            AuthError::internal("Login failed")
        })?;

    // Session cookie: the token's own exp bounds its lifetime
    let access_cookie = Cookie::build(("access_token", access_token.clone()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(access_cookie),
        Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_service.access_token_lifetime_secs(),
        }),
    ))
}
