// Integration tests for the Gather API
// Run with: cargo test -p gather-api --test api_test
// Runs entirely in process against the in-memory backend; no database needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gather_api::auth::AuthConfig;
use gather_api::build_router;
use gather_storage::StorageBackend;

fn test_app() -> Router {
    let mut config = AuthConfig::default();
    config.jwt.secret = "integration-test-secret".to_string();
    build_router(Arc::new(StorageBackend::in_memory()), config)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn post_json_auth(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

/// POST without a body, for the registration and membership routes
fn post_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };
    (status, body)
}

async fn signup(app: &Router, email: &str, first_name: &str, last_name: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/v1/auth/register",
            &json!({
                "email": email,
                "password": "password123",
                "first_name": first_name,
                "last_name": last_name,
                "city": "Berlin"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["access_token"]
        .as_str()
        .expect("missing access_token")
        .to_string()
}

async fn create_club(app: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(
        app,
        post_json_auth(
            "/v1/clubs",
            token,
            &json!({
                "name": name,
                "description": "A club created by the integration tests for exercising the API.",
                "city": "Berlin",
                "category": "cultural"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "club creation failed: {body}");
    body
}

async fn create_event(
    app: &Router,
    token: &str,
    club_id: &str,
    capacity: i32,
    price_cents: i64,
) -> Value {
    let starts_at = (Utc::now() + Duration::days(7)).to_rfc3339();
    let (status, body) = send(
        app,
        post_json_auth(
            "/v1/events",
            token,
            &json!({
                "title": "Integration Test Meetup",
                "description": "An event created by the integration tests for exercising the API.",
                "category": "cultural",
                "city": "Berlin",
                "location": "Test Hall 1",
                "starts_at": starts_at,
                "price_cents": price_cents,
                "capacity": capacity,
                "club_id": club_id
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "event creation failed: {body}");
    body
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage_mode"], "in-memory");
}

#[tokio::test]
async fn test_signup_login_me_flow() {
    let app = test_app();

    // Step 1: Register
    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/register",
            &json!({
                "email": "Ada@Example.com",
                "password": "password123",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "city": "Berlin"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["expires_in"].as_i64().unwrap() > 0);
    let register_token = body["access_token"].as_str().unwrap().to_string();

    // Step 2: Me with the register token; email was normalized to lowercase
    let (status, me) = send(&app, get_auth("/v1/auth/me", &register_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ada@example.com");
    assert_eq!(me["first_name"], "Ada");
    assert_eq!(me["role"], "user");

    // Step 3: Login with the same credentials, mixed-case email
    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/login",
            &json!({
                "email": "ADA@example.com",
                "password": "password123"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let login_token = body["access_token"].as_str().unwrap().to_string();

    // Step 4: Me with the login token
    let (status, me) = send(&app, get_auth("/v1/auth/me", &login_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ada@example.com");
}

#[tokio::test]
async fn test_signup_rejects_invalid_input() {
    let app = test_app();

    // Email without a domain
    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/register",
            &json!({
                "email": "not-an-email",
                "password": "password123",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a valid email address");

    // Password too short
    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/register",
            &json!({
                "email": "ada@example.com",
                "password": "short",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters");

    // Duplicate email
    signup(&app, "ada@example.com", "Ada", "Lovelace").await;
    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/register",
            &json!({
                "email": "ada@example.com",
                "password": "password123",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = test_app();
    signup(&app, "ada@example.com", "Ada", "Lovelace").await;

    // Wrong password and unknown email produce the same message
    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/login",
            &json!({"email": "ada@example.com", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = send(
        &app,
        post_json(
            "/v1/auth/login",
            &json!({"email": "nobody@example.com", "password": "password123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    // Me without a token
    let (status, body) = send(&app, get("/v1/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_event_creation_requires_club_manager() {
    let app = test_app();
    let token = signup(&app, "plain@example.com", "Plain", "User").await;

    let starts_at = (Utc::now() + Duration::days(7)).to_rfc3339();
    let (status, body) = send(
        &app,
        post_json_auth(
            "/v1/events",
            &token,
            &json!({
                "title": "Should Not Exist",
                "description": "Plain users may not create events, this must be rejected.",
                "category": "cultural",
                "city": "Berlin",
                "location": "Nowhere",
                "starts_at": starts_at,
                "capacity": 10
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only club managers can create events");
}

#[tokio::test]
async fn test_club_creation_promotes_creator() {
    let app = test_app();
    let token = signup(&app, "founder@example.com", "Frida", "Founder").await;

    // Before: plain user
    let (_, me) = send(&app, get_auth("/v1/auth/me", &token)).await;
    assert_eq!(me["role"], "user");
    let user_id = me["id"].as_str().unwrap().to_string();

    // Create a club; the creator becomes manager and first member
    let club = create_club(&app, &token, "Founders Club").await;
    assert_eq!(club["manager_id"], user_id.as_str());
    assert_eq!(club["member_count"], 1);

    // The promotion is visible with the same token, no re-login needed
    let (_, me) = send(&app, get_auth("/v1/auth/me", &token)).await;
    assert_eq!(me["role"], "club_manager");

    // And event creation now succeeds
    let club_id = club["id"].as_str().unwrap();
    let event = create_event(&app, &token, club_id, 25, 0).await;
    assert_eq!(event["capacity"], 25);
    assert_eq!(event["available_spots"], 25);
    assert_eq!(event["is_free"], true);
    assert_eq!(event["club_id"], club_id);
}

#[tokio::test]
async fn test_event_registration_flow() {
    let app = test_app();

    println!("Setting up manager, club and a capacity-2 free event...");
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Registration Test Club").await;
    let club_id = club["id"].as_str().unwrap();
    let event = create_event(&app, &manager, club_id, 2, 0).await;
    let event_id = event["id"].as_str().unwrap();
    let register_uri = format!("/v1/events/{event_id}/registrations");
    let detail_uri = format!("/v1/events/{event_id}");

    println!("First attendee registers...");
    let alice = signup(&app, "alice@example.com", "Alice", "Attendee").await;
    let (_, alice_me) = send(&app, get_auth("/v1/auth/me", &alice)).await;
    let (status, body) = send(&app, post_auth(&register_uri, &alice)).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    assert_eq!(body["event_id"], event_id);
    assert_eq!(body["user_id"], alice_me["id"]);
    // Free event: committed as paid
    assert_eq!(body["payment_status"], "paid");

    println!("Duplicate registration is rejected...");
    let (status, body) = send(&app, post_auth(&register_uri, &alice)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You are already registered for this event.");

    println!("Detail reflects the registration...");
    let (status, body) = send(&app, get_auth(&detail_uri, &alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_registered"], true);
    assert_eq!(body["event"]["available_spots"], 1);

    println!("Second attendee takes the last spot...");
    let bob = signup(&app, "bob@example.com", "Bob", "Attendee").await;
    let (status, _) = send(&app, post_auth(&register_uri, &bob)).await;
    assert_eq!(status, StatusCode::CREATED);

    println!("Third attendee finds the event full...");
    let carol = signup(&app, "carol@example.com", "Carol", "Attendee").await;
    let (status, body) = send(&app, post_auth(&register_uri, &carol)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Sorry, this event is full.");

    // Capacity is never exceeded
    let (_, body) = send(&app, get(&detail_uri)).await;
    assert_eq!(body["event"]["available_spots"], 0);
    assert_eq!(body["is_registered"], false); // anonymous caller
}

#[tokio::test]
async fn test_priced_event_registration_is_pending() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Paid Events Club").await;
    let event = create_event(&app, &manager, club["id"].as_str().unwrap(), 10, 1500).await;
    assert_eq!(event["is_free"], false);
    assert_eq!(event["price_cents"], 1500);

    let attendee = signup(&app, "attendee@example.com", "Avery", "Attendee").await;
    let (status, body) = send(
        &app,
        post_auth(
            &format!("/v1/events/{}/registrations", event["id"].as_str().unwrap()),
            &attendee,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Priced event: payment is still due
    assert_eq!(body["payment_status"], "pending");
}

#[tokio::test]
async fn test_registration_for_unknown_event() {
    let app = test_app();
    let token = signup(&app, "attendee@example.com", "Avery", "Attendee").await;

    let missing = uuid::Uuid::now_v7();
    let (status, body) = send(
        &app,
        post_auth(&format!("/v1/events/{missing}/registrations"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
async fn test_anonymous_cannot_register() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Members Only Club").await;
    let event = create_event(&app, &manager, club["id"].as_str().unwrap(), 10, 0).await;

    let (status, body) = send(
        &app,
        post_empty(&format!(
            "/v1/events/{}/registrations",
            event["id"].as_str().unwrap()
        )),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_event_must_start_in_future() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Punctual Club").await;

    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    let (status, body) = send(
        &app,
        post_json_auth(
            "/v1/events",
            &manager,
            &json!({
                "title": "Yesterday's News",
                "description": "Events that already started cannot accept registrations.",
                "category": "cultural",
                "city": "Berlin",
                "location": "The Past",
                "starts_at": yesterday,
                "capacity": 10,
                "club_id": club["id"].clone()
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Event must start in the future");
}

#[tokio::test]
async fn test_event_rejects_short_location() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Precise Club").await;

    let starts_at = (Utc::now() + Duration::days(7)).to_rfc3339();
    let (status, body) = send(
        &app,
        post_json_auth(
            "/v1/events",
            &manager,
            &json!({
                "title": "Event Without a Venue",
                "description": "Events need a real location so attendees can find them.",
                "category": "cultural",
                "city": "Berlin",
                "location": "TBD",
                "starts_at": starts_at,
                "capacity": 10,
                "club_id": club["id"].clone()
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Location must be between 5 and 200 characters");
}

#[tokio::test]
async fn test_club_membership_flow() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Joinable Club").await;
    let club_id = club["id"].as_str().unwrap();
    let join_uri = format!("/v1/clubs/{club_id}/memberships");
    let detail_uri = format!("/v1/clubs/{club_id}");

    // Join
    let member = signup(&app, "member@example.com", "Mia", "Member").await;
    let (status, body) = send(&app, post_auth(&join_uri, &member)).await;
    assert_eq!(status, StatusCode::CREATED, "join failed: {body}");
    assert_eq!(body["club_id"], club_id);

    // Joining again is rejected
    let (status, body) = send(&app, post_auth(&join_uri, &member)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You are already a member of this club.");

    // Detail shows membership and the count includes the manager
    let (status, body) = send(&app, get_auth(&detail_uri, &member)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_member"], true);
    assert_eq!(body["club"]["member_count"], 2);

    // Anonymous callers see the club but no membership
    let (_, body) = send(&app, get(&detail_uri)).await;
    assert_eq!(body["is_member"], false);

    // Unknown club
    let missing = uuid::Uuid::now_v7();
    let (status, body) = send(
        &app,
        post_auth(&format!("/v1/clubs/{missing}/memberships"), &member),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Club not found");
}

#[tokio::test]
async fn test_contact_form() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/v1/contact",
            &json!({
                "name": "Visitor",
                "email": "Visitor@Example.com",
                "message": "Hello, I would like to know more about the platform."
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "contact failed: {body}");
    assert_eq!(body["email"], "visitor@example.com");
    assert_eq!(body["name"], "Visitor");

    // Message too short
    let (status, body) = send(
        &app,
        post_json(
            "/v1/contact",
            &json!({
                "name": "Visitor",
                "email": "visitor@example.com",
                "message": "Hi"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message must be between 10 and 1000 characters");
}

#[tokio::test]
async fn test_home_payload() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Homepage Club").await;
    create_event(&app, &manager, club["id"].as_str().unwrap(), 20, 0).await;

    let (status, body) = send(&app, get("/v1/home")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["upcoming_events"].as_array().unwrap().len(), 1);
    assert_eq!(body["newest_clubs"].as_array().unwrap().len(), 1);
    assert_eq!(body["stats"]["total_events"], 1);
    assert_eq!(body["stats"]["total_clubs"], 1);
    assert_eq!(body["stats"]["total_members"], 1);
    assert_eq!(body["stats"]["total_cities"], 1);
}

#[tokio::test]
async fn test_dashboard_flow() {
    let app = test_app();

    // Anonymous callers are rejected
    let (status, _) = send(&app, get("/v1/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Dashboard Club").await;
    let club_id = club["id"].as_str().unwrap();
    let event = create_event(&app, &manager, club_id, 10, 0).await;
    let event_id = event["id"].as_str().unwrap();

    let member = signup(&app, "member@example.com", "Mia", "Member").await;
    let (status, _) = send(
        &app,
        post_auth(&format!("/v1/events/{event_id}/registrations"), &member),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        post_auth(&format!("/v1/clubs/{club_id}/memberships"), &member),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get_auth("/v1/dashboard", &member)).await;
    assert_eq!(status, StatusCode::OK);
    let registered = body["registered_events"].as_array().unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0]["id"], event_id);
    let clubs = body["clubs"].as_array().unwrap();
    assert_eq!(clubs.len(), 1);
    assert_eq!(clubs[0]["id"], club_id);

    // A fresh user has an empty dashboard
    let fresh = signup(&app, "fresh@example.com", "Finn", "Fresh").await;
    let (_, body) = send(&app, get_auth("/v1/dashboard", &fresh)).await;
    assert!(body["registered_events"].as_array().unwrap().is_empty());
    assert!(body["clubs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_event_list_filters() {
    let app = test_app();
    let manager = signup(&app, "manager@example.com", "Mara", "Manager").await;
    let club = create_club(&app, &manager, "Filter Club").await;
    let club_id = club["id"].as_str().unwrap();

    // Two events in different categories and cities
    create_event(&app, &manager, club_id, 10, 0).await; // cultural, Berlin
    let starts_at = (Utc::now() + Duration::days(3)).to_rfc3339();
    let (status, _) = send(
        &app,
        post_json_auth(
            "/v1/events",
            &manager,
            &json!({
                "title": "Harbour Cleanup Morning",
                "description": "A sustainable morning cleaning up the harbour front together.",
                "category": "sustainable",
                "city": "Hamburg",
                "location": "Harbour Gate 3",
                "starts_at": starts_at,
                "capacity": 30,
                "club_id": club_id
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/v1/events")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/v1/events?category=sustainable")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["category"], "sustainable");

    // City matching is a case-insensitive substring
    let (_, body) = send(&app, get("/v1/events?city=ham")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["city"], "Hamburg");
}
