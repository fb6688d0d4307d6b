// Input validation for request bodies
//
// Hard limits on every free-text field, checked at the request boundary.
// Unlike the storage constraints these produce a field-specific message,
// since they guard ordinary form mistakes rather than abuse.

use super::common::ErrorResponse;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::middleware::AuthError;

// =============================================================================
// Input Limits
// =============================================================================

/// Maximum email length. Matches the column width.
pub const MAX_EMAIL_BYTES: usize = 120;

/// Minimum password length.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// First and last name length bounds.
pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 50;

/// City length bounds.
pub const MIN_CITY_CHARS: usize = 2;
pub const MAX_CITY_CHARS: usize = 100;

/// Club name length bounds.
pub const MIN_CLUB_NAME_CHARS: usize = 3;
pub const MAX_CLUB_NAME_CHARS: usize = 100;

/// Event title length bounds.
pub const MIN_EVENT_TITLE_CHARS: usize = 5;
pub const MAX_EVENT_TITLE_CHARS: usize = 200;

/// Event location length bounds.
pub const MIN_LOCATION_CHARS: usize = 5;
pub const MAX_LOCATION_CHARS: usize = 200;

/// Minimum description length for clubs and events.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Price bounds in cents. Zero means free.
pub const MAX_PRICE_CENTS: i64 = 100_000;

/// Capacity bounds.
pub const MIN_CAPACITY: i32 = 1;
pub const MAX_CAPACITY: i32 = 10_000;

/// Contact message length bounds.
pub const MIN_MESSAGE_CHARS: usize = 10;
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// The fixed category vocabulary shared by clubs and events.
pub const ALLOWED_CATEGORIES: [&str; 3] = ["sustainable", "cultural", "entertainment"];

// =============================================================================
// Validation Functions
// =============================================================================

/// Validation error carrying the client-facing message
#[derive(Debug)]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ValidationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ValidationError) -> Self {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.0)))
    }
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        AuthError::bad_request(&err.0)
    }
}

fn check_chars(label: &str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let chars = value.trim().chars().count();
    if chars < min || chars > max {
        return Err(ValidationError::new(format!(
            "{label} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Validate an email address: bounded length, one '@' with text on both sides
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_BYTES {
        return Err(ValidationError::new("Please enter a valid email address"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::new("Please enter a valid email address")),
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::new(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_person_name(label: &str, name: &str) -> Result<(), ValidationError> {
    check_chars(label, name, MIN_NAME_CHARS, MAX_NAME_CHARS)
}

pub fn validate_city(city: &str) -> Result<(), ValidationError> {
    check_chars("City", city, MIN_CITY_CHARS, MAX_CITY_CHARS)
}

pub fn validate_club_name(name: &str) -> Result<(), ValidationError> {
    check_chars("Club name", name, MIN_CLUB_NAME_CHARS, MAX_CLUB_NAME_CHARS)
}

pub fn validate_event_title(title: &str) -> Result<(), ValidationError> {
    check_chars("Title", title, MIN_EVENT_TITLE_CHARS, MAX_EVENT_TITLE_CHARS)
}

pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    check_chars("Location", location, MIN_LOCATION_CHARS, MAX_LOCATION_CHARS)
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::new(format!(
            "Description must be at least {MIN_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_price_cents(price_cents: i64) -> Result<(), ValidationError> {
    if !(0..=MAX_PRICE_CENTS).contains(&price_cents) {
        return Err(ValidationError::new(format!(
            "Price must be between 0 and {MAX_PRICE_CENTS} cents"
        )));
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> Result<(), ValidationError> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(ValidationError::new(format!(
            "Capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY}"
        )));
    }
    Ok(())
}

pub fn validate_contact_message(message: &str) -> Result<(), ValidationError> {
    check_chars("Message", message, MIN_MESSAGE_CHARS, MAX_MESSAGE_CHARS)
}

pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if !ALLOWED_CATEGORIES.contains(&category) {
        return Err(ValidationError::new(format!(
            "Category must be one of: {}",
            ALLOWED_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

/// Validate all fields of a signup request
pub fn validate_signup(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    city: Option<&str>,
) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)?;
    validate_person_name("First name", first_name)?;
    validate_person_name("Last name", last_name)?;
    if let Some(city) = city {
        validate_city(city)?;
    }
    Ok(())
}

/// Validate all fields of a club creation request
pub fn validate_create_club(
    name: &str,
    description: &str,
    city: &str,
    category: &str,
) -> Result<(), ValidationError> {
    validate_club_name(name)?;
    validate_description(description)?;
    validate_city(city)?;
    validate_category(category)?;
    Ok(())
}

/// Validate all fields of an event creation request
pub fn validate_create_event(
    title: &str,
    description: &str,
    category: &str,
    location: &str,
    city: &str,
    price_cents: i64,
    capacity: i32,
) -> Result<(), ValidationError> {
    validate_event_title(title)?;
    validate_description(description)?;
    validate_category(category)?;
    validate_location(location)?;
    validate_city(city)?;
    validate_price_cents(price_cents)?;
    validate_capacity(capacity)?;
    Ok(())
}

/// Validate all fields of a contact request
pub fn validate_contact(name: &str, email: &str, message: &str) -> Result<(), ValidationError> {
    validate_person_name("Name", name)?;
    validate_email(email)?;
    validate_contact_message(message)?;
    Ok(())
}
