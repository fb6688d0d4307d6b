// Database row models and write inputs
//
// Rows mirror the table shapes exactly; status-like columns are TEXT and get
// parsed into the core enums by the From conversions at the bottom. Both the
// Postgres and in-memory backends produce these same row types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use gather_core::{
    Club, ContactMessage, Event, Membership, PaymentStatus, Registration, User, UserRole,
};

// ============================================
// Rows
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ClubRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub city: String,
    pub category: String,
    pub manager_id: Uuid,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub city: String,
    pub price_cents: i64,
    pub capacity: i32,
    pub image_url: Option<String>,
    pub creator_id: Uuid,
    pub club_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub payment_status: String,
    pub payment_ref: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub club_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ContactMessageRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

// ============================================
// Write inputs
// ============================================

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateClub {
    pub name: String,
    pub description: String,
    pub city: String,
    pub category: String,
    pub manager_id: Uuid,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub city: String,
    pub price_cents: i64,
    pub capacity: i32,
    pub image_url: Option<String>,
    pub creator_id: Uuid,
    pub club_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

// ============================================
// List filters
// ============================================

/// Filters for event listings; all optional, combined with AND
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive substring match on city
    pub city: Option<String>,
    pub limit: Option<i64>,
}

/// Filters for club listings; same semantics as [`EventFilter`]
#[derive(Debug, Clone, Default)]
pub struct ClubFilter {
    pub category: Option<String>,
    pub city: Option<String>,
    pub limit: Option<i64>,
}

// ============================================
// Row -> domain conversions
// ============================================

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: UserRole::from(row.role.as_str()),
            bio: row.bio,
            city: row.city,
            interests: row.interests,
            created_at: row.created_at,
        }
    }
}

impl From<ClubRow> for Club {
    fn from(row: ClubRow) -> Self {
        Club {
            id: row.id,
            name: row.name,
            description: row.description,
            city: row.city,
            category: row.category,
            manager_id: row.manager_id,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            starts_at: row.starts_at,
            location: row.location,
            city: row.city,
            price_cents: row.price_cents,
            capacity: row.capacity,
            image_url: row.image_url,
            creator_id: row.creator_id,
            club_id: row.club_id,
            created_at: row.created_at,
        }
    }
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Registration {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            payment_status: PaymentStatus::from(row.payment_status.as_str()),
            payment_ref: row.payment_ref,
            registered_at: row.registered_at,
        }
    }
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Membership {
            id: row.id,
            user_id: row.user_id,
            club_id: row.club_id,
            joined_at: row.joined_at,
        }
    }
}

impl From<ContactMessageRow> for ContactMessage {
    fn from(row: ContactMessageRow) -> Self {
        ContactMessage {
            id: row.id,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: row.created_at,
        }
    }
}
