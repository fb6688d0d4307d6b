// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// A unified StorageBackend that works with either PostgreSQL (production) or
// in-memory (dev mode) storage. Both variants implement identical admission
// semantics: same outcome taxonomy, same check order, same atomicity. The
// admission controller above this layer never knows which engine it runs on.

use sqlx::PgPool;
use uuid::Uuid;

use gather_core::{AdmissionOutcome, JoinOutcome, Result, UserRole};

use crate::memory::InMemoryDatabase;
use crate::models::*;
use crate::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(std::sync::Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(std::sync::Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Get the PostgreSQL pool if using the PostgreSQL backend
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    /// Run schema migrations; a no-op for the in-memory backend
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Postgres(db) => db.migrate().await,
            Self::InMemory(_) => Ok(()),
        }
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_email(email).await,
            Self::InMemory(db) => db.get_user_by_email(email).await,
        }
    }

    pub async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.set_user_role(id, role).await,
            Self::InMemory(db) => db.set_user_role(id, role).await,
        }
    }

    pub async fn count_users(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_users().await,
            Self::InMemory(db) => db.count_users().await,
        }
    }

    // ============================================
    // Clubs
    // ============================================

    pub async fn create_club(&self, input: CreateClub) -> Result<ClubRow> {
        match self {
            Self::Postgres(db) => db.create_club(input).await,
            Self::InMemory(db) => db.create_club(input).await,
        }
    }

    pub async fn get_club(&self, id: Uuid) -> Result<Option<ClubRow>> {
        match self {
            Self::Postgres(db) => db.get_club(id).await,
            Self::InMemory(db) => db.get_club(id).await,
        }
    }

    pub async fn list_clubs(&self, filter: ClubFilter) -> Result<Vec<ClubRow>> {
        match self {
            Self::Postgres(db) => db.list_clubs(filter).await,
            Self::InMemory(db) => db.list_clubs(filter).await,
        }
    }

    pub async fn list_clubs_for_user(&self, user_id: Uuid) -> Result<Vec<ClubRow>> {
        match self {
            Self::Postgres(db) => db.list_clubs_for_user(user_id).await,
            Self::InMemory(db) => db.list_clubs_for_user(user_id).await,
        }
    }

    pub async fn count_clubs(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_clubs().await,
            Self::InMemory(db) => db.count_clubs().await,
        }
    }

    pub async fn count_members_for_club(&self, club_id: Uuid) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_members_for_club(club_id).await,
            Self::InMemory(db) => db.count_members_for_club(club_id).await,
        }
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        match self {
            Self::Postgres(db) => db.create_event(input).await,
            Self::InMemory(db) => db.create_event(input).await,
        }
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn list_upcoming_events(&self, filter: EventFilter) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_upcoming_events(filter).await,
            Self::InMemory(db) => db.list_upcoming_events(filter).await,
        }
    }

    pub async fn list_upcoming_events_for_club(&self, club_id: Uuid) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_upcoming_events_for_club(club_id).await,
            Self::InMemory(db) => db.list_upcoming_events_for_club(club_id).await,
        }
    }

    pub async fn list_registered_upcoming_events(&self, user_id: Uuid) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_registered_upcoming_events(user_id).await,
            Self::InMemory(db) => db.list_registered_upcoming_events(user_id).await,
        }
    }

    pub async fn count_events(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_events().await,
            Self::InMemory(db) => db.count_events().await,
        }
    }

    pub async fn count_event_cities(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_event_cities().await,
            Self::InMemory(db) => db.count_event_cities().await,
        }
    }

    // ============================================
    // Registrations (admission)
    // ============================================

    /// Atomic admission decision; see the backend implementations for the
    /// locking discipline each engine uses.
    pub async fn register_for_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<AdmissionOutcome> {
        match self {
            Self::Postgres(db) => db.register_for_event(user_id, event_id).await,
            Self::InMemory(db) => db.register_for_event(user_id, event_id).await,
        }
    }

    pub async fn get_registration(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RegistrationRow>> {
        match self {
            Self::Postgres(db) => db.get_registration(user_id, event_id).await,
            Self::InMemory(db) => db.get_registration(user_id, event_id).await,
        }
    }

    pub async fn count_registrations_for_event(&self, event_id: Uuid) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_registrations_for_event(event_id).await,
            Self::InMemory(db) => db.count_registrations_for_event(event_id).await,
        }
    }

    // ============================================
    // Memberships
    // ============================================

    pub async fn join_club(&self, user_id: Uuid, club_id: Uuid) -> Result<JoinOutcome> {
        match self {
            Self::Postgres(db) => db.join_club(user_id, club_id).await,
            Self::InMemory(db) => db.join_club(user_id, club_id).await,
        }
    }

    pub async fn get_membership(
        &self,
        user_id: Uuid,
        club_id: Uuid,
    ) -> Result<Option<MembershipRow>> {
        match self {
            Self::Postgres(db) => db.get_membership(user_id, club_id).await,
            Self::InMemory(db) => db.get_membership(user_id, club_id).await,
        }
    }

    // ============================================
    // Contact messages
    // ============================================

    pub async fn create_contact_message(
        &self,
        input: CreateContactMessage,
    ) -> Result<ContactMessageRow> {
        match self {
            Self::Postgres(db) => db.create_contact_message(input).await,
            Self::InMemory(db) => db.create_contact_message(input).await,
        }
    }
}
