// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered), matching Postgres ids
//
// Provides a PostgreSQL-compatible API backed by HashMaps so the platform can
// run without a database. The admission semantics are identical to the
// Postgres backend: the registrations write lock is held across the whole
// check-then-insert, playing the role of the event row lock, and the
// duplicate scan stands in for the uniqueness constraint. Locks are never
// held across an await point.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use gather_core::{AdmissionOutcome, GatherError, JoinOutcome, PaymentStatus, Result};

use crate::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, UserRow>>,
    clubs: RwLock<HashMap<Uuid, ClubRow>>,
    events: RwLock<HashMap<Uuid, EventRow>>,
    registrations: RwLock<HashMap<Uuid, RegistrationRow>>,
    memberships: RwLock<HashMap<Uuid, MembershipRow>>,
    contact_messages: RwLock<HashMap<Uuid, ContactMessageRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let mut users = self.users.write();
        // Same duplicate-email answer the Postgres constraint gives
        if users.values().any(|u| u.email == input.email) {
            return Err(GatherError::validation("email is already registered"));
        }
        let row = UserRow {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: input.password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role.to_string(),
            bio: input.bio,
            city: input.city,
            interests: input.interests,
            created_at: Self::now(),
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub async fn set_user_role(&self, id: Uuid, role: gather_core::UserRole) -> Result<bool> {
        let mut users = self.users.write();
        if let Some(user) = users.get_mut(&id) {
            user.role = role.to_string();
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn count_users(&self) -> Result<i64> {
        Ok(self.users.read().len() as i64)
    }

    // ============================================
    // Clubs
    // ============================================

    pub async fn create_club(&self, input: CreateClub) -> Result<ClubRow> {
        let row = ClubRow {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            city: input.city,
            category: input.category,
            manager_id: input.manager_id,
            image_url: input.image_url,
            created_at: Self::now(),
        };
        self.clubs.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_club(&self, id: Uuid) -> Result<Option<ClubRow>> {
        Ok(self.clubs.read().get(&id).cloned())
    }

    pub async fn list_clubs(&self, filter: ClubFilter) -> Result<Vec<ClubRow>> {
        let clubs = self.clubs.read();
        let mut result: Vec<_> = clubs
            .values()
            .filter(|c| match &filter.category {
                Some(category) => &c.category == category,
                None => true,
            })
            .filter(|c| match &filter.city {
                Some(city) => c.city.to_lowercase().contains(&city.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            result.truncate(limit as usize);
        }
        Ok(result)
    }

    pub async fn list_clubs_for_user(&self, user_id: Uuid) -> Result<Vec<ClubRow>> {
        let mut joined: Vec<_> = self
            .memberships
            .read()
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        joined.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));

        let clubs = self.clubs.read();
        Ok(joined
            .into_iter()
            .filter_map(|m| clubs.get(&m.club_id).cloned())
            .collect())
    }

    pub async fn count_clubs(&self) -> Result<i64> {
        Ok(self.clubs.read().len() as i64)
    }

    pub async fn count_members_for_club(&self, club_id: Uuid) -> Result<i64> {
        Ok(self
            .memberships
            .read()
            .values()
            .filter(|m| m.club_id == club_id)
            .count() as i64)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = EventRow {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            category: input.category,
            starts_at: input.starts_at,
            location: input.location,
            city: input.city,
            price_cents: input.price_cents,
            capacity: input.capacity,
            image_url: input.image_url,
            creator_id: input.creator_id,
            club_id: input.club_id,
            created_at: Self::now(),
        };
        self.events.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn list_upcoming_events(&self, filter: EventFilter) -> Result<Vec<EventRow>> {
        let now = Self::now();
        let events = self.events.read();
        let mut result: Vec<_> = events
            .values()
            .filter(|e| e.starts_at > now)
            .filter(|e| match &filter.category {
                Some(category) => &e.category == category,
                None => true,
            })
            .filter(|e| match &filter.city {
                Some(city) => e.city.to_lowercase().contains(&city.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        if let Some(limit) = filter.limit {
            result.truncate(limit as usize);
        }
        Ok(result)
    }

    pub async fn list_upcoming_events_for_club(&self, club_id: Uuid) -> Result<Vec<EventRow>> {
        let now = Self::now();
        let events = self.events.read();
        let mut result: Vec<_> = events
            .values()
            .filter(|e| e.club_id == Some(club_id) && e.starts_at > now)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(result)
    }

    pub async fn list_registered_upcoming_events(&self, user_id: Uuid) -> Result<Vec<EventRow>> {
        let registered: Vec<Uuid> = self
            .registrations
            .read()
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.event_id)
            .collect();

        let now = Self::now();
        let events = self.events.read();
        let mut result: Vec<_> = registered
            .into_iter()
            .filter_map(|id| events.get(&id).cloned())
            .filter(|e| e.starts_at > now)
            .collect();
        result.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(result)
    }

    pub async fn count_events(&self) -> Result<i64> {
        Ok(self.events.read().len() as i64)
    }

    pub async fn count_event_cities(&self) -> Result<i64> {
        let events = self.events.read();
        let mut cities: Vec<_> = events.values().map(|e| e.city.clone()).collect();
        cities.sort();
        cities.dedup();
        Ok(cities.len() as i64)
    }

    // ============================================
    // Registrations (admission)
    // ============================================

    /// Admission decision for one (user, event) pair.
    ///
    /// Holding the registrations write lock across the occupancy count, the
    /// duplicate scan, and the insert makes the whole decision atomic, the
    /// same guarantee the Postgres backend gets from its event row lock.
    /// Capacity is checked before duplicates, so a duplicate request against
    /// a full event reports EventFull, matching the Postgres check order.
    pub async fn register_for_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<AdmissionOutcome> {
        // Capacity and price are immutable, so reading them outside the
        // critical section is safe.
        let event = match self.events.read().get(&event_id) {
            Some(event) => event.clone(),
            None => return Ok(AdmissionOutcome::NotFound),
        };

        let mut registrations = self.registrations.write();

        let occupancy = registrations
            .values()
            .filter(|r| r.event_id == event_id)
            .count();
        if occupancy >= event.capacity as usize {
            return Ok(AdmissionOutcome::EventFull);
        }

        if registrations
            .values()
            .any(|r| r.event_id == event_id && r.user_id == user_id)
        {
            return Ok(AdmissionOutcome::AlreadyRegistered);
        }

        let row = RegistrationRow {
            id: Uuid::now_v7(),
            user_id,
            event_id,
            payment_status: PaymentStatus::for_price(event.price_cents).to_string(),
            payment_ref: None,
            registered_at: Self::now(),
        };
        registrations.insert(row.id, row.clone());
        Ok(AdmissionOutcome::Admitted {
            registration: row.into(),
        })
    }

    pub async fn get_registration(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RegistrationRow>> {
        Ok(self
            .registrations
            .read()
            .values()
            .find(|r| r.user_id == user_id && r.event_id == event_id)
            .cloned())
    }

    pub async fn count_registrations_for_event(&self, event_id: Uuid) -> Result<i64> {
        Ok(self
            .registrations
            .read()
            .values()
            .filter(|r| r.event_id == event_id)
            .count() as i64)
    }

    // ============================================
    // Memberships
    // ============================================

    /// Join decision for one (user, club) pair; the write lock held across
    /// the duplicate scan and insert stands in for the uniqueness constraint.
    pub async fn join_club(&self, user_id: Uuid, club_id: Uuid) -> Result<JoinOutcome> {
        if self.clubs.read().get(&club_id).is_none() {
            return Ok(JoinOutcome::NotFound);
        }

        let mut memberships = self.memberships.write();
        if memberships
            .values()
            .any(|m| m.club_id == club_id && m.user_id == user_id)
        {
            return Ok(JoinOutcome::AlreadyMember);
        }

        let row = MembershipRow {
            id: Uuid::now_v7(),
            user_id,
            club_id,
            joined_at: Self::now(),
        };
        memberships.insert(row.id, row.clone());
        Ok(JoinOutcome::Joined {
            membership: row.into(),
        })
    }

    pub async fn get_membership(
        &self,
        user_id: Uuid,
        club_id: Uuid,
    ) -> Result<Option<MembershipRow>> {
        Ok(self
            .memberships
            .read()
            .values()
            .find(|m| m.user_id == user_id && m.club_id == club_id)
            .cloned())
    }

    // ============================================
    // Contact messages
    // ============================================

    pub async fn create_contact_message(
        &self,
        input: CreateContactMessage,
    ) -> Result<ContactMessageRow> {
        let row = ContactMessageRow {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            message: input.message,
            created_at: Self::now(),
        };
        self.contact_messages.write().insert(row.id, row.clone());
        Ok(row)
    }
}
