// Event service
//
// Creation and read paths for events. Available spots are derived per read
// (capacity minus committed registrations), never stored.

use std::sync::Arc;

use gather_core::{Event, GatherError, Result};
use gather_storage::{CreateEvent, EventFilter, StorageBackend};
use uuid::Uuid;

pub struct EventService {
    storage: Arc<StorageBackend>,
}

impl EventService {
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Create an event after resolving the optional club reference.
    pub async fn create(&self, input: CreateEvent) -> Result<Event> {
        if let Some(club_id) = input.club_id {
            if self.storage.get_club(club_id).await?.is_none() {
                return Err(GatherError::validation("Club not found"));
            }
        }
        let row = self.storage.create_event(input).await?;
        Ok(Event::from(row))
    }

    /// Fetch one event along with its available spots.
    pub async fn get_with_spots(&self, id: Uuid) -> Result<Option<(Event, i64)>> {
        match self.storage.get_event(id).await? {
            Some(row) => {
                let event = Event::from(row);
                let spots = self.available_spots(&event).await?;
                Ok(Some((event, spots)))
            }
            None => Ok(None),
        }
    }

    /// Upcoming events, soonest first, each with its available spots.
    pub async fn list_upcoming_with_spots(&self, filter: EventFilter) -> Result<Vec<(Event, i64)>> {
        let rows = self.storage.list_upcoming_events(filter).await?;
        self.with_spots(rows).await
    }

    /// Upcoming events of one club.
    pub async fn list_for_club_with_spots(&self, club_id: Uuid) -> Result<Vec<(Event, i64)>> {
        let rows = self.storage.list_upcoming_events_for_club(club_id).await?;
        self.with_spots(rows).await
    }

    /// Upcoming events the user holds a registration for.
    pub async fn list_registered_with_spots(&self, user_id: Uuid) -> Result<Vec<(Event, i64)>> {
        let rows = self.storage.list_registered_upcoming_events(user_id).await?;
        self.with_spots(rows).await
    }

    /// Whether the user holds a registration for the event.
    pub async fn is_registered(&self, user_id: Uuid, event_id: Uuid) -> Result<bool> {
        Ok(self
            .storage
            .get_registration(user_id, event_id)
            .await?
            .is_some())
    }

    async fn available_spots(&self, event: &Event) -> Result<i64> {
        let occupancy = self
            .storage
            .count_registrations_for_event(event.id)
            .await?;
        Ok((i64::from(event.capacity) - occupancy).max(0))
    }

    async fn with_spots(&self, rows: Vec<gather_storage::EventRow>) -> Result<Vec<(Event, i64)>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let event = Event::from(row);
            let spots = self.available_spots(&event).await?;
            out.push((event, spots));
        }
        Ok(out)
    }
}
