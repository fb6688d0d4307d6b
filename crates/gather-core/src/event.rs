// Event domain types
//
// Capacity is the admission controller's shared budget: the invariant
// `occupancy <= capacity` must hold after every committed transaction.
// Capacity is immutable once the event exists, so readers may cache it freely
// within a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event - a scheduled gathering with a fixed number of spots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub city: String,
    /// Price in cents; zero means the event is free
    pub price_cents: i64,
    /// Maximum number of registrations, fixed at creation
    pub capacity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub creator_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }
}
