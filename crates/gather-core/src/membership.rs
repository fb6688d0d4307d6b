// Club membership domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Membership - one user's place in one club
///
/// Guarded only by the (user_id, club_id) uniqueness constraint; there is no
/// capacity budget on clubs, so joining needs no locking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub club_id: Uuid,
    pub joined_at: DateTime<Utc>,
}
