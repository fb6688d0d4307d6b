// Admission outcome types
//
// Every admission attempt resolves to exactly one typed outcome. A full event
// or a duplicate request is an expected result, not an error; only transient
// storage contention is retryable, and the service retries it a bounded
// number of times before surfacing TransientFailure.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::membership::Membership;
use crate::registration::Registration;

/// Result of one event registration attempt
///
/// `Admitted` means exactly one registration row was committed. Every other
/// variant means zero rows were written by this attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionOutcome {
    /// The user got a spot; carries the committed registration.
    Admitted { registration: Registration },
    /// The event does not exist.
    NotFound,
    /// Occupancy already equals capacity.
    EventFull,
    /// A registration for this (user, event) pair already exists. Distinct
    /// from EventFull: this is the normal result of a double-click or retry.
    AlreadyRegistered,
    /// Storage contention survived the retry budget; safe to try again later.
    TransientFailure,
}

impl AdmissionOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionOutcome::Admitted { .. })
    }
}

/// Result of one club join attempt
///
/// The lighter twin of [`AdmissionOutcome`]: no capacity budget, so the only
/// conflict is the uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JoinOutcome {
    /// The user joined; carries the committed membership.
    Joined { membership: Membership },
    /// The club does not exist.
    NotFound,
    /// A membership for this (user, club) pair already exists.
    AlreadyMember,
}

impl JoinOutcome {
    pub fn is_joined(&self) -> bool {
        matches!(self, JoinOutcome::Joined { .. })
    }
}
