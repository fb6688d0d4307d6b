// Admission service
//
// The single entry point for registration and membership attempts. Storage
// decides the outcome atomically; this layer only retries transient
// contention (lock timeout, deadlock, serialization failure) a bounded
// number of times before giving up with TransientFailure. Terminal outcomes
// (NotFound, EventFull, AlreadyRegistered) are never retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use gather_core::{AdmissionOutcome, JoinOutcome, Result};
use gather_storage::StorageBackend;
use uuid::Uuid;

/// Attempts per admission request, first try included.
const ADMISSION_MAX_ATTEMPTS: u32 = 3;

/// Base backoff between attempts; attempt n waits n times this.
const ADMISSION_RETRY_BACKOFF: Duration = Duration::from_millis(25);

pub struct AdmissionService {
    storage: Arc<StorageBackend>,
}

impl AdmissionService {
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Attempt to register a user for an event.
    ///
    /// Each attempt runs the whole check-then-insert transaction from the
    /// start; nothing is carried over between attempts.
    pub async fn register(&self, user_id: Uuid, event_id: Uuid) -> Result<AdmissionOutcome> {
        let outcome =
            drive_attempts(|| self.storage.register_for_event(user_id, event_id)).await?;
        tracing::debug!(
            %user_id,
            %event_id,
            outcome = outcome_label(&outcome),
            "admission resolved"
        );
        Ok(outcome)
    }

    /// Attempt to join a club. No capacity bound, so no lock and no retry:
    /// the uniqueness constraint alone decides duplicates.
    pub async fn join_club(&self, user_id: Uuid, club_id: Uuid) -> Result<JoinOutcome> {
        self.storage.join_club(user_id, club_id).await
    }
}

/// Run one admission operation up to the attempt budget.
///
/// A transient error restarts the operation after a backoff; a budget spent
/// entirely on transient errors resolves to `TransientFailure`. Any other
/// error aborts on the spot.
async fn drive_attempts<F, Fut>(mut attempt_op: F) -> Result<AdmissionOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<AdmissionOutcome>>,
{
    for attempt in 1..=ADMISSION_MAX_ATTEMPTS {
        match attempt_op().await {
            Ok(outcome) => return Ok(outcome),
            Err(e) if e.is_transient() => {
                tracing::warn!(
                    attempt,
                    "transient storage contention during admission: {}",
                    e
                );
                if attempt < ADMISSION_MAX_ATTEMPTS {
                    tokio::time::sleep(backoff(attempt)).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok(AdmissionOutcome::TransientFailure)
}

fn backoff(attempt: u32) -> Duration {
    ADMISSION_RETRY_BACKOFF * attempt
}

fn outcome_label(outcome: &AdmissionOutcome) -> &'static str {
    match outcome {
        AdmissionOutcome::Admitted { .. } => "admitted",
        AdmissionOutcome::NotFound => "not_found",
        AdmissionOutcome::EventFull => "event_full",
        AdmissionOutcome::AlreadyRegistered => "already_registered",
        AdmissionOutcome::TransientFailure => "transient_failure",
    }
}
