// Gather domain types
//
// DB-agnostic types shared by the storage and API layers:
// - Entities: User, Club, Event, Registration, Membership, ContactMessage
// - Admission outcomes: AdmissionOutcome, JoinOutcome (typed results, not errors)
// - Error taxonomy: GatherError with a transient/fatal split
//
// Key design decisions:
// - All durable state lives in the store; these types carry no behavior beyond
//   small predicates (role gates, price checks)
// - Status-like fields are enums with Display/From<&str> for storage mapping
// - OpenAPI schemas are feature-gated behind "openapi"

pub mod club;
pub mod contact;
pub mod error;
pub mod event;
pub mod membership;
pub mod outcome;
pub mod registration;
pub mod user;

// Re-exports for convenience
pub use club::Club;
pub use contact::ContactMessage;
pub use error::{GatherError, Result};
pub use event::Event;
pub use membership::Membership;
pub use outcome::{AdmissionOutcome, JoinOutcome};
pub use registration::{PaymentStatus, Registration};
pub use user::{User, UserRole};
