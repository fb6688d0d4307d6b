// Services layer for business logic
// Services own business logic and validation, calling storage directly

pub mod admission;
pub mod clubs;
pub mod events;

pub use admission::AdmissionService;
pub use clubs::ClubService;
pub use events::EventService;
