// Storage layer for the Gather platform
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// The admission decision lives in this crate because it has to run inside the
// store's transactional boundary: the capacity check and the insert must be
// atomic as a pair, and only the storage engine can guarantee that. Both
// backends expose the same operations through the StorageBackend enum and
// implement identical admission semantics.

pub mod backend;
pub mod memory;
pub mod models;
pub mod password;
pub mod repositories;

#[cfg(test)]
mod admission_tests;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;
