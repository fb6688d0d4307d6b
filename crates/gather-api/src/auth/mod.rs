// Authentication
//
// JWT-backed identity: /v1/auth routes issue tokens, the extractors in
// middleware turn a token back into the current user for handlers.

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use middleware::{AuthState, AuthUser, OptionalAuthUser};
