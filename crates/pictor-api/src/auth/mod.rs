//! API key authentication: credential verification, request middleware,
//! and the owner context handlers extract.

pub mod middleware;
pub mod models;
pub mod verifier;

pub use middleware::{auth_middleware, AuthState};
pub use models::OwnerContext;
pub use verifier::{IdentityVerifier, StaticKeyVerifier};
