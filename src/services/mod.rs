//! Business logic services.

pub mod identity;
pub mod stats;

pub use identity::IdentityClient;
