//! Caller identity, redacted secrets, and per-request signatures.

pub mod identity;
pub mod secret;
pub mod signature;

pub use identity::*;
pub use secret::*;
pub use signature::*;
