//! Credentials, redacted secrets, and bootstrap request signing.

pub mod credentials;
pub mod secret;
pub mod signer;

pub use credentials::*;
pub use secret::*;
pub use signer::*;
