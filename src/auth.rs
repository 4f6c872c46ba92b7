//! Auth-domain primitives: the redacted client secret and the HMAC token signer.

pub mod secret;
pub mod signer;

pub use secret::*;
pub use signer::*;
