//! Handshake primitives: static key, shared secret, service time, and request credentials.

pub mod clock;
pub mod credential;
pub mod key;
pub mod secret;

pub use clock::*;
pub use credential::*;
pub use key::*;
pub use secret::*;
