//! Request credential derivation.

// crates.io
use md5::{Digest, Md5};
// self
use crate::{
	_prelude::*,
	auth::{ServiceTime, SharedSecret},
};

/// Single-use credential attached to one authenticated call.
///
/// `auth_key` is the lowercase hex MD5 of the shared secret followed by the decimal
/// timestamp, with no separator. The service recomputes the same digest, so the input
/// order is part of the wire contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestCredential {
	/// 32 lowercase hex characters sent as the `auth_key` form field.
	pub auth_key: String,
	/// Timestamp the key was derived from, sent as the `timestamp` form field.
	pub timestamp: ServiceTime,
}
impl RequestCredential {
	/// Derives the credential for `secret` at `timestamp`.
	pub fn derive(secret: &SharedSecret, timestamp: ServiceTime) -> Self {
		let mut hasher = Md5::new();

		hasher.update(secret.expose().as_bytes());
		hasher.update(timestamp.unix.to_string().as_bytes());

		Self { auth_key: hex::encode(hasher.finalize()), timestamp }
	}

	/// Writes the `auth_key` and `timestamp` fields into a request form.
	pub fn apply(&self, form: &mut BTreeMap<String, String>) {
		form.insert("auth_key".into(), self.auth_key.clone());
		form.insert("timestamp".into(), self.timestamp.unix.to_string());
	}
}
