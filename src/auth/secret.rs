//! Redacted wrapper for the per-handshake shared secret.

// self
use crate::_prelude::*;

/// Decrypted auth key valid only for the handshake that produced it.
///
/// The value is never cached or persisted, and its formatters redact the plaintext so it
/// cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);
impl SharedSecret {
	/// Wraps a decrypted secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for SharedSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SharedSecret").field(&"<redacted>").finish()
	}
}
impl Display for SharedSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SharedSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "SharedSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}
}
