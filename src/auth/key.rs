//! Static-key decryption of service-issued auth keys.
//!
//! The service encrypts each per-handshake secret with AES-128-CBC + PKCS#7, keyed by a
//! constant shared with this client. The same 16-byte buffer doubles as the IV. Reusing
//! the key as the IV is a wire-compatibility constraint of the existing service and must
//! not be used as a template for new protocols.

// crates.io
use aes::{
	Aes128,
	cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7},
};
// self
use crate::{
	_prelude::*,
	auth::SharedSecret,
	error::{AuthError, ConfigError},
};

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES block and key length in bytes.
pub const KEY_LEN: usize = 16;

/// Static key compiled into the client unless the configuration overrides it.
pub const DEFAULT_STATIC_KEY: &str = "H6RQdb25UxCrUbKF";

/// Symmetric key shared with the service's key-issuance logic.
///
/// Holds the UTF-8 bytes of the configured key string right-padded with zero bytes to
/// exactly [`KEY_LEN`] bytes. The buffer is used both as the AES key and as the CBC IV.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticKey([u8; KEY_LEN]);
impl StaticKey {
	/// Builds a key from its string form, zero-padding it to 16 bytes.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ConfigError> {
		let raw = value.as_ref().as_bytes();

		if raw.len() > KEY_LEN {
			return Err(ConfigError::StaticKeyTooLong { len: raw.len() });
		}

		let mut buf = [0_u8; KEY_LEN];

		buf[..raw.len()].copy_from_slice(raw);

		Ok(Self(buf))
	}

	/// Returns the padded 16-byte buffer.
	pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
		&self.0
	}

	/// Decrypts a service-issued token into the shared secret it carries.
	///
	/// Fails with an [`AuthError`] on malformed hex, a ciphertext that is not a positive
	/// multiple of the block size, bad padding, invalid UTF-8, or an empty plaintext.
	pub fn decrypt_token(&self, token: &EncryptedToken) -> Result<SharedSecret, AuthError> {
		let ciphertext = hex::decode(token.as_str())?;

		if ciphertext.is_empty() || ciphertext.len() % KEY_LEN != 0 {
			return Err(AuthError::CiphertextLength { len: ciphertext.len() });
		}

		let plaintext = Aes128CbcDec::new(&self.0.into(), &self.0.into())
			.decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
			.map_err(|_| AuthError::Decrypt)?;
		let secret = String::from_utf8(plaintext)?;

		if secret.is_empty() {
			return Err(AuthError::EmptySecret);
		}

		Ok(SharedSecret::new(secret))
	}
}
impl Default for StaticKey {
	fn default() -> Self {
		let mut buf = [0_u8; KEY_LEN];

		buf.copy_from_slice(DEFAULT_STATIC_KEY.as_bytes());

		Self(buf)
	}
}
impl Debug for StaticKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("StaticKey").field(&"<redacted>").finish()
	}
}
impl FromStr for StaticKey {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Hex-encoded ciphertext issued by the token endpoint for a single handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedToken(String);
impl EncryptedToken {
	/// Wraps the hex string returned in `crypt_auth_key`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the hex string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for EncryptedToken {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
