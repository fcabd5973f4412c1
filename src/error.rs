//! Client-level error types shared across the handshake, transport, and resource calls.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Service answered with an unexpected status or body.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Service refused to issue a token, or the issued token could not be decrypted.
	#[error(transparent)]
	Auth(#[from] AuthError),

	/// The operation was cancelled through the client's cancellation token.
	#[error("Operation was cancelled.")]
	Cancelled,
}
impl Error {
	/// Returns `true` when retrying the whole operation may succeed.
	///
	/// Only transport failures qualify. Auth failures point at a key or credential mismatch and
	/// protocol failures at a service-side contract change; retrying either repeats the failure.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL or an endpoint derived from it cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than `http` or `https`.
	#[error("Base URL scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Static key does not fit into a single AES-128 block.
	#[error("Static key is {len} bytes long; at most 16 bytes are supported.")]
	StaticKeyTooLong {
		/// Byte length of the rejected key.
		len: usize,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request to the service timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Unexpected responses from a reachable service.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Service answered with a non-200 status.
	#[error("Service returned HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},
	/// Service answered 200 but the body is not the expected JSON shape.
	#[error("Service returned a malformed body with HTTP {status}.")]
	MalformedBody {
		/// HTTP status code.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Failures that imply a credential or key mismatch rather than a connectivity problem.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a `status` other than the success marker.
	#[error("Service refused to issue an auth key (status {status:?}).")]
	TokenRejected {
		/// Value of the `status` field, when present.
		status: Option<i64>,
	},
	/// Token endpoint reported success but issued no token.
	#[error("Service reported success but returned no auth key.")]
	MissingToken,
	/// Issued token is not valid hexadecimal.
	#[error("Encrypted auth key is not valid hex.")]
	InvalidHex(#[from] hex::FromHexError),
	/// Ciphertext is empty or not a whole number of AES blocks.
	#[error("Encrypted auth key is {len} bytes long, which is not a positive multiple of 16.")]
	CiphertextLength {
		/// Decoded ciphertext length in bytes.
		len: usize,
	},
	/// Decryption produced invalid PKCS#7 padding.
	#[error("Encrypted auth key failed padding validation; the static key is likely stale.")]
	Decrypt,
	/// Decrypted secret is not UTF-8.
	#[error("Decrypted auth key is not valid UTF-8.")]
	InvalidUtf8(#[from] std::string::FromUtf8Error),
	/// Decrypted secret is empty.
	#[error("Decrypted auth key is empty.")]
	EmptySecret,
}
impl AuthError {
	/// Returns `true` when the service issued a token this client could not decrypt.
	///
	/// Such failures indicate a protocol mismatch (usually a stale static key) instead of the
	/// service declining to issue a token.
	pub fn is_key_mismatch(&self) -> bool {
		matches!(
			self,
			Self::InvalidHex(_)
				| Self::CiphertextLength { .. }
				| Self::Decrypt | Self::InvalidUtf8(_)
				| Self::EmptySecret
		)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_transport_errors_are_retryable() {
		let transport: Error =
			TransportError::Io(std::io::Error::other("connection reset")).into();
		let auth: Error = AuthError::Decrypt.into();
		let protocol: Error =
			ProtocolError::UnexpectedStatus { status: 502, body: "bad gateway".into() }.into();

		assert!(transport.is_retryable());
		assert!(!auth.is_retryable());
		assert!(!protocol.is_retryable());
		assert!(!Error::Cancelled.is_retryable());
	}

	#[test]
	fn key_mismatch_excludes_service_refusals() {
		assert!(AuthError::Decrypt.is_key_mismatch());
		assert!(AuthError::CiphertextLength { len: 5 }.is_key_mismatch());
		assert!(AuthError::EmptySecret.is_key_mismatch());
		assert!(!AuthError::TokenRejected { status: Some(0) }.is_key_mismatch());
		assert!(!AuthError::MissingToken.is_key_mismatch());
	}
}
