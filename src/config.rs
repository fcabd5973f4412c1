//! Explicit client configuration passed into [`Handshake`](crate::handshake::Handshake) and
//! [`NpsClient`](crate::client::NpsClient).

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::StaticKey, error::ConfigError};

/// Management-console root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://uassist.cn/nps";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Connection settings for a single service deployment.
///
/// Deserializes from `{ "base_url": ..., "static_key": ..., "timeout_secs": ... }`; every
/// field is optional and validated the same way as the builder methods.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
	/// Console root that endpoint paths are appended to.
	pub base_url: Url,
	/// Key used to decrypt issued auth keys.
	pub static_key: StaticKey,
	/// Upper bound applied to every HTTP round-trip.
	pub timeout: StdDuration,
}
impl ClientConfig {
	/// Creates a configuration pointing at `base_url` with the default key and timeout.
	pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
		Ok(Self { base_url: parse_base_url(base_url.as_ref())?, ..Default::default() })
	}

	/// Replaces the base URL.
	pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
		self.base_url = parse_base_url(base_url.as_ref())?;

		Ok(self)
	}

	/// Replaces the static key.
	pub fn with_static_key(mut self, key: StaticKey) -> Self {
		self.static_key = key;

		self
	}

	/// Replaces the per-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Resolves an endpoint path (e.g. `/auth/gettime`) against the base URL.
	///
	/// The path is appended to the base URL string so a base path such as `/nps` is kept.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let raw = format!(
			"{}/{}",
			self.base_url.as_str().trim_end_matches('/'),
			path.trim_start_matches('/')
		);

		Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source })
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: Url::parse(DEFAULT_BASE_URL).expect("Default base URL must parse."),
			static_key: StaticKey::default(),
			timeout: DEFAULT_TIMEOUT,
		}
	}
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		let mut config = Self::default();

		if let Some(base_url) = raw.base_url {
			config = config.with_base_url(base_url)?;
		}
		if let Some(key) = raw.static_key {
			config = config.with_static_key(StaticKey::new(key)?);
		}
		if let Some(secs) = raw.timeout_secs {
			config = config.with_timeout(StdDuration::from_secs(secs));
		}

		Ok(config)
	}
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
	base_url: Option<String>,
	static_key: Option<String>,
	timeout_secs: Option<u64>,
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw)
		.map_err(|source| ConfigError::InvalidBaseUrl { url: raw.to_owned(), source })?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme => Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_keep_the_base_path() {
		let config = ClientConfig::default();

		assert_eq!(
			config.endpoint("/auth/gettime").expect("Default endpoint should resolve.").as_str(),
			"http://uassist.cn/nps/auth/gettime"
		);

		let config =
			ClientConfig::new("https://console.example.com/nps/").expect("URL should parse.");

		assert_eq!(
			config.endpoint("/client/list/").expect("Endpoint should resolve.").as_str(),
			"https://console.example.com/nps/client/list/"
		);
	}

	#[test]
	fn rejects_unsupported_base_urls() {
		assert!(matches!(
			ClientConfig::new("not a url"),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			ClientConfig::new("ftp://example.com/nps"),
			Err(ConfigError::UnsupportedScheme { .. })
		));
	}

	#[test]
	fn deserializes_with_defaults() {
		let config: ClientConfig = serde_json::from_str(
			"{\"base_url\":\"https://console.example.com\",\"timeout_secs\":5}",
		)
		.expect("Partial config should deserialize.");

		assert_eq!(config.base_url.as_str(), "https://console.example.com/");
		assert_eq!(config.timeout, StdDuration::from_secs(5));
		assert_eq!(config.static_key, StaticKey::default());

		let config: ClientConfig =
			serde_json::from_str("{}").expect("Empty config should deserialize.");

		assert_eq!(config, ClientConfig::default());
		assert!(
			serde_json::from_str::<ClientConfig>("{\"static_key\":\"0123456789abcdefXYZ\"}")
				.is_err()
		);
	}
}
