//! Authentication handshake producing a single-use [`RequestCredential`].
//!
//! A handshake runs four steps strictly in order:
//!
//! 1. POST `/auth/getauthkey` and read the hex `crypt_auth_key` (requires `status == 1`).
//! 2. Decrypt it with the static key (AES-128-CBC, key reused as IV, PKCS#7).
//! 3. POST `/auth/gettime` for the service timestamp, falling back to the local clock.
//! 4. Hash the secret followed by the decimal timestamp into the `auth_key`.
//!
//! Steps 1 and 2 fail the handshake. Step 3 never does: a failure there is reported as a
//! [`HandshakeEvent::ClockDegraded`] and the local clock is used instead. Nothing is retried
//! or cached; every call produces a fresh credential.

// crates.io
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	auth::{Clock, EncryptedToken, RequestCredential, ServiceTime, SharedSecret, SystemClock},
	config::ClientConfig,
	error::{AuthError, ProtocolError, TransportError},
	http::{Form, FormHttpClient, FormRequest, HttpReply},
	obs::{
		self, HANDSHAKE_OP, HandshakeEvent, HandshakeObserver, NoopObserver, OpOutcome, OpSpan,
	},
};

/// Path of the unauthenticated service-time endpoint.
pub const GET_TIME_PATH: &str = "/auth/gettime";
/// Path of the unauthenticated auth-key endpoint.
pub const GET_AUTH_KEY_PATH: &str = "/auth/getauthkey";

/// Value of the token endpoint's `status` field that signals success.
const TOKEN_STATUS_OK: i64 = 1;

/// Runs authentication handshakes against one service deployment.
///
/// The handshake holds no mutable state, so one instance can serve concurrent callers as
/// long as the transport is reentrant.
pub struct Handshake<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Transport used for both unauthenticated endpoints.
	pub http_client: Arc<C>,
	/// Base URL, static key, and timeout.
	pub config: Arc<ClientConfig>,
	/// Fallback clock for degraded mode.
	pub clock: Arc<dyn Clock>,
	/// Hook notified about degraded or failed handshakes.
	pub observer: Arc<dyn HandshakeObserver>,
}
impl<C> Handshake<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Creates a handshake backed by the system clock and no observer.
	pub fn new(http_client: impl Into<Arc<C>>, config: impl Into<Arc<ClientConfig>>) -> Self {
		Self {
			http_client: http_client.into(),
			config: config.into(),
			clock: Arc::new(SystemClock),
			observer: Arc::new(NoopObserver),
		}
	}

	/// Replaces the fallback clock.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Replaces the event observer.
	pub fn with_observer(mut self, observer: Arc<dyn HandshakeObserver>) -> Self {
		self.observer = observer;

		self
	}

	/// Runs the full handshake and returns a credential valid for one call.
	pub async fn run(&self, cancel: &CancellationToken) -> Result<RequestCredential> {
		let span = OpSpan::new(HANDSHAKE_OP, "run");

		obs::record_op_outcome(HANDSHAKE_OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.fetch_encrypted_token(cancel).await.inspect_err(|e| {
					if !matches!(e, Error::Cancelled) {
						obs::emit(
							self.observer.as_ref(),
							HandshakeEvent::TokenUnavailable { error: e.to_string() },
						);
					}
				})?;
				let secret = self.decrypt_token(&token).inspect_err(|e| {
					obs::emit(
						self.observer.as_ref(),
						HandshakeEvent::KeyMismatch { error: e.to_string() },
					);
				})?;
				let time = self.fetch_server_time(cancel).await?;

				Ok::<_, Error>(Self::derive_credential(&secret, time))
			})
			.await;

		obs::finish(&span, HANDSHAKE_OP, &result);

		result
	}

	/// Fetches the service timestamp, falling back to the local clock on any failure.
	///
	/// Only cancellation is returned as an error.
	pub async fn fetch_server_time(&self, cancel: &CancellationToken) -> Result<ServiceTime> {
		let reason = match self.post(GET_TIME_PATH, Form::new(), cancel).await {
			Ok(reply) => match parse_json::<TimeResponse>(&reply) {
				Ok(body) => match body.time.as_ref().and_then(Timestamp::as_unix) {
					Some(unix) => return Ok(ServiceTime::from_service(unix)),
					None => "response has no usable `time` field".to_owned(),
				},
				Err(e) => e.to_string(),
			},
			Err(Error::Cancelled) => return Err(Error::Cancelled),
			Err(e) => e.to_string(),
		};
		let time = ServiceTime::from_clock(self.clock.as_ref());

		obs::emit(self.observer.as_ref(), HandshakeEvent::ClockDegraded { reason });

		Ok(time)
	}

	/// Requests a freshly encrypted auth key from the service.
	pub async fn fetch_encrypted_token(
		&self,
		cancel: &CancellationToken,
	) -> Result<EncryptedToken> {
		let reply = self.post(GET_AUTH_KEY_PATH, Form::new(), cancel).await?;
		let body = parse_json::<TokenResponse>(&reply)?;

		if !body.status.as_ref().is_some_and(token_status_ok) {
			let status = body.status.as_ref().and_then(serde_json::Value::as_i64);

			return Err(AuthError::TokenRejected { status }.into());
		}

		match body.crypt_auth_key {
			Some(key) if !key.is_empty() => Ok(EncryptedToken::new(key)),
			_ => Err(AuthError::MissingToken.into()),
		}
	}

	/// Decrypts an issued auth key with the configured static key.
	pub fn decrypt_token(&self, token: &EncryptedToken) -> Result<SharedSecret, AuthError> {
		self.config.static_key.decrypt_token(token)
	}

	/// Derives the request credential for `secret` at `time`.
	pub fn derive_credential(secret: &SharedSecret, time: ServiceTime) -> RequestCredential {
		RequestCredential::derive(secret, time)
	}

	/// POSTs `form` to `path`, bounded by the configured timeout and `cancel`.
	pub(crate) async fn post(
		&self,
		path: &str,
		form: Form,
		cancel: &CancellationToken,
	) -> Result<HttpReply> {
		let timeout = self.config.timeout;
		let request = FormRequest { url: self.config.endpoint(path)?, form, timeout };
		let exchange = tokio::time::timeout(timeout, self.http_client.post_form(request));

		match cancel.run_until_cancelled(exchange).await {
			Some(Ok(reply)) => Ok(reply?),
			// Transports that ignore `FormRequest::timeout` still end here.
			Some(Err(elapsed)) => Err(TransportError::timeout(elapsed).into()),
			None => Err(Error::Cancelled),
		}
	}
}
impl<C> Clone for Handshake<C>
where
	C: ?Sized + FormHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			clock: self.clock.clone(),
			observer: self.observer.clone(),
		}
	}
}
impl<C> Debug for Handshake<C>
where
	C: ?Sized + FormHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Handshake").field("config", &self.config).finish()
	}
}

#[derive(Deserialize)]
struct TimeResponse {
	time: Option<Timestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
	Int(i64),
	Text(String),
}
impl Timestamp {
	fn as_unix(&self) -> Option<i64> {
		match self {
			Timestamp::Int(value) => Some(*value),
			Timestamp::Text(value) => value.trim().parse().ok(),
		}
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	status: Option<serde_json::Value>,
	crypt_auth_key: Option<String>,
}

/// Classifies a reply: non-200 statuses and unparsable bodies become [`ProtocolError`]s.
pub(crate) fn parse_json<T>(reply: &HttpReply) -> Result<T, ProtocolError>
where
	T: DeserializeOwned,
{
	if !reply.is_ok() {
		return Err(ProtocolError::UnexpectedStatus {
			status: reply.status,
			body: reply.body.clone(),
		});
	}

	let mut deserializer = serde_json::Deserializer::from_str(&reply.body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		ProtocolError::MalformedBody { status: reply.status, body: reply.body.clone(), source }
	})
}

/// The service reports success as `1`, though some builds emit `1.0` or `true`.
fn token_status_ok(status: &serde_json::Value) -> bool {
	match status {
		serde_json::Value::Bool(ok) => *ok,
		serde_json::Value::Number(n) =>
			n.as_i64() == Some(TOKEN_STATUS_OK) || n.as_f64() == Some(TOKEN_STATUS_OK as f64),
		_ => false,
	}
}
