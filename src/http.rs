//! Transport primitives for form-encoded service calls.
//!
//! The module exposes [`FormHttpClient`] alongside [`FormRequest`] and [`HttpReply`] so
//! downstream crates can plug in their own HTTP stack. Every call the client makes is an
//! HTTP POST with an `application/x-www-form-urlencoded` body. Each request carries the
//! configured timeout for the transport to apply, and the client enforces the same bound
//! around every exchange so a transport that ignores it still cannot stall a call.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::TransportError};

/// Form fields sent in a request body.
pub type Form = BTreeMap<String, String>;

/// Boxed future returned by [`FormHttpClient::post_form`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpReply, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to POST form bodies.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by
/// the handshake and every resource call, and concurrent operations can reuse it without
/// locks. Non-200 statuses are not errors at this layer; they are returned as an
/// [`HttpReply`] so callers can classify them.
pub trait FormHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the status plus raw body text.
	fn post_form<'a>(&'a self, request: FormRequest) -> TransportFuture<'a>;
}

/// One form-encoded POST.
#[derive(Clone, Debug)]
pub struct FormRequest {
	/// Absolute endpoint URL.
	pub url: Url,
	/// Body fields. Empty for the unauthenticated handshake endpoints.
	pub form: Form,
	/// Upper bound for the whole round-trip.
	pub timeout: StdDuration,
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl HttpReply {
	/// Returns `true` for HTTP 200, the only status the service uses for success.
	pub fn is_ok(&self) -> bool {
		self.status == 200
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose connect phase is bounded by `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, crate::error::ConfigError> {
		Ok(Self(ReqwestClient::builder().connect_timeout(timeout).build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl FormHttpClient for ReqwestHttpClient {
	fn post_form<'a>(&'a self, request: FormRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			let FormRequest { url, form, timeout } = request;
			let response = self.0.post(url).form(&form).timeout(timeout).send().await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok::<_, TransportError>(HttpReply { status, body })
		})
	}
}
