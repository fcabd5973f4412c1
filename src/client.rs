//! Service client that pairs every resource call with a fresh handshake.
//!
//! [`NpsClient::execute`] is the single authenticated-POST primitive: it runs a full
//! [`Handshake`], adds the resulting `auth_key` + `timestamp` to the operation's form, sends
//! exactly one POST, and hands back the JSON body. When the handshake fails the resource
//! POST is never sent. Credentials are not cached or shared between calls.

// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	auth::{Clock, RequestCredential},
	config::ClientConfig,
	handshake::{self, Handshake},
	http::{Form, FormHttpClient},
	obs::{self, HandshakeObserver, OpOutcome, OpSpan},
	resource::{FormFields, Operation},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestNpsClient = NpsClient<ReqwestHttpClient>;

/// Authenticated client for the client, host, and tunnel endpoints.
pub struct NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Handshake shared by every operation.
	pub handshake: Handshake<C>,
	cancel: CancellationToken,
}
impl<C> NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { handshake: Handshake::new(http_client, config), cancel: CancellationToken::new() }
	}

	/// Replaces the clock consulted when the service time is unavailable.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.handshake = self.handshake.with_clock(clock);

		self
	}

	/// Installs an observer for handshake events.
	pub fn with_observer(mut self, observer: Arc<dyn HandshakeObserver>) -> Self {
		self.handshake = self.handshake.with_observer(observer);

		self
	}

	/// Ties every operation to `token`; cancelling it aborts in-flight and future calls.
	pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
		self.cancel = token;

		self
	}

	/// Returns the token that cancels this client's operations.
	pub fn cancellation_token(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.handshake.config
	}

	/// Runs a standalone handshake, e.g. to inspect the credential the service would accept.
	pub async fn handshake(&self) -> Result<RequestCredential> {
		self.handshake.run(&self.cancel).await
	}

	/// Serializes `params` and sends them to `op`; see [`NpsClient::execute`].
	pub async fn call<P>(&self, op: Operation, params: &P) -> Result<Value>
	where
		P: ?Sized + FormFields,
	{
		self.execute(op, params.to_form(), &self.cancel).await
	}

	/// Authenticates and POSTs `form` to `op`, returning the JSON body on HTTP 200.
	///
	/// Non-200 replies and bodies that are not JSON become
	/// [`ProtocolError`](crate::error::ProtocolError)s carrying the status and raw body. The
	/// call is also cancelled when either `cancel` or the client's own token fires.
	pub async fn execute(
		&self,
		op: Operation,
		mut form: Form,
		cancel: &CancellationToken,
	) -> Result<Value> {
		let label = op.as_str();
		let span = OpSpan::new(label, "execute");

		obs::record_op_outcome(label, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let work = async move {
					let credential = self.handshake.run(cancel).await?;

					credential.apply(&mut form);

					let reply = self.handshake.post(op.path(), form, cancel).await?;

					Ok::<_, Error>(handshake::parse_json::<Value>(&reply)?)
				};

				self.cancel.run_until_cancelled(work).await.unwrap_or(Err(Error::Cancelled))
			})
			.await;

		obs::finish(&span, label, &result);

		result
	}
}
#[cfg(feature = "reqwest")]
impl NpsClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.timeout)?;

		Ok(Self::with_http_client(config, http_client))
	}
}
impl<C> Clone for NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	fn clone(&self) -> Self {
		Self { handshake: self.handshake.clone(), cancel: self.cancel.clone() }
	}
}
impl<C> Debug for NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NpsClient")
			.field("config", self.config())
			.field("cancelled", &self.cancel.is_cancelled())
			.finish()
	}
}
