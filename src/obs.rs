//! Observability helpers for the handshake and resource calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `nps_api.op` with the `op` (operation label)
//!   and `stage` (call site) fields, plus `warn` events for degraded or failed handshakes.
//! - Enable `metrics` to increment the `nps_api_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and `nps_api_clock_degraded_total`
//!   whenever the local clock replaces the service time.
//!
//! [`HandshakeObserver`] hooks are always available and independent of both features.

mod metrics;
mod observer;
mod tracing;

pub use metrics::*;
pub use observer::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation label recorded for the handshake itself.
pub const HANDSHAKE_OP: &str = "handshake";

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the final outcome of `op` on its span and in the metrics counter.
pub(crate) fn finish<T, E>(span: &OpSpan, op: &'static str, result: &Result<T, E>) {
	let outcome = if result.is_ok() { OpOutcome::Success } else { OpOutcome::Failure };

	span.record_outcome(outcome);
	record_op_outcome(op, outcome);
}
