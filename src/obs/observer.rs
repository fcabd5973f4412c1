// self
use crate::{_prelude::*, obs};

/// Notable handshake events that do not necessarily fail the enclosing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandshakeEvent {
	/// Service time was unavailable and the local clock was used instead.
	ClockDegraded {
		/// Why the service time could not be used.
		reason: String,
	},
	/// Token endpoint was unreachable, answered unexpectedly, or refused to issue a token.
	TokenUnavailable {
		/// Rendered error.
		error: String,
	},
	/// Service issued a token that could not be decrypted with the configured static key.
	KeyMismatch {
		/// Rendered error.
		error: String,
	},
}
impl HandshakeEvent {
	/// Returns a stable label suitable for log or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			HandshakeEvent::ClockDegraded { .. } => "clock_degraded",
			HandshakeEvent::TokenUnavailable { .. } => "token_unavailable",
			HandshakeEvent::KeyMismatch { .. } => "key_mismatch",
		}
	}
}

/// Injectable hook receiving [`HandshakeEvent`]s.
pub trait HandshakeObserver
where
	Self: Send + Sync,
{
	/// Called once per event, on the task running the handshake.
	fn observe(&self, event: &HandshakeEvent);
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;
impl HandshakeObserver for NoopObserver {
	fn observe(&self, _event: &HandshakeEvent) {}
}

/// Observer that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Arc<Mutex<Vec<HandshakeEvent>>>);
impl EventLog {
	/// Returns a copy of the recorded events.
	pub fn events(&self) -> Vec<HandshakeEvent> {
		self.0.lock().clone()
	}

	/// Counts recorded events carrying `label` (see [`HandshakeEvent::as_str`]).
	pub fn count(&self, label: &str) -> usize {
		self.0.lock().iter().filter(|event| event.as_str() == label).count()
	}
}
impl HandshakeObserver for EventLog {
	fn observe(&self, event: &HandshakeEvent) {
		self.0.lock().push(event.clone());
	}
}

/// Fans an event out to logs, metrics, and the injected observer.
pub(crate) fn emit(observer: &dyn HandshakeObserver, event: HandshakeEvent) {
	#[cfg(feature = "tracing")]
	{
		let label = event.as_str();

		match &event {
			HandshakeEvent::ClockDegraded { reason } => {
				tracing::warn!(event = label, %reason, "Using local clock for credential.");
			},
			HandshakeEvent::TokenUnavailable { error } | HandshakeEvent::KeyMismatch { error } => {
				tracing::warn!(event = label, %error, "Handshake failed.");
			},
		}
	}

	if matches!(event, HandshakeEvent::ClockDegraded { .. }) {
		obs::record_clock_degraded();
	}

	observer.observe(&event);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn event_log_records_emitted_events() {
		let log = EventLog::default();

		emit(&log, HandshakeEvent::ClockDegraded { reason: "HTTP 502".into() });
		emit(&log, HandshakeEvent::KeyMismatch { error: "bad padding".into() });
		emit(&NoopObserver, HandshakeEvent::TokenUnavailable { error: "refused".into() });

		assert_eq!(log.count("clock_degraded"), 1);
		assert_eq!(log.count("key_mismatch"), 1);
		assert_eq!(log.count("token_unavailable"), 0);
		assert_eq!(log.events()[0], HandshakeEvent::ClockDegraded { reason: "HTTP 502".into() });
	}
}
