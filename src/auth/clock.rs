//! Service time snapshots and the local clock used as their fallback.

// self
use crate::_prelude::*;

/// Where a [`ServiceTime`] value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeSource {
	/// Reported by the service's get-time endpoint.
	Service,
	/// Read from the local clock because the service time was unavailable.
	///
	/// Credentials built from this value are rejected if local and service clocks drift apart.
	LocalClock,
}
impl TimeSource {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TimeSource::Service => "service",
			TimeSource::LocalClock => "local_clock",
		}
	}
}
impl Display for TimeSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Unix timestamp used as the freshness input of a request credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ServiceTime {
	/// Seconds since the Unix epoch.
	pub unix: i64,
	/// Origin of the value.
	pub source: TimeSource,
}
impl ServiceTime {
	/// Wraps a timestamp reported by the service.
	pub const fn from_service(unix: i64) -> Self {
		Self { unix, source: TimeSource::Service }
	}

	/// Reads the fallback timestamp from a local clock.
	pub fn from_clock(clock: &dyn Clock) -> Self {
		Self { unix: clock.now().unix_timestamp(), source: TimeSource::LocalClock }
	}

	/// Returns `true` when the value came from the local clock.
	pub fn is_degraded(&self) -> bool {
		matches!(self.source, TimeSource::LocalClock)
	}
}
impl Display for ServiceTime {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.unix)
	}
}

/// Wall clock consulted when the service time is unavailable.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;
}

/// [`Clock`] backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// [`Clock`] pinned to a single instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub OffsetDateTime);
impl FixedClock {
	/// Pins the clock to a Unix timestamp, falling back to the epoch when out of range.
	pub fn from_unix(unix: i64) -> Self {
		Self(OffsetDateTime::from_unix_timestamp(unix).unwrap_or(OffsetDateTime::UNIX_EPOCH))
	}
}
impl Clock for FixedClock {
	fn now(&self) -> OffsetDateTime {
		self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clock_fallback_is_marked_degraded() {
		let time = ServiceTime::from_clock(&FixedClock::from_unix(1_700_000_000));

		assert_eq!(time.unix, 1_700_000_000);
		assert!(time.is_degraded());
		assert!(!ServiceTime::from_service(42).is_degraded());
		assert_eq!(time.to_string(), "1700000000");
	}

	#[test]
	fn system_clock_is_past_the_epoch() {
		assert!(SystemClock.now().unix_timestamp() > 0);
	}
}
