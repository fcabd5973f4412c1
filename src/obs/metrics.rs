// self
use crate::obs::OpOutcome;

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(op: &'static str, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("nps_api_op_total", "op" => op, "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

/// Records that a credential was derived from the local clock (when enabled).
pub fn record_clock_degraded() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("nps_api_clock_degraded_total").increment(1);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_op_outcome("client_list", OpOutcome::Failure);
		record_clock_degraded();
	}
}
