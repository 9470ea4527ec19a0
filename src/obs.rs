//! Optional observability helpers for dispatched calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `dredge_client.call` with the `op`
//!   (operation label) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `dredge_client_call_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each dispatched call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to the dispatch path.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Warns about a tolerated failure the crate degraded around (when tracing is
/// enabled). Degraded paths continue unauthenticated instead of failing the
/// call.
pub(crate) fn warn_degraded(stage: &'static str, message: String) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(stage, message, "Continuing without a credential.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, message);
	}
}
