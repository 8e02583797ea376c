//! Optional observability helpers for API calls.
//!
//! # Feature Flags
//!
//! - `tracing` (default) wraps each call in a `webmetrics.call` span carrying the remote
//!   method, and emits events for dispatch, signing, the request URL (with `sig` redacted),
//!   response statuses, redirects, and failures.
//! - `metrics` increments the `webmetrics_call_total` counter for every
//!   attempt/success/failure, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to [`Client::invoke`](crate::client::Client::invoke).
	Attempt,
	/// A payload was returned.
	Success,
	/// An error was returned.
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
