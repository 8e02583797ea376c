//! Account API key.
//!
//! The key only ever feeds the signer: it is hashed together with the username and timestamp,
//! and never appears in the query string, headers, or log events.

// self
use crate::_prelude::*;

/// Webmetrics API key; formats as `<redacted>`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps the key issued for a Webmetrics account.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw key bytes for signing.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when no key was supplied.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ApiKey(<redacted>)")
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
