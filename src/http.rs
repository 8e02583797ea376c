//! Transport primitives for Webmetrics API calls.
//!
//! [`HttpVerb`] is the crate-owned verb type carried by method descriptors, and
//! [`ReqwestHttpClient`] wraps the pooled reqwest client every call goes through.

// std
use std::ops::Deref;
// crates.io
use reqwest::{Method, redirect::Policy};
// self
use crate::{_prelude::*, error::ConfigError};

/// HTTP verb declared by a method descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
	#[default]
	/// `GET`, used by every built-in method.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `DELETE`.
	Delete,
}
impl HttpVerb {
	/// Returns the uppercase request-line token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpVerb::Get => "GET",
			HttpVerb::Post => "POST",
			HttpVerb::Put => "PUT",
			HttpVerb::Delete => "DELETE",
		}
	}
}
impl Display for HttpVerb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<HttpVerb> for Method {
	fn from(verb: HttpVerb) -> Self {
		match verb {
			HttpVerb::Get => Method::GET,
			HttpVerb::Post => Method::POST,
			HttpVerb::Put => Method::PUT,
			HttpVerb::Delete => Method::DELETE,
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The dispatcher follows redirects itself (bounded, verb forced to GET), so any custom
/// [`ReqwestClient`] handed to [`with_client`](Self::with_client) should be built with
/// `redirect(Policy::none())`; otherwise reqwest resolves 3xx responses before the client
/// sees them.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a pooled keep-alive client with automatic redirects disabled.
	///
	/// The user agent and the remaining call timeout come from
	/// [`ClientConfig`](crate::config::ClientConfig) and are applied to each hop.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().redirect(Policy::none()).build()?))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn verbs_deserialize_from_uppercase_tokens() {
		let verb: HttpVerb =
			serde_json::from_str("\"POST\"").expect("Uppercase verb should deserialize.");

		assert_eq!(verb, HttpVerb::Post);
		assert_eq!(HttpVerb::default(), HttpVerb::Get);
		assert_eq!(Method::from(HttpVerb::Delete), Method::DELETE);
		assert_eq!(HttpVerb::Put.to_string(), "PUT");
	}

	#[test]
	fn transport_builds_without_redirect_following() {
		ReqwestHttpClient::new().expect("Transport should build.");
	}
}
