//! Time-based request signatures.
//!
//! The remote service authenticates a call by recomputing
//! `base64(sha1(username ‖ api_key ‖ unix_seconds))` within its own clock tolerance, so a
//! signature is only valid for a short window and must be derived from the timestamp of the
//! call that carries it.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha1::{Digest, Sha1};
// self
use crate::{_prelude::*, auth::Identity};

/// Short-lived signature sent as the `sig` query field.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(String);
impl Signature {
	/// Returns the encoded signature for embedding into a request.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Length of the encoded signature.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true for an empty signature.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Debug for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signature").field(&"<redacted>").finish()
	}
}

/// Computes the signature attached to one outbound request.
///
/// Implementations must be pure functions of their inputs; the client supplies the current
/// Unix timestamp on every call and never reuses the output.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Signs `identity` for a request issued at `unix_seconds`.
	fn sign(&self, identity: &Identity, unix_seconds: i64) -> Signature;
}

/// SHA-1 + standard base64 signer expected by the Webmetrics API.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1Signer;
impl RequestSigner for Sha1Signer {
	fn sign(&self, identity: &Identity, unix_seconds: i64) -> Signature {
		sign(&identity.username, identity.api_key.expose(), unix_seconds)
	}
}

/// Concatenates `username`, `api_key`, and `unix_seconds` without delimiters, hashes the UTF-8
/// bytes with SHA-1, and encodes the digest as padded base64.
pub fn sign(username: &str, api_key: &str, unix_seconds: i64) -> Signature {
	let mut hasher = Sha1::new();

	hasher.update(username.as_bytes());
	hasher.update(api_key.as_bytes());
	hasher.update(unix_seconds.to_string().as_bytes());

	Signature(STANDARD.encode(hasher.finalize()))
}
