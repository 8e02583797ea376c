//! Response normalization: turns a successful HTTP body into the call's payload.

// self
use crate::{_prelude::*, error::ParseError, obs};

/// Terminal (non-redirect, non-error) response handed to a [`ResponseNormalizer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseBody {
	/// HTTP status code (< 300).
	pub status: u16,
	/// `Content-Type` header, when present.
	pub content_type: Option<String>,
	/// Full body decoded as text.
	pub text: String,
}

/// Reduces a response body to the value delivered to the caller.
///
/// Swap implementations to support payload formats other than JSON without touching the
/// transport.
pub trait ResponseNormalizer
where
	Self: Send + Sync,
{
	/// Normalizes `body` into the call's payload.
	fn normalize(&self, body: &ResponseBody) -> Result<Value>;
}

/// Parses the body as JSON regardless of the declared content type.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonNormalizer;
impl ResponseNormalizer for JsonNormalizer {
	fn normalize(&self, body: &ResponseBody) -> Result<Value> {
		let mut de = serde_json::Deserializer::from_str(&body.text);
		let value = serde_path_to_error::deserialize::<_, Value>(&mut de)
			.map_err(|source| ParseError::Json { source })
			.and_then(|value| {
				de.end().map(|()| value).map_err(|source| ParseError::TrailingCharacters { source })
			})
			.inspect_err(|_| obs::unparsable_body(&body.text))?;

		Ok(value)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn body(text: &str) -> ResponseBody {
		ResponseBody {
			status: 200,
			content_type: Some("application/json".into()),
			text: text.into(),
		}
	}

	#[test]
	fn json_payloads_keep_their_shape() {
		let value = JsonNormalizer
			.normalize(&body("{\"service\":[{\"id\":[\"42\"]}]}"))
			.expect("Well-formed JSON should normalize.");

		assert_eq!(value["service"][0]["id"][0], "42");
	}

	#[test]
	fn malformed_payloads_become_parse_errors() {
		for text in ["{\"service\":", "", "<html></html>", "{} trailing"] {
			let err = JsonNormalizer
				.normalize(&body(text))
				.expect_err("Malformed JSON should fail to normalize.");

			assert!(matches!(err, Error::Parse(_)));
			assert_eq!(err.to_string(), "Failed to parse JSON response");
		}
	}
}
