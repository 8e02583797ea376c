//! Client-level error types shared across validation, dispatch, and normalization.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every variant is terminal for the call that produced it; the client never retries on its
/// own.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller-supplied input was rejected before any network activity.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Redirect chain could not be followed.
	#[error(transparent)]
	Redirect(#[from] RedirectError),
	/// Response body could not be normalized.
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// Remote endpoint answered with an HTTP status of 400 or above.
	#[error("Got error response code {status}")]
	Status {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
}
impl Error {
	/// Returns true when the error was raised before the request reached the network.
	pub fn is_validation(&self) -> bool {
		matches!(self, Self::Validation(_))
	}

	/// Returns the HTTP status for [`Error::Status`] failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status } => Some(*status),
			_ => None,
		}
	}
}

/// Parameter and method-name validation failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A parameter required by the method descriptor is absent.
	#[error("{field} must be present in options")]
	MissingParameter {
		/// Name of the missing parameter.
		field: String,
	},
	/// The table holds no method under the given category + name.
	#[error("Unknown webmetrics method {category}.{name}")]
	UnknownMethod {
		/// Requested category.
		category: String,
		/// Requested method name.
		name: String,
	},
}

/// Configuration failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL uses a scheme other than `http` or `https`.
	#[error("The base URL must use HTTP(S): {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Method table is malformed.
	#[error(transparent)]
	Table(#[from] crate::api::MethodTableError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Failed to send webmetrics request")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The configured call timeout elapsed before a terminal response arrived.
	#[error("Webmetrics request timed out")]
	Timeout {
		/// Transport-specific timeout error; absent when the budget ran out between redirect hops.
		#[source]
		source: Option<BoxError>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout { source: Some(Box::new(e)) } } else { Self::network(e) }
	}
}

/// Redirect handling failures.
#[derive(Debug, ThisError)]
pub enum RedirectError {
	/// The chain exceeded the configured hop limit.
	#[error("Exceeded the limit of {max} redirects")]
	TooManyRedirects {
		/// Configured hop limit.
		max: usize,
	},
	/// A 3xx response carried no usable `Location` header.
	#[error("Redirect response {status} is missing a Location header")]
	MissingLocation {
		/// Redirect status code.
		status: u16,
	},
	/// The `Location` header could not be resolved into a URL.
	#[error("Redirect location `{location}` is invalid")]
	InvalidLocation {
		/// Raw header value.
		location: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Response normalization failures.
#[derive(Debug, ThisError)]
pub enum ParseError {
	/// The body was not valid JSON.
	#[error("Failed to parse JSON response")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A complete JSON value was followed by more data.
	#[error("Failed to parse JSON response")]
	TrailingCharacters {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn messages_match_the_wire_contract() {
		let missing = Error::from(ValidationError::MissingParameter { field: "serviceid".into() });

		assert_eq!(missing.to_string(), "serviceid must be present in options");
		assert!(missing.is_validation());

		let status = Error::Status { status: 500 };

		assert_eq!(status.to_string(), "Got error response code 500");
		assert_eq!(status.status(), Some(500));

		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let transport = Error::from(TransportError::network(io));

		assert_eq!(transport.to_string(), "Failed to send webmetrics request");
		assert_eq!(transport.status(), None);
	}

	#[test]
	fn parse_error_hides_the_body() {
		let mut de = serde_json::Deserializer::from_str("{\"service\":");
		let source = serde_path_to_error::deserialize::<_, Value>(&mut de)
			.expect_err("Truncated JSON must fail to parse.");
		let err = Error::from(ParseError::Json { source });

		assert_eq!(err.to_string(), "Failed to parse JSON response");
	}
}
