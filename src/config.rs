//! Client configuration: endpoint, redirect bound, timeout, user agent.

// self
use crate::{_prelude::*, error::ConfigError};

/// Static settings shared by every call a [`Client`](crate::client::Client) makes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Host and versioned API path every request targets.
	pub base_url: Url,
	/// Maximum number of redirect hops followed before the call fails.
	pub max_redirects: usize,
	/// Budget for the whole call, redirect hops and body included; `None` waits indefinitely.
	pub timeout: Option<StdDuration>,
	/// `User-Agent` header sent with every request.
	pub user_agent: String,
}
impl ClientConfig {
	/// Production Webmetrics endpoint.
	pub const DEFAULT_BASE_URL: &'static str = "https://api.webmetrics.com/v2/";
	/// Default redirect hop limit.
	pub const DEFAULT_MAX_REDIRECTS: usize = 10;
	/// Default whole-call timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Overrides the base URL.
	pub fn with_base_url(mut self, url: Url) -> Self {
		self.base_url = url;

		self
	}

	/// Overrides the redirect hop limit.
	pub fn with_max_redirects(mut self, max: usize) -> Self {
		self.max_redirects = max;

		self
	}

	/// Overrides (or disables, with `None`) the request timeout.
	pub fn with_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the user agent.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Checks that the base URL targets HTTP(S).
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !matches!(self.base_url.scheme(), "https" | "http") {
			return Err(ConfigError::UnsupportedScheme { url: self.base_url.to_string() });
		}

		Ok(())
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: Url::parse(Self::DEFAULT_BASE_URL)
				.expect("Default base URL is a valid absolute URL."),
			max_redirects: Self::DEFAULT_MAX_REDIRECTS,
			timeout: Some(Self::DEFAULT_TIMEOUT),
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_target_the_production_api() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url.as_str(), "https://api.webmetrics.com/v2/");
		assert_eq!(config.max_redirects, 10);
		assert_eq!(config.timeout, Some(StdDuration::from_secs(30)));
		assert!(config.user_agent.starts_with("webmetrics/"));
		config.validate().expect("Default configuration should validate.");
	}

	#[test]
	fn partial_json_falls_back_to_defaults() {
		let config: ClientConfig =
			serde_json::from_str("{\"base_url\":\"http://127.0.0.1:8080/v2/\",\"max_redirects\":3}")
				.expect("Partial configuration should deserialize.");

		assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/v2/");
		assert_eq!(config.max_redirects, 3);
		assert_eq!(config.timeout, Some(ClientConfig::DEFAULT_TIMEOUT));
	}

	#[test]
	fn validate_rejects_non_http_urls() {
		let ftp = ClientConfig::default()
			.with_base_url(Url::parse("ftp://example.com/v2/").expect("URL fixture should parse."));

		assert!(matches!(ftp.validate(), Err(ConfigError::UnsupportedScheme { .. })));

		let opaque = ClientConfig::default()
			.with_base_url(Url::parse("mailto:ops@example.com").expect("URL fixture should parse."));

		assert!(matches!(opaque.validate(), Err(ConfigError::UnsupportedScheme { .. })));
	}
}
