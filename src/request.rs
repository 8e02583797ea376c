//! Call parameters and outbound request construction.
//!
//! Every field, including the injected `method`, `username`, `sig`, and `format`, travels in
//! the URL query string regardless of verb.

// self
use crate::{
	_prelude::*,
	auth::{Identity, Signature},
	http::HttpVerb,
	obs,
};

/// Caller-supplied parameters for one call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(BTreeMap<String, String>);
impl Params {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a parameter, rendering `value` with [`Display`].
	pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.insert(key, value);

		self
	}

	/// Inserts a parameter, returning the previous value for `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> Option<String> {
		self.0.insert(key.into(), value.to_string())
	}

	/// Returns the value for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns true when `key` is present.
	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Iterates over `(key, value)` pairs in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no parameters are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Display,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.to_string())).collect())
	}
}
impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
	K: Into<String>,
	V: Display,
{
	fn from(pairs: [(K, V); N]) -> Self {
		pairs.into_iter().collect()
	}
}

/// Fully-qualified request ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest {
	/// Verb for the initial request.
	pub verb: HttpVerb,
	/// Base URL plus the encoded query string.
	pub url: Url,
}
impl OutboundRequest {
	/// Query fields the dispatcher injects; caller parameters with these names are dropped.
	pub const RESERVED_FIELDS: [&'static str; 4] = ["method", "username", "sig", "format"];

	/// Returns true when `field` is injected by the dispatcher.
	pub fn is_reserved(field: &str) -> bool {
		Self::RESERVED_FIELDS.contains(&field)
	}

	/// Encodes `params` followed by the injected fields onto `base_url`.
	pub fn build(
		base_url: &Url,
		identity: &Identity,
		remote_method: &str,
		verb: HttpVerb,
		signature: &Signature,
		params: &Params,
	) -> Self {
		let mut url = base_url.clone();

		{
			let mut query = url.query_pairs_mut();

			for (key, value) in params.iter() {
				if Self::is_reserved(key) {
					obs::reserved_param_dropped(key);

					continue;
				}

				query.append_pair(key, value);
			}

			query
				.append_pair("method", remote_method)
				.append_pair("username", &identity.username)
				.append_pair("sig", signature.expose())
				.append_pair("format", "json");
		}

		Self { verb, url }
	}

	/// Renders the URL with the `sig` value replaced, for logging.
	pub fn redacted_url(&self) -> String {
		let mut url = self.url.clone();
		let pairs = self
			.url
			.query_pairs()
			.map(|(k, v)| if k == "sig" { (k, "<redacted>".into()) } else { (k, v) })
			.collect::<Vec<_>>();

		url.query_pairs_mut().clear().extend_pairs(pairs);

		url.into()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::sign;

	fn build(params: &Params) -> OutboundRequest {
		let identity =
			Identity::new("BananaHead", "12345678").expect("Identity fixture should be valid.");
		let base = Url::parse("https://api.webmetrics.com/v2/").expect("Base URL should parse.");
		let signature = sign("BananaHead", "12345678", 1_700_000_000);

		OutboundRequest::build(
			&base,
			&identity,
			"maintenance.getServices",
			HttpVerb::Get,
			&signature,
			params,
		)
	}

	#[test]
	fn params_render_display_values() {
		let params = Params::from([("expanded", 1)]).with("samplenum", 20).with("name", "home page");

		assert_eq!(params.get("expanded"), Some("1"));
		assert_eq!(params.get("samplenum"), Some("20"));
		assert_eq!(params.len(), 3);
		assert!(!params.contains("serviceid"));
	}

	#[test]
	fn query_carries_params_then_injected_fields() {
		let request = build(&Params::from([("expanded", 1)]));

		assert_eq!(request.url.path(), "/v2/");
		assert_eq!(
			request.url.query(),
			Some(
				"expanded=1&method=maintenance.getServices&username=BananaHead\
				 &sig=socDCE9i2mUGF6oQgggSUsd2CKo%3D&format=json"
			)
		);
	}

	#[test]
	fn reserved_caller_fields_are_dropped() {
		let request = build(&Params::new().with("format", "xml").with("method", "x.y"));
		let pairs = request.url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(pairs.iter().filter(|(k, _)| k == "format").count(), 1);
		assert!(pairs.contains(&("format".into(), "json".into())));
		assert!(pairs.contains(&("method".into(), "maintenance.getServices".into())));
	}

	#[test]
	fn redacted_url_hides_the_signature() {
		let redacted = build(&Params::new()).redacted_url();

		assert!(redacted.contains("sig=%3Credacted%3E"));
		assert!(!redacted.contains("socDCE9i2mUGF6oQgggSUsd2CKo"));
	}
}
