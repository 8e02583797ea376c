//! Call builder and request dispatcher.
//!
//! [`Client`] pairs the immutable [`MethodTable`] with a pooled transport. A call is
//! validated against its [`MethodDescriptor`] before anything is signed, signed with the
//! current timestamp, sent, and chased through at most
//! [`ClientConfig::max_redirects`] redirects (each re-issued as GET), all within one
//! [`ClientConfig::timeout`] budget. The returned future resolves exactly once with the
//! normalized payload or the first terminal error.

// std
use std::time::Instant;
// crates.io
use reqwest::{
	Response,
	header::{CONTENT_TYPE, HeaderMap, LOCATION, USER_AGENT},
};
use tokio::task::JoinHandle;
// self
use crate::{
	_prelude::*,
	api::{MethodDescriptor, MethodTable},
	auth::{Identity, RequestSigner, Sha1Signer},
	config::ClientConfig,
	error::{ConfigError, RedirectError, TransportError},
	http::{HttpVerb, ReqwestHttpClient},
	normalize::{JsonNormalizer, ResponseBody, ResponseNormalizer},
	obs::{self, CallOutcome, CallSpan},
	request::{OutboundRequest, Params},
};

/// Async client for the Webmetrics JSON API.
///
/// Cloning is cheap: the table, configuration, signer, normalizer, and connection pool are
/// shared. Identities are never stored; every call takes the one it should be signed with.
#[derive(Clone)]
pub struct Client {
	http_client: ReqwestHttpClient,
	config: Arc<ClientConfig>,
	table: Arc<MethodTable>,
	signer: Arc<dyn RequestSigner>,
	normalizer: Arc<dyn ResponseNormalizer>,
}
impl Client {
	/// Creates a client for the production endpoint with the built-in method table.
	pub fn new() -> Result<Self, ConfigError> {
		Self::builder().build()
	}

	/// Starts a [`ClientBuilder`] seeded with defaults.
	pub fn builder() -> ClientBuilder {
		ClientBuilder::default()
	}

	/// Active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Method table the client resolves names against.
	pub fn table(&self) -> &MethodTable {
		&self.table
	}

	/// Binds the descriptor for `category.name` (canonical name or alias) to this client.
	pub fn method(&self, category: &str, name: &str) -> Result<MethodCall<'_>> {
		let descriptor = self.table.resolve(category, name)?;

		Ok(MethodCall { client: self, descriptor })
	}

	/// Binds every method in the table, ordered by category then name.
	pub fn methods(&self) -> impl Iterator<Item = MethodCall<'_>> {
		self.table.iter().map(move |descriptor| MethodCall { client: self, descriptor })
	}

	/// Resolves `category.name` and invokes it with `params`.
	pub async fn call(
		&self,
		category: &str,
		name: &str,
		identity: &Identity,
		params: Params,
	) -> Result<Value> {
		self.method(category, name)?.invoke(identity, params).await
	}

	/// Resolves `category.name` and invokes it without parameters.
	pub async fn call_without_params(
		&self,
		category: &str,
		name: &str,
		identity: &Identity,
	) -> Result<Value> {
		self.call(category, name, identity, Params::new()).await
	}

	/// Validates `params` against `descriptor`, then signs and dispatches the call.
	///
	/// A missing required parameter fails with
	/// [`ValidationError::MissingParameter`](crate::error::ValidationError::MissingParameter)
	/// before the signer or the network is touched.
	pub async fn invoke(
		&self,
		descriptor: &MethodDescriptor,
		identity: &Identity,
		params: Params,
	) -> Result<Value> {
		let remote_method = descriptor.remote_method();
		let span = CallSpan::new(&remote_method);

		obs::record_call_outcome(&remote_method, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				descriptor.validate_params(&params)?;

				self.send(identity, &remote_method, descriptor.http_verb, params).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(&remote_method, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(&remote_method, CallOutcome::Failure),
		}

		result
	}

	/// Equivalent to [`invoke`](Self::invoke) with an empty [`Params`].
	pub async fn invoke_without_params(
		&self,
		descriptor: &MethodDescriptor,
		identity: &Identity,
	) -> Result<Value> {
		self.invoke(descriptor, identity, Params::new()).await
	}

	/// Runs [`invoke`](Self::invoke) on the ambient tokio runtime and hands the result to
	/// `callback` exactly once.
	///
	/// Must be called from within a tokio runtime.
	pub fn spawn_invoke<F>(
		&self,
		descriptor: MethodDescriptor,
		identity: Identity,
		params: Params,
		callback: F,
	) -> JoinHandle<()>
	where
		F: 'static + Send + FnOnce(Result<Value>),
	{
		let client = self.clone();

		tokio::spawn(async move {
			let result = client.invoke(&descriptor, &identity, params).await;

			callback(result);
		})
	}

	/// Signs and sends an already validated call.
	///
	/// The signature is derived from the current Unix time on every invocation.
	pub async fn send(
		&self,
		identity: &Identity,
		remote_method: &str,
		verb: HttpVerb,
		params: Params,
	) -> Result<Value> {
		obs::dispatching(remote_method, verb);

		let signature = self.signer.sign(identity, OffsetDateTime::now_utc().unix_timestamp());

		obs::signature_computed(signature.len());

		let request = OutboundRequest::build(
			&self.config.base_url,
			identity,
			remote_method,
			verb,
			&signature,
			&params,
		);

		obs::request_url(&request.redacted_url());

		self.execute(request).await.inspect_err(obs::request_failed)
	}

	async fn execute(&self, request: OutboundRequest) -> Result<Value> {
		let OutboundRequest { mut verb, mut url } = request;
		let deadline = self.config.timeout.map(|timeout| Instant::now() + timeout);
		let mut hops = 0;

		loop {
			let response = self.round_trip(verb, url.clone(), deadline).await?;
			let status = response.status().as_u16();

			obs::response_status(status);

			if status >= 400 {
				return Err(Error::Status { status });
			}
			if status >= 300 {
				hops += 1;

				if hops > self.config.max_redirects {
					return Err(RedirectError::TooManyRedirects { max: self.config.max_redirects }
						.into());
				}

				url = redirect_target(&url, status, response.headers())?;
				verb = HttpVerb::Get;

				obs::following_redirect(&url, hops);

				continue;
			}

			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let text = response.text().await.map_err(TransportError::from)?;

			return self.normalizer.normalize(&ResponseBody { status, content_type, text });
		}
	}

	async fn round_trip(
		&self,
		verb: HttpVerb,
		url: Url,
		deadline: Option<Instant>,
	) -> Result<Response> {
		let mut request =
			self.http_client.request(verb.into(), url).header(USER_AGENT, &self.config.user_agent);

		if let Some(remaining) = remaining_budget(deadline, Instant::now())? {
			request = request.timeout(remaining);
		}

		let response = request.send().await.map_err(TransportError::from)?;

		Ok(response)
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("methods", &self.table.len())
			.finish()
	}
}

/// Builder for [`Client`] values.
#[derive(Default)]
pub struct ClientBuilder {
	config: ClientConfig,
	table: Option<MethodTable>,
	http_client: Option<ReqwestHttpClient>,
	signer: Option<Arc<dyn RequestSigner>>,
	normalizer: Option<Arc<dyn ResponseNormalizer>>,
}
impl ClientBuilder {
	/// Overrides the configuration.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;

		self
	}

	/// Overrides the method table (defaults to [`MethodTable::builtin`]).
	pub fn table(mut self, table: MethodTable) -> Self {
		self.table = Some(table);

		self
	}

	/// Supplies a preconfigured transport; see [`ReqwestHttpClient`] for redirect caveats.
	pub fn http_client(mut self, http_client: ReqwestHttpClient) -> Self {
		self.http_client = Some(http_client);

		self
	}

	/// Overrides the request signer (defaults to [`Sha1Signer`]).
	pub fn signer(mut self, signer: impl 'static + RequestSigner) -> Self {
		self.signer = Some(Arc::new(signer));

		self
	}

	/// Overrides the response normalizer (defaults to [`JsonNormalizer`]).
	pub fn normalizer(mut self, normalizer: impl 'static + ResponseNormalizer) -> Self {
		self.normalizer = Some(Arc::new(normalizer));

		self
	}

	/// Validates the configuration and assembles the client.
	pub fn build(self) -> Result<Client, ConfigError> {
		self.config.validate()?;

		let http_client = match self.http_client {
			Some(http_client) => http_client,
			None => ReqwestHttpClient::new()?,
		};

		Ok(Client {
			http_client,
			config: Arc::new(self.config),
			table: Arc::new(self.table.unwrap_or_else(MethodTable::builtin)),
			signer: self.signer.unwrap_or_else(|| Arc::new(Sha1Signer)),
			normalizer: self.normalizer.unwrap_or_else(|| Arc::new(JsonNormalizer)),
		})
	}
}
impl Debug for ClientBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("config", &self.config)
			.field("custom_table", &self.table.is_some())
			.field("custom_http_client", &self.http_client.is_some())
			.finish()
	}
}

/// A descriptor bound to a [`Client`]: the callable for one remote method.
#[derive(Clone, Copy)]
pub struct MethodCall<'a> {
	client: &'a Client,
	descriptor: &'a MethodDescriptor,
}
impl<'a> MethodCall<'a> {
	/// Descriptor this call validates against.
	pub fn descriptor(&self) -> &'a MethodDescriptor {
		self.descriptor
	}

	/// See [`Client::invoke`].
	pub async fn invoke(&self, identity: &Identity, params: Params) -> Result<Value> {
		self.client.invoke(self.descriptor, identity, params).await
	}

	/// See [`Client::invoke_without_params`].
	pub async fn invoke_without_params(&self, identity: &Identity) -> Result<Value> {
		self.client.invoke_without_params(self.descriptor, identity).await
	}
}
impl Debug for MethodCall<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("MethodCall").field(&self.descriptor.remote_method()).finish()
	}
}

/// Time left before `deadline`; the whole redirect chain shares one budget.
fn remaining_budget(
	deadline: Option<Instant>,
	now: Instant,
) -> Result<Option<StdDuration>, TransportError> {
	let Some(deadline) = deadline else { return Ok(None) };
	let remaining = deadline.saturating_duration_since(now);

	if remaining.is_zero() {
		return Err(TransportError::Timeout { source: None });
	}

	Ok(Some(remaining))
}

/// Resolves the `Location` header of a redirect against the URL that produced it.
fn redirect_target(current: &Url, status: u16, headers: &HeaderMap) -> Result<Url, RedirectError> {
	let location = headers
		.get(LOCATION)
		.and_then(|value| value.to_str().ok())
		.filter(|value| !value.trim().is_empty())
		.ok_or(RedirectError::MissingLocation { status })?;

	current.join(location.trim()).map_err(|source| RedirectError::InvalidLocation {
		location: location.to_owned(),
		source,
	})
}
