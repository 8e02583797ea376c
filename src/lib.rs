//! Typed, signed, redirect-aware async client for the Webmetrics monitoring JSON API.
//!
//! Every remote method is described by a [`api::MethodDescriptor`] held in an immutable
//! [`api::MethodTable`]. [`client::Client::invoke`] validates caller parameters against the
//! descriptor, signs the request with a fresh timestamp, follows redirects up to a bounded
//! depth, and resolves to exactly one [`Result`](error::Result).

#![deny(clippy::all, missing_docs)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod obs;
pub mod request;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::MethodTable,
		auth::Identity,
		client::Client,
		config::ClientConfig,
		http::ReqwestHttpClient,
	};

	/// Username used by integration tests.
	pub const TEST_USERNAME: &str = "BananaHead";
	/// Secret key used by integration tests.
	pub const TEST_API_KEY: &str = "12345678";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns the identity shared by integration tests.
	pub fn test_identity() -> Identity {
		Identity::new(TEST_USERNAME, TEST_API_KEY).expect("Test identity should be valid.")
	}

	/// Constructs a [`Client`] using the built-in method table whose base URL points at
	/// `base_url`.
	pub fn build_test_client(base_url: &str) -> Client {
		build_test_client_with(base_url, |config| config)
	}

	/// Same as [`build_test_client`] but lets the caller tweak the configuration first.
	pub fn build_test_client_with(
		base_url: &str,
		configure: impl FnOnce(ClientConfig) -> ClientConfig,
	) -> Client {
		let base_url = Url::parse(base_url).expect("Failed to parse test base URL.");
		let config = configure(ClientConfig::default().with_base_url(base_url));

		Client::builder()
			.config(config)
			.table(MethodTable::builtin())
			.http_client(test_reqwest_http_client())
			.build()
			.expect("Failed to build test client.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use serde_json;
pub use url;
