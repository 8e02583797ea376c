//! Demonstrates listing monitored services through a redirecting endpoint, then dispatching the
//! same call on a background task with a completion callback.

// std
use std::sync::mpsc;
// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use url::Url;
// self
use webmetrics::{
	auth::Identity,
	client::Client,
	config::ClientConfig,
	request::Params,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let redirect_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/").query_param("method", "maintenance.getServices");
			then.status(302).header("location", "/mirror/v2/");
		})
		.await;
	let services_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/mirror/v2/");
			then.status(200).header("content-type", "application/json").body(
				"{\"service\":[{\"id\":[\"1\"],\"name\":[\"storefront\"],\"type\":[\"http\"]}]}",
			);
		})
		.await;
	let client = Client::builder()
		.config(ClientConfig::default().with_base_url(Url::parse(&server.url("/v2/"))?))
		.build()?;
	let identity = Identity::new("demo-user", "demo-key")?;
	let services = client
		.call("maintenance", "getServices", &identity, Params::from([("expanded", 1)]))
		.await?;

	for service in services["service"].as_array().into_iter().flatten() {
		println!("Service {} ({}).", service["name"][0], service["type"][0]);
	}

	let descriptor = client.method("maintenance", "getServices")?.descriptor().clone();
	let (tx, rx) = mpsc::channel();

	client
		.spawn_invoke(descriptor, identity, Params::new(), move |result| {
			let _ = tx.send(result.map(|value| value["service"].as_array().map_or(0, Vec::len)));
		})
		.await?;

	let count = rx.recv()??;

	println!("Background call saw {count} service(s).");

	if count == 0 {
		return Err(eyre!("Expected at least one service."));
	}

	redirect_mock.assert_calls_async(2).await;
	services_mock.assert_calls_async(2).await;

	Ok(())
}
