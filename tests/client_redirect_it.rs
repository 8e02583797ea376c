// crates.io
use httpmock::prelude::*;
// self
use webmetrics::{
	_preludet::*,
	api::MethodTable,
	client::Client,
	config::ClientConfig,
	error::{RedirectError, TransportError},
	request::Params,
};

fn client_with_table(base_url: &str, table: MethodTable) -> Client {
	let base_url = Url::parse(base_url).expect("Mock URL should parse.");

	Client::builder()
		.config(ClientConfig::default().with_base_url(base_url))
		.table(table)
		.http_client(test_reqwest_http_client())
		.build()
		.expect("Client should build.")
}

#[tokio::test]
async fn redirects_are_reissued_as_get() {
	let server = MockServer::start_async().await;
	let table = MethodTable::from_json(
		r#"{"maintenance":{"setNotepad":{"required":["serviceid","notepad"],"method":"POST"}}}"#,
	)
	.expect("Table JSON should decode.");
	let moved_url = server.url("/moved/");
	let moved = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/").query_param("method", "maintenance.setNotepad");
			then.status(302).header("location", moved_url);
		})
		.await;
	let landed = server
		.mock_async(|when, then| {
			when.method(GET).path("/moved/");
			then.status(200).body("{\"success\":[\"1\"]}");
		})
		.await;
	let client = client_with_table(&server.url("/v2/"), table);
	let value = client
		.call(
			"maintenance",
			"setNotepad",
			&test_identity(),
			Params::from([("serviceid", "42"), ("notepad", "hello")]),
		)
		.await
		.expect("Redirected call should succeed.");

	assert_eq!(value["success"][0], "1");

	moved.assert_calls_async(1).await;
	landed.assert_calls_async(1).await;
}

#[tokio::test]
async fn relative_locations_chain_until_a_terminal_response() {
	let server = MockServer::start_async().await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/");
			then.status(301).header("location", "hop");
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/hop");
			then.status(307).header("location", "../final?format=json");
		})
		.await;
	let last = server
		.mock_async(|when, then| {
			when.method(GET).path("/final").query_param("format", "json");
			then.status(200).body("{\"service\":[]}");
		})
		.await;
	let client = build_test_client(&server.url("/v2/"));
	let value = client
		.call_without_params("maintenance", "getServices", &test_identity())
		.await
		.expect("Redirect chain should resolve.");

	assert_eq!(value, serde_json::json!({ "service": [] }));

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
	last.assert_calls_async(1).await;
}

#[tokio::test]
async fn redirect_loops_stop_at_the_configured_depth() {
	let server = MockServer::start_async().await;
	let entry = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/");
			then.status(302).header("location", "/loop");
		})
		.await;
	let looped = server
		.mock_async(|when, then| {
			when.method(GET).path("/loop");
			then.status(302).header("location", "/loop");
		})
		.await;
	let client = build_test_client_with(&server.url("/v2/"), |config| config.with_max_redirects(3));
	let err = client
		.call_without_params("maintenance", "getServices", &test_identity())
		.await
		.expect_err("A redirect loop should be cut off.");

	assert!(matches!(err, Error::Redirect(RedirectError::TooManyRedirects { max: 3 })));

	entry.assert_calls_async(1).await;
	looped.assert_calls_async(3).await;
}

#[tokio::test]
async fn zero_redirect_budget_rejects_the_first_redirect() {
	let server = MockServer::start_async().await;
	let entry = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/");
			then.status(302).header("location", "/elsewhere");
		})
		.await;
	let elsewhere = server
		.mock_async(|when, then| {
			when.path("/elsewhere");
			then.status(200).body("{}");
		})
		.await;
	let client = build_test_client_with(&server.url("/v2/"), |config| config.with_max_redirects(0));
	let err = client
		.call_without_params("maintenance", "getServices", &test_identity())
		.await
		.expect_err("No redirects should be followed.");

	assert!(matches!(err, Error::Redirect(RedirectError::TooManyRedirects { max: 0 })));

	entry.assert_calls_async(1).await;
	elsewhere.assert_calls_async(0).await;
}

#[tokio::test]
async fn error_status_after_a_redirect_is_terminal() {
	let server = MockServer::start_async().await;
	let _entry = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/");
			then.status(302).header("location", "/broken");
		})
		.await;
	let broken = server
		.mock_async(|when, then| {
			when.method(GET).path("/broken");
			then.status(500).header("location", "/never");
		})
		.await;
	let never = server
		.mock_async(|when, then| {
			when.path("/never");
			then.status(200).body("{}");
		})
		.await;
	let client = build_test_client(&server.url("/v2/"));
	let err = client
		.call_without_params("maintenance", "getServices", &test_identity())
		.await
		.expect_err("HTTP 500 should end the chain.");

	assert_eq!(err.to_string(), "Got error response code 500");

	broken.assert_calls_async(1).await;
	never.assert_calls_async(0).await;
}

#[tokio::test]
async fn redirects_without_location_fail() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/");
			then.status(303);
		})
		.await;
	let client = build_test_client(&server.url("/v2/"));
	let err = client
		.call_without_params("maintenance", "getServices", &test_identity())
		.await
		.expect_err("A redirect with no target should fail.");

	assert!(matches!(err, Error::Redirect(RedirectError::MissingLocation { status: 303 })));
}

#[tokio::test]
async fn timeout_covers_the_whole_redirect_chain() {
	let server = MockServer::start_async().await;
	let entry = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/");
			then.status(302).delay(StdDuration::from_millis(200)).header("location", "/b");
		})
		.await;
	let _middle = server
		.mock_async(|when, then| {
			when.method(GET).path("/b");
			then.status(302).delay(StdDuration::from_millis(200)).header("location", "/c");
		})
		.await;
	let last = server
		.mock_async(|when, then| {
			when.method(GET).path("/c");
			then.status(200).delay(StdDuration::from_millis(200)).body("{}");
		})
		.await;
	let client = build_test_client_with(&server.url("/v2/"), |config| {
		config.with_timeout(Some(StdDuration::from_millis(300)))
	});
	let err = client
		.call_without_params("maintenance", "getServices", &test_identity())
		.await
		.expect_err("Slow hops should exhaust the shared budget.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
	assert_eq!(err.to_string(), "Webmetrics request timed out");

	entry.assert_calls_async(1).await;
	last.assert_calls_async(0).await;
}
