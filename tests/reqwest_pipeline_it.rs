#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::{Duration, OffsetDateTime};
// self
use kueski_affiliates::{
	client::DefaultClient,
	config::ClientConfig,
	error::ErrorCode,
	lead::{LeadOutcome, LeadRequest, RequestId},
};

const CURP: &str = "ABCD920113MSLXYZ01";
const EMAIL: &str = "test@kueski.com";

fn authenticate_body(token: &str) -> String {
	let expires_at = OffsetDateTime::now_utc() + Duration::hours(1);

	json!({ "token": token, "expiration": expires_at.unix_timestamp() }).to_string()
}

fn client(server: &MockServer) -> DefaultClient {
	DefaultClient::new(&server.base_url(), "apikey", "secretkey")
		.expect("Reqwest client should build.")
}

fn lead() -> LeadRequest<serde_json::Value> {
	LeadRequest::new(CURP, EMAIL).with_full_data(json!({ "name": "Ana", "income": 15000 }))
}

#[tokio::test]
async fn pipeline_round_trips_over_http() {
	let server = MockServer::start_async().await;
	let authenticate = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/affiliates/authenticate")
				.header("content-type", "application/json")
				.header("content-md5", "1B2M2Y8AsgTpgAmY7PhCfg==")
				.header_exists("date")
				.header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body(authenticate_body("jwt-it"));
		})
		.await;
	let evaluation = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/affiliates/lead-evaluation")
				.header("authorization", "Bearer jwt-it")
				.json_body(json!({ "curp": CURP, "email": EMAIL }));
			then.status(200).header("content-type", "application/json").body(
				json!({ "curp": CURP, "email": EMAIL, "request_id": "R-1", "status": "approved" })
					.to_string(),
			);
		})
		.await;
	let data = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/affiliates/lead-data")
				.header("authorization", "Bearer jwt-it")
				.json_body(json!({
					"full_data": { "name": "Ana", "income": 15000 },
					"request_id": "R-1",
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body(json!({ "response": "ok", "request_id": "R-1" }).to_string());
		})
		.await;
	let client = client(&server);

	assert_eq!(client.evaluate(&lead()).await, LeadOutcome::success(RequestId::new("R-1")));
	assert_eq!(client.evaluate(&lead()).await, LeadOutcome::success(RequestId::new("R-1")));

	authenticate.assert_calls_async(1).await;
	evaluation.assert_calls_async(2).await;
	data.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_bootstrap_maps_to_access_denied() {
	let server = MockServer::start_async().await;
	let authenticate = server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/authenticate");
			then.status(401);
		})
		.await;
	let evaluation = server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/lead-evaluation");
			then.status(200);
		})
		.await;
	let client = client(&server);

	assert_eq!(client.evaluate(&lead()).await, LeadOutcome::failed(ErrorCode::ACCESS_DENIED));

	authenticate.assert_async().await;
	evaluation.assert_calls_async(0).await;
}

#[tokio::test]
async fn duplicated_lead_returns_advisory_over_http() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/authenticate");
			then.status(200).body(authenticate_body("jwt-dup"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/lead-evaluation");
			then.status(200).body(
				json!({ "curp": CURP, "email": EMAIL, "request_id": "R-7", "status": "duplicated" })
					.to_string(),
			);
		})
		.await;

	let data = server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/lead-data");
			then.status(200);
		})
		.await;
	let outcome = client(&server).evaluate(&lead()).await;

	assert_eq!(outcome.request_id, Some(RequestId::new("R-7")));
	assert_eq!(outcome.error, Some(ErrorCode::DUPLICATED_LEAD));

	data.assert_calls_async(0).await;
}

#[tokio::test]
async fn unreachable_host_maps_to_refresh_failure() -> color_eyre::Result<()> {
	let config = ClientConfig::from_json(
		r#"{"base_url":"http://127.0.0.1:9","api_key":"apikey","secret_key":"secretkey"}"#,
	)?;
	let client = DefaultClient::from_config(&config)?;

	assert_eq!(
		client.evaluate(&lead()).await,
		LeadOutcome::failed(ErrorCode::UNABLE_TO_REFRESH_JWT)
	);

	Ok(())
}
