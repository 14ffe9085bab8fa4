//! Demonstrates the full lead pipeline against a local mock of the affiliates API, using the
//! default reqwest transport and a JSON client configuration.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::{Duration, OffsetDateTime};
// self
use kueski_affiliates::{client::DefaultClient, config::ClientConfig, lead::LeadRequest};

const CURP: &str = "ABCD920113MSLXYZ01";
const EMAIL: &str = "demo@kueski.com";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expiration = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();
	let authenticate_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/authenticate").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body(json!({ "token": "demo-jwt", "expiration": expiration }).to_string());
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/lead-evaluation");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"curp": CURP,
					"email": EMAIL,
					"request_id": "demo-1",
					"status": "approved",
				})
				.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/affiliates/lead-data");
			then.status(200)
				.header("content-type", "application/json")
				.body(json!({ "response": "ok", "request_id": "demo-1" }).to_string());
		})
		.await;

	let document = json!({
		"base_url": server.base_url(),
		"api_key": "demo-key",
		"secret_key": "demo-secret",
	});
	let config = ClientConfig::from_json(&document.to_string())?;
	let client = DefaultClient::from_config(&config)?;
	let request =
		LeadRequest::new(CURP, EMAIL).with_full_data(json!({ "name": "Ana", "income": 15000 }));
	let request_id = client.evaluate(&request).await.into_result()?;

	println!("Lead accepted with request ID {request_id}.");

	authenticate_mock.assert_async().await;

	Ok(())
}
