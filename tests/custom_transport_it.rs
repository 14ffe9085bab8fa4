// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use time::{Duration, OffsetDateTime, macros::datetime};
use url::Url;
// self
use kueski_affiliates::{
	auth::Credentials,
	client::Client,
	clock::FixedClock,
	error::ErrorCode,
	http::{Headers, HttpResponse, HttpTransport, TransportFuture},
	lead::{LeadOutcome, LeadRequest, RequestId},
};

const NOW: OffsetDateTime = datetime!(2019-01-25 18:21:25 UTC);

#[derive(Debug)]
struct Offline;
impl Display for Offline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Transport offline.")
	}
}
impl StdError for Offline {}

/// Answers every endpoint with a canned success; counts bootstrap calls.
#[derive(Default)]
struct CannedTransport {
	bootstraps: AtomicUsize,
	offline: bool,
}
impl HttpTransport for CannedTransport {
	type TransportError = Offline;

	fn post<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a Headers,
		body: Vec<u8>,
	) -> TransportFuture<'a, Self::TransportError> {
		Box::pin(async move {
			if self.offline {
				return Err(Offline);
			}

			let response = match url.path() {
				"/v2/affiliates/authenticate" => {
					self.bootstraps.fetch_add(1, Ordering::SeqCst);

					assert_eq!(headers["Date"], "Fri, 25 Jan 2019 18:21:25 GMT");
					assert!(body.is_empty());

					let expiration = (NOW + Duration::hours(2)).unix_timestamp();

					format!(r#"{{"token":"jwt","expiration":{expiration}}}"#)
				},
				"/v2/affiliates/lead-evaluation" => {
					let payload = serde_json::from_slice::<serde_json::Value>(&body)
						.expect("Evaluation payload should be JSON.");

					format!(
						r#"{{"curp":{},"email":{},"request_id":"R-42","status":"approved"}}"#,
						payload["curp"], payload["email"],
					)
				},
				"/v2/affiliates/lead-data" => r#"{"response":"ok","request_id":"R-42"}"#.into(),
				path => panic!("Unexpected path {path}."),
			};

			Ok(HttpResponse::new(200, response))
		})
	}
}

fn client(transport: Arc<CannedTransport>) -> Client<CannedTransport> {
	let base_url = Url::parse("https://partners.example.com/v2/").expect("Base URL should parse.");
	let credentials = Credentials::new("apikey", "secretkey").expect("Credentials should build.");

	Client::with_transport(&base_url, credentials, transport)
		.expect("Client should build.")
		.with_clock(Arc::new(FixedClock(NOW)))
}

#[tokio::test]
async fn custom_transport_drives_the_pipeline() {
	let transport = Arc::new(CannedTransport::default());
	let client = client(transport.clone());
	let request = LeadRequest::new("ABCD920113MSLXYZ01", "test@kueski.com")
		.with_full_data(serde_json::json!({ "income": 1 }));

	for _ in 0..3 {
		assert_eq!(client.evaluate(&request).await, LeadOutcome::success(RequestId::new("R-42")));
	}

	assert_eq!(transport.bootstraps.load(Ordering::SeqCst), 1);
	assert_eq!(client.token_cache().expires_at().await, Some(NOW + Duration::hours(2)));
}

#[tokio::test]
async fn offline_transport_fails_at_bootstrap() {
	let transport = Arc::new(CannedTransport { offline: true, ..Default::default() });
	let client = client(transport);

	assert_eq!(client.authenticate().await, Err(ErrorCode::UNABLE_TO_REFRESH_JWT));
	assert_eq!(
		client.lead_evaluation("ABCD920113MSLXYZ01", "test@kueski.com").await,
		Err(ErrorCode::UNABLE_TO_REFRESH_JWT)
	);
}
