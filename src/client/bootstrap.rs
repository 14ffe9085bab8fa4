//! Signed bootstrap call exchanging the affiliate credentials for a bearer token.
//!
//! The request is a `POST` with an empty JSON body whose `Authorization` header carries an
//! `APIAuth <api_key>:<signature>` value computed over the canonical string. Transport failures
//! and the two rejection statuses are classified here; any other response body is handed to the
//! [`TokenCache`](crate::cache::TokenCache) for parsing.

// self
use crate::{
	_prelude::*,
	auth::{self, CanonicalRequest, SignError},
	cache::{TokenSource, TokenSourceFuture},
	client::Client,
	error::ErrorCode,
	http::{Headers, HttpTransport, header},
	lead::LeadValidator,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Bootstrap endpoint path relative to the API base URL.
pub const AUTHENTICATE_PATH: &str = "affiliates/authenticate";
/// Scheme prefix of the bootstrap `Authorization` header.
pub const API_AUTH_PREFIX: &str = "APIAuth";

const METHOD: &str = "POST";

/// Builds the signed headers of a bootstrap request issued at `now`.
pub fn bootstrap_headers(
	credentials: &auth::Credentials,
	now: OffsetDateTime,
) -> Result<Headers, SignError> {
	let path = format!("/{AUTHENTICATE_PATH}");
	let canonical = CanonicalRequest::new(METHOD, header::APPLICATION_JSON, b"", &path, now)
		.to_canonical_string()?;
	let signature = auth::sign(credentials, &canonical)?;
	let mut headers = Headers::new();

	headers.insert(header::CONTENT_MD5.into(), auth::content_md5(b""));
	headers.insert(header::AUTHORIZATION.into(), format!("{API_AUTH_PREFIX} {signature}"));
	headers.insert(header::DATE.into(), auth::http_date(now)?);
	headers.insert(header::CONTENT_TYPE.into(), header::APPLICATION_JSON.into());

	Ok(headers)
}

impl<T, V> Client<T, V>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	/// Performs the bootstrap call and returns the raw `{token, expiration}` body.
	///
	/// Callers normally go through the token cache; this bypasses it and always hits the network.
	pub async fn authenticate(&self) -> Result<Vec<u8>> {
		const KIND: CallKind = CallKind::Authenticate;

		let span = CallSpan::new(KIND, "authenticate");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let headers = bootstrap_headers(&self.credentials, self.clock.now()).map_err(|_e| {
					obs::trace_warn!(error = %_e, "Bootstrap request could not be signed.");

					ErrorCode::UNABLE_TO_REFRESH_JWT
				})?;
				let response = self
					.transport
					.post(&self.endpoints.authenticate, &headers, Vec::new())
					.await
					.map_err(|_e| {
						obs::trace_warn!(error = %_e, "Bootstrap transport failed.");

						ErrorCode::UNABLE_TO_REFRESH_JWT
					})?;

				match response.status {
					400 => Err(ErrorCode::INVALID_SIGNATURE_FORMAT),
					401 => Err(ErrorCode::ACCESS_DENIED),
					_ => Ok(response.body),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
impl<T, V> TokenSource for Client<T, V>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	fn request_token(&self) -> TokenSourceFuture<'_> {
		Box::pin(self.authenticate())
	}
}
