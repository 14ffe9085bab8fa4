//! Classification of API error bodies into the [`ErrorCode`] taxonomy.
//!
//! Each endpoint owns an immutable [`ErrorTable`] mapping the API's textual `error` values onto
//! codes. Resolution falls back in a fixed order:
//!
//! 1. A body that is not a JSON object with a string `error` field yields the endpoint's
//!    malformed-response code.
//! 2. A well-formed error string missing from the table yields
//!    [`ErrorCode::ERROR_NOT_IDENTIFIED_FROM_API`].
//! 3. Otherwise the mapped code is returned.

// self
use crate::{_prelude::*, error::ErrorCode, http::HttpResponse, obs};

/// Immutable API error string to [`ErrorCode`] mapping for one endpoint.
pub type ErrorTable = phf::Map<&'static str, ErrorCode>;

/// Static description of an authenticated endpoint and how its failures are classified.
#[derive(Debug)]
pub struct Endpoint {
	/// Path relative to the API base URL, without a leading slash.
	pub path: &'static str,
	/// Code returned when the endpoint answers HTTP 500.
	pub malformed_request: ErrorCode,
	/// Code returned when a body does not have the expected shape.
	pub malformed_response: ErrorCode,
	/// API error strings understood for HTTP 400 responses.
	pub errors: &'static ErrorTable,
}
impl Endpoint {
	/// Classifies failure statuses; `None` means the body should be read as a success payload.
	///
	/// 500 maps to the malformed-request code, 400 goes through [`resolve_api_error`], and 401
	/// means the bearer token was rejected.
	pub fn classify_status(&self, response: &HttpResponse) -> Option<ErrorCode> {
		match response.status {
			500 => Some(self.malformed_request),
			400 => Some(resolve_api_error(&response.body, self.malformed_response, self.errors)),
			401 => Some(ErrorCode::EXPIRED_JWT_TOKEN),
			_ => None,
		}
	}
}

#[derive(Deserialize)]
struct ApiError {
	error: String,
}

/// Maps an error body onto the taxonomy using `table`, falling back to `malformed`.
pub fn resolve_api_error(body: &[u8], malformed: ErrorCode, table: &ErrorTable) -> ErrorCode {
	let Ok(ApiError { error }) = serde_json::from_slice::<ApiError>(body) else {
		obs::trace_warn!(fallback = %malformed, "API error body is not well-formed.");

		return malformed;
	};

	match table.get(error.as_str()) {
		Some(code) => *code,
		None => {
			obs::trace_warn!(api_error = %error, "API error string is not recognized.");

			ErrorCode::ERROR_NOT_IDENTIFIED_FROM_API
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	static TABLE: ErrorTable = phf::phf_map! {
		"curp is invalid" => ErrorCode::INVALID_CURP,
		"email is missing" => ErrorCode::MISSING_EMAIL,
	};

	const MALFORMED: ErrorCode = ErrorCode::INVALID_LEAD_EVALUATION_RESPONSE_FORMAT;
	static ENDPOINT: Endpoint = Endpoint {
		path: "affiliates/test",
		malformed_request: ErrorCode::LEAD_EVALUATION_MALFORMED_REQUEST,
		malformed_response: MALFORMED,
		errors: &TABLE,
	};

	#[test]
	fn status_classification_follows_endpoint_codes() {
		let classify =
			|status, body: &str| ENDPOINT.classify_status(&HttpResponse::new(status, body));

		assert_eq!(classify(500, ""), Some(ErrorCode::LEAD_EVALUATION_MALFORMED_REQUEST));
		assert_eq!(
			classify(400, r#"{"error":"curp is invalid"}"#),
			Some(ErrorCode::INVALID_CURP)
		);
		assert_eq!(classify(400, "not json"), Some(MALFORMED));
		assert_eq!(classify(401, ""), Some(ErrorCode::EXPIRED_JWT_TOKEN));
		assert_eq!(classify(200, "{}"), None);
		assert_eq!(classify(201, "{}"), None);
	}

	#[test]
	fn mapped_strings_resolve_to_their_codes() {
		assert_eq!(
			resolve_api_error(br#"{"error":"curp is invalid"}"#, MALFORMED, &TABLE),
			ErrorCode::INVALID_CURP
		);
		assert_eq!(
			resolve_api_error(br#"{"error":"email is missing","detail":1}"#, MALFORMED, &TABLE),
			ErrorCode::MISSING_EMAIL
		);
	}

	#[test]
	fn unparsable_bodies_are_malformed_not_unrecognized() {
		let bodies =
			[&b""[..], b"Invalid JSON", b"{}", br#"{"error":42}"#, br#"["curp is invalid"]"#];

		for body in bodies {
			assert_eq!(resolve_api_error(body, MALFORMED, &TABLE), MALFORMED);
		}
	}

	#[test]
	fn unmapped_strings_are_unrecognized_not_malformed() {
		for body in [&br#"{"error":"Some error"}"#[..], br#"{"error":""}"#] {
			assert_eq!(
				resolve_api_error(body, MALFORMED, &TABLE),
				ErrorCode::ERROR_NOT_IDENTIFIED_FROM_API
			);
		}
	}
}
