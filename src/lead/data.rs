//! Lead data endpoint: payload, error table, and success resolver.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::ErrorCode,
	lead::RequestId,
	resolve::{Endpoint, ErrorTable},
};

/// API error strings returned by the data endpoint with HTTP 400.
pub static LEAD_DATA_ERRORS: ErrorTable = phf::phf_map! {
	"Request not found" => ErrorCode::REQUEST_ID_NOT_FOUND,
	"request_id is invalid, full_data is missing" => ErrorCode::MISSING_FULL_DATA_INVALID_REQUEST_ID,
	"request_id is invalid, full_data is invalid" => ErrorCode::INVALID_FULL_DATA_AND_REQUEST_ID,
	"request_id is invalid" => ErrorCode::INVALID_REQUEST_ID,
	"request_id is missing, full_data is missing" => ErrorCode::MISSING_FULL_DATA_AND_REQUEST_ID,
	"request_id is missing, full_data is invalid" => ErrorCode::MISSING_REQUEST_ID_INVALID_FULL_DATA,
	"request_id is missing" => ErrorCode::MISSING_REQUEST_ID,
	"full_data is missing" => ErrorCode::MISSING_FULL_DATA,
	"full_data is invalid" => ErrorCode::INVALID_FULL_DATA_FORMAT,
};

/// Lead data endpoint.
pub static LEAD_DATA: Endpoint = Endpoint {
	path: "affiliates/lead-data",
	malformed_request: ErrorCode::LEAD_DATA_MALFORMED_REQUEST,
	malformed_response: ErrorCode::INVALID_LEAD_DATA_RESPONSE_FORMAT,
	errors: &LEAD_DATA_ERRORS,
};

/// Marker the API sends in `response` when the data was accepted.
pub const ACCEPTED_MARKER: &str = "ok";

/// Body posted to the data endpoint.
#[derive(Debug, Serialize)]
pub struct LeadDataPayload<'a> {
	/// Encoded full lead data.
	pub full_data: &'a Value,
	/// Request ID issued by the evaluation step.
	pub request_id: &'a RequestId,
}

#[derive(Deserialize)]
struct LeadDataResponse {
	response: String,
	request_id: String,
}

/// Reads a success body, requiring the `ok` marker and the submitted request ID.
pub fn resolve_lead_data_response(body: &[u8], request_id: &RequestId) -> Result<()> {
	let malformed = ErrorCode::INVALID_LEAD_DATA_RESPONSE_FORMAT;
	let response = serde_json::from_slice::<LeadDataResponse>(body).map_err(|_| malformed)?;

	if response.response != ACCEPTED_MARKER || response.request_id != request_id.as_str() {
		return Err(malformed);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn accepted_response_with_matching_id_succeeds() {
		let request_id = RequestId::new("R");

		assert_eq!(
			resolve_lead_data_response(br#"{"response":"ok","request_id":"R"}"#, &request_id),
			Ok(())
		);
	}

	#[test]
	fn mismatches_are_malformed() {
		let request_id = RequestId::new("R");

		for body in [
			&br#"{"response":"ok","request_id":"OTHER"}"#[..],
			br#"{"response":"pending","request_id":"R"}"#,
			br#"{"request_id":"R"}"#,
			b"Invalid JSON",
		] {
			assert_eq!(
				resolve_lead_data_response(body, &request_id),
				Err(ErrorCode::INVALID_LEAD_DATA_RESPONSE_FORMAT)
			);
		}
	}

	#[test]
	fn payload_serializes_expected_fields() {
		let full_data = serde_json::json!({ "income": 15000 });
		let request_id = RequestId::new("R");
		let payload =
			serde_json::to_value(LeadDataPayload { full_data: &full_data, request_id: &request_id })
				.expect("Payload should serialize.");

		assert_eq!(
			payload,
			serde_json::json!({ "full_data": { "income": 15000 }, "request_id": "R" })
		);
	}

	#[test]
	fn error_table_distinguishes_combined_failures() {
		assert_eq!(LEAD_DATA_ERRORS.len(), 9);
		assert_eq!(
			LEAD_DATA_ERRORS.get("Request not found"),
			Some(&ErrorCode::REQUEST_ID_NOT_FOUND)
		);
		assert_eq!(
			LEAD_DATA_ERRORS.get("request_id is missing, full_data is invalid"),
			Some(&ErrorCode::MISSING_REQUEST_ID_INVALID_FULL_DATA)
		);
	}
}
