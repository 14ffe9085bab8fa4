//! Lead evaluation endpoint: payload, error table, and success resolver.

// self
use crate::{
	_prelude::*,
	error::ErrorCode,
	lead::RequestId,
	resolve::{Endpoint, ErrorTable},
};

/// API error strings returned by the evaluation endpoint with HTTP 400.
pub static EVALUATION_ERRORS: ErrorTable = phf::phf_map! {
	"email is invalid, curp is missing" => ErrorCode::MISSING_CURP_INVALID_EMAIL,
	"email is invalid, curp is invalid" => ErrorCode::INVALID_CURP_AND_EMAIL,
	"email is invalid" => ErrorCode::INVALID_EMAIL,
	"email is missing, curp is missing" => ErrorCode::MISSING_CURP_AND_EMAIL,
	"email is missing, curp is invalid" => ErrorCode::MISSING_EMAIL_INVALID_CURP,
	"email is missing" => ErrorCode::MISSING_EMAIL,
	"curp is missing" => ErrorCode::MISSING_CURP,
	"curp is invalid" => ErrorCode::INVALID_CURP,
};

/// Lead evaluation endpoint.
pub static LEAD_EVALUATION: Endpoint = Endpoint {
	path: "affiliates/lead-evaluation",
	malformed_request: ErrorCode::LEAD_EVALUATION_MALFORMED_REQUEST,
	malformed_response: ErrorCode::INVALID_LEAD_EVALUATION_RESPONSE_FORMAT,
	errors: &EVALUATION_ERRORS,
};

/// Body posted to the evaluation endpoint.
#[derive(Debug, Serialize)]
pub struct EvaluationPayload<'a> {
	/// Lead CURP.
	pub curp: &'a str,
	/// Lead e-mail.
	pub email: &'a str,
}

/// Evaluation status reported by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
	/// Lead accepted for the data step.
	Approved,
	/// Lead was already submitted by this affiliate.
	Duplicated,
	/// Lead already exists in the lender's records.
	Existing,
}
impl EvaluationStatus {
	/// Advisory error carried alongside the request ID, if any.
	pub fn advisory(self) -> Option<ErrorCode> {
		match self {
			Self::Approved => None,
			Self::Duplicated => Some(ErrorCode::DUPLICATED_LEAD),
			Self::Existing => Some(ErrorCode::EXISTING_LEAD),
		}
	}
}

/// Successfully resolved evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
	/// Request ID to send with the full data.
	pub request_id: RequestId,
	/// Status reported by the API.
	pub status: EvaluationStatus,
}

#[derive(Deserialize)]
struct EvaluationResponse {
	curp: String,
	email: String,
	request_id: String,
	status: EvaluationStatus,
}

/// Reads a success body, requiring it to echo the submitted CURP and e-mail.
///
/// Any parse failure, empty request ID, echo mismatch, or status outside
/// {approved, duplicated, existing} is a malformed response.
pub fn resolve_evaluation_response(body: &[u8], curp: &str, email: &str) -> Result<Evaluation> {
	let malformed = ErrorCode::INVALID_LEAD_EVALUATION_RESPONSE_FORMAT;
	let response =
		serde_json::from_slice::<EvaluationResponse>(body).map_err(|_| malformed)?;

	if response.request_id.is_empty() || response.curp != curp || response.email != email {
		return Err(malformed);
	}

	Ok(Evaluation { request_id: RequestId::new(response.request_id), status: response.status })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const CURP: &str = "ABCD920113MSLXYZ01";
	const EMAIL: &str = "test@kueski.com";

	fn body(curp: &str, email: &str, request_id: &str, status: &str) -> Vec<u8> {
		format!(
			r#"{{"curp":"{curp}","email":"{email}","request_id":"{request_id}","status":"{status}"}}"#
		)
		.into_bytes()
	}

	#[test]
	fn approved_response_yields_request_id() {
		let evaluation =
			resolve_evaluation_response(&body(CURP, EMAIL, "R", "approved"), CURP, EMAIL)
				.expect("Approved response should resolve.");

		assert_eq!(evaluation.request_id, RequestId::new("R"));
		assert_eq!(evaluation.status.advisory(), None);
	}

	#[test]
	fn duplicated_and_existing_carry_advisories() {
		let duplicated =
			resolve_evaluation_response(&body(CURP, EMAIL, "R", "duplicated"), CURP, EMAIL)
				.expect("Duplicated response should resolve.");
		let existing = resolve_evaluation_response(&body(CURP, EMAIL, "R", "existing"), CURP, EMAIL)
			.expect("Existing response should resolve.");

		assert_eq!(duplicated.status.advisory(), Some(ErrorCode::DUPLICATED_LEAD));
		assert_eq!(existing.status.advisory(), Some(ErrorCode::EXISTING_LEAD));
		assert_eq!(existing.request_id, RequestId::new("R"));
	}

	#[test]
	fn incoherent_responses_are_malformed() {
		let malformed = Err(ErrorCode::INVALID_LEAD_EVALUATION_RESPONSE_FORMAT);

		for response in [
			body("OTHER920113MSLXYZ01", EMAIL, "R", "approved"),
			body(CURP, "other@kueski.com", "R", "approved"),
			body(CURP, EMAIL, "", "approved"),
			body(CURP, EMAIL, "R", "rejected"),
			b"Invalid JSON".to_vec(),
			br#"{"request_id":"R","status":"approved"}"#.to_vec(),
		] {
			assert_eq!(resolve_evaluation_response(&response, CURP, EMAIL), malformed);
		}
	}

	#[test]
	fn error_table_covers_every_api_string() {
		assert_eq!(EVALUATION_ERRORS.len(), 8);
		assert_eq!(
			EVALUATION_ERRORS.get("email is missing, curp is invalid"),
			Some(&ErrorCode::MISSING_EMAIL_INVALID_CURP)
		);
		assert_eq!(LEAD_EVALUATION.path, "affiliates/lead-evaluation");
	}
}
