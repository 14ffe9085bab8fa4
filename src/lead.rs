//! Lead workflow payloads, per-endpoint error tables, and response resolvers.
//!
//! A lead goes through local validation, the evaluation endpoint (CURP + e-mail), and finally
//! the data endpoint (full payload + the request ID issued by evaluation). The HTTP plumbing for
//! those steps lives in [`crate::client`]; this module owns the pure parts.

pub mod data;
pub mod evaluation;
pub mod validation;

pub use data::*;
pub use evaluation::*;
pub use validation::*;

// self
use crate::{_prelude::*, error::ErrorCode};

/// Opaque correlation token issued by the evaluation step.
///
/// It is never parsed; the data step must send it back verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);
impl RequestId {
	/// Wraps a raw request ID.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw request ID.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for RequestId {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for RequestId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Caller-supplied lead: CURP, e-mail, and the full data payload for the second step.
#[derive(Clone, Debug)]
pub struct LeadRequest<D> {
	/// Lead CURP.
	pub curp: String,
	/// Lead e-mail.
	pub email: String,
	/// Full lead data; `None` is reported as missing.
	pub full_data: Option<D>,
}
impl<D> LeadRequest<D> {
	/// Creates a request without full data.
	pub fn new(curp: impl Into<String>, email: impl Into<String>) -> Self {
		Self { curp: curp.into(), email: email.into(), full_data: None }
	}

	/// Attaches the full data payload.
	pub fn with_full_data(mut self, full_data: D) -> Self {
		self.full_data = Some(full_data);

		self
	}
}

/// Result of [`Client::evaluate`](crate::client::Client::evaluate).
///
/// Both channels can be populated at once: duplicated or existing leads return the request ID
/// issued by the API together with an advisory [`ErrorCode`], and failures during data
/// submission keep the request ID obtained from evaluation. Callers must check `error` even when
/// `request_id` is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadOutcome {
	/// Request ID obtained so far; `None` when the pipeline stopped before evaluation succeeded.
	pub request_id: Option<RequestId>,
	/// Failure or advisory code; `None` on full success.
	pub error: Option<ErrorCode>,
}
impl LeadOutcome {
	/// Fully successful outcome.
	pub fn success(request_id: RequestId) -> Self {
		Self { request_id: Some(request_id), error: None }
	}

	/// Outcome without a request ID.
	pub fn failed(error: ErrorCode) -> Self {
		Self { request_id: None, error: Some(error) }
	}

	/// Outcome carrying both a request ID and an error.
	pub fn partial(request_id: RequestId, error: ErrorCode) -> Self {
		Self { request_id: Some(request_id), error: Some(error) }
	}

	/// Returns `true` when no error was reported.
	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}

	/// Collapses the outcome, dropping the request ID of partial results.
	pub fn into_result(self) -> Result<RequestId> {
		match (self.request_id, self.error) {
			(Some(request_id), None) => Ok(request_id),
			(_, Some(error)) => Err(error),
			(None, None) => Err(ErrorCode::GENERAL_ERROR),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn partial_outcome_keeps_both_channels() {
		let outcome = LeadOutcome::partial(RequestId::new("R"), ErrorCode::DUPLICATED_LEAD);

		assert!(!outcome.is_success());
		assert_eq!(outcome.request_id.as_ref().map(RequestId::as_str), Some("R"));
		assert_eq!(outcome.into_result(), Err(ErrorCode::DUPLICATED_LEAD));
	}

	#[test]
	fn success_outcome_converts_into_request_id() {
		let outcome = LeadOutcome::success(RequestId::new("R"));

		assert!(outcome.is_success());
		assert_eq!(outcome.into_result(), Ok(RequestId::new("R")));
		assert_eq!(LeadOutcome::default().into_result(), Err(ErrorCode::GENERAL_ERROR));
	}

	#[test]
	fn request_id_serializes_verbatim() {
		let id = RequestId::new("req-123");

		assert_eq!(
			serde_json::to_string(&id).expect("Request ID should serialize."),
			"\"req-123\""
		);
		assert_eq!(id.to_string(), "req-123");
	}
}
