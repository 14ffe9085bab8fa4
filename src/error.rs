//! Client-level error types: the closed API error taxonomy and construction failures.

// std
use std::borrow::Cow;
// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`ErrorCode`] by default.
pub type Result<T, E = ErrorCode> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Closed taxonomy of errors surfaced by the affiliates client.
///
/// Every failure crossing the client boundary (validation, transport, authentication, response
/// shape, business outcome) is reported as one of the associated constants below. Codes are
/// small integers with a stable symbolic [`name`](ErrorCode::name) and a human readable
/// [`description`](ErrorCode::description). Values outside the table are representable via
/// [`ErrorCode::from_code`] and render as a generic placeholder instead of failing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(u16);
impl ErrorCode {
	/// Invalid CURP.
	pub const INVALID_CURP: Self = Self(1);
	/// Invalid e-mail.
	pub const INVALID_EMAIL: Self = Self(2);
	/// Invalid CURP and e-mail.
	pub const INVALID_CURP_AND_EMAIL: Self = Self(3);
	/// Invalid full data format.
	pub const INVALID_FULL_DATA_FORMAT: Self = Self(4);
	/// Invalid request ID.
	pub const INVALID_REQUEST_ID: Self = Self(5);
	/// Invalid full data and request ID.
	pub const INVALID_FULL_DATA_AND_REQUEST_ID: Self = Self(6);
	/// Request ID not found.
	pub const REQUEST_ID_NOT_FOUND: Self = Self(7);

	/// Missing CURP.
	pub const MISSING_CURP: Self = Self(11);
	/// Missing e-mail.
	pub const MISSING_EMAIL: Self = Self(12);
	/// Missing CURP and e-mail.
	pub const MISSING_CURP_AND_EMAIL: Self = Self(13);
	/// Missing CURP and invalid e-mail.
	pub const MISSING_CURP_INVALID_EMAIL: Self = Self(14);
	/// Missing e-mail and invalid CURP.
	pub const MISSING_EMAIL_INVALID_CURP: Self = Self(15);
	/// Missing full data.
	pub const MISSING_FULL_DATA: Self = Self(16);
	/// Missing request ID.
	pub const MISSING_REQUEST_ID: Self = Self(17);
	/// Missing full data and request ID.
	pub const MISSING_FULL_DATA_AND_REQUEST_ID: Self = Self(18);
	/// Missing full data and invalid request ID.
	pub const MISSING_FULL_DATA_INVALID_REQUEST_ID: Self = Self(19);
	/// Missing request ID and invalid full data.
	pub const MISSING_REQUEST_ID_INVALID_FULL_DATA: Self = Self(20);

	/// Transport could not reach the API.
	pub const UNABLE_TO_MAKE_CONNECTION: Self = Self(21);
	/// Lead evaluation endpoint answered HTTP 500.
	pub const LEAD_EVALUATION_MALFORMED_REQUEST: Self = Self(22);
	/// Lead evaluation response did not have the expected shape.
	pub const INVALID_LEAD_EVALUATION_RESPONSE_FORMAT: Self = Self(23);
	/// Lead data endpoint answered HTTP 500.
	pub const LEAD_DATA_MALFORMED_REQUEST: Self = Self(24);
	/// Lead data response did not have the expected shape.
	pub const INVALID_LEAD_DATA_RESPONSE_FORMAT: Self = Self(25);
	/// The API returned a well-formed error string that is not in the endpoint's table.
	pub const ERROR_NOT_IDENTIFIED_FROM_API: Self = Self(26);

	/// Bootstrap authentication was rejected.
	pub const ACCESS_DENIED: Self = Self(31);
	/// Bootstrap response could not be parsed into a token and expiration.
	pub const INVALID_JWT_RESPONSE_FORMAT: Self = Self(32);
	/// Bootstrap call failed at the transport level.
	pub const UNABLE_TO_REFRESH_JWT: Self = Self(33);
	/// The API rejected the request signature.
	pub const INVALID_SIGNATURE_FORMAT: Self = Self(34);
	/// The bearer token was rejected as expired.
	pub const EXPIRED_JWT_TOKEN: Self = Self(35);

	/// Lead already exists; a request ID is still returned.
	pub const EXISTING_LEAD: Self = Self(41);
	/// Lead was submitted before; a request ID is still returned.
	pub const DUPLICATED_LEAD: Self = Self(42);

	/// Catch-all error.
	pub const GENERAL_ERROR: Self = Self(99);

	/// Every defined code, in ascending numeric order.
	pub const ALL: [Self; 31] = [
		Self::INVALID_CURP,
		Self::INVALID_EMAIL,
		Self::INVALID_CURP_AND_EMAIL,
		Self::INVALID_FULL_DATA_FORMAT,
		Self::INVALID_REQUEST_ID,
		Self::INVALID_FULL_DATA_AND_REQUEST_ID,
		Self::REQUEST_ID_NOT_FOUND,
		Self::MISSING_CURP,
		Self::MISSING_EMAIL,
		Self::MISSING_CURP_AND_EMAIL,
		Self::MISSING_CURP_INVALID_EMAIL,
		Self::MISSING_EMAIL_INVALID_CURP,
		Self::MISSING_FULL_DATA,
		Self::MISSING_REQUEST_ID,
		Self::MISSING_FULL_DATA_AND_REQUEST_ID,
		Self::MISSING_FULL_DATA_INVALID_REQUEST_ID,
		Self::MISSING_REQUEST_ID_INVALID_FULL_DATA,
		Self::UNABLE_TO_MAKE_CONNECTION,
		Self::LEAD_EVALUATION_MALFORMED_REQUEST,
		Self::INVALID_LEAD_EVALUATION_RESPONSE_FORMAT,
		Self::LEAD_DATA_MALFORMED_REQUEST,
		Self::INVALID_LEAD_DATA_RESPONSE_FORMAT,
		Self::ERROR_NOT_IDENTIFIED_FROM_API,
		Self::ACCESS_DENIED,
		Self::INVALID_JWT_RESPONSE_FORMAT,
		Self::UNABLE_TO_REFRESH_JWT,
		Self::INVALID_SIGNATURE_FORMAT,
		Self::EXPIRED_JWT_TOKEN,
		Self::EXISTING_LEAD,
		Self::DUPLICATED_LEAD,
		Self::GENERAL_ERROR,
	];

	/// Wraps a raw numeric code. Values outside the table are allowed and render as unknown.
	pub const fn from_code(code: u16) -> Self {
		Self(code)
	}

	/// Returns the underlying numeric code.
	pub const fn code(self) -> u16 {
		self.0
	}

	/// Returns `true` if the code belongs to the fixed table.
	pub fn is_defined(self) -> bool {
		self.entry().is_some()
	}

	/// Stable symbolic name, e.g. `InvalidCurp`; unknown codes render as `ResponseError(<n>)`.
	pub fn name(self) -> Cow<'static, str> {
		match self.entry() {
			Some((name, _)) => Cow::Borrowed(name),
			None => Cow::Owned(format!("ResponseError({})", self.0)),
		}
	}

	/// Human readable description; unknown codes yield `Unknown response error.`.
	pub fn description(self) -> &'static str {
		self.entry().map_or("Unknown response error.", |(_, desc)| desc)
	}

	/// Resolves a symbolic name back to its code. Undefined names yield `None`.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|code| code.entry().is_some_and(|(n, _)| n == name))
	}

	/// Returns `true` for business outcomes that still carry a usable request ID.
	pub fn is_advisory(self) -> bool {
		matches!(self, Self::DUPLICATED_LEAD | Self::EXISTING_LEAD)
	}

	fn entry(self) -> Option<(&'static str, &'static str)> {
		let entry = match self {
			Self::INVALID_CURP => ("InvalidCurp", "Invalid CURP."),
			Self::INVALID_EMAIL => ("InvalidEmail", "Invalid e-mail."),
			Self::INVALID_CURP_AND_EMAIL => ("InvalidCurpAndEmail", "Invalid CURP And e-mail."),
			Self::INVALID_FULL_DATA_FORMAT =>
				("InvalidFullDataFormat", "Invalid full data format."),
			Self::INVALID_REQUEST_ID => ("InvalidRequestID", "Invalid request ID."),
			Self::INVALID_FULL_DATA_AND_REQUEST_ID =>
				("InvalidFullDataAndRequestID", "Invalid full data And request ID."),
			Self::REQUEST_ID_NOT_FOUND => ("RequestIDNotFound", "Request ID Not Found."),
			Self::MISSING_CURP => ("MissingCurp", "Missing CURP."),
			Self::MISSING_EMAIL => ("MissingEmail", "Missing e-mail."),
			Self::MISSING_CURP_AND_EMAIL => ("MissingCurpAndEmail", "Missing CURP And e-mail."),
			Self::MISSING_CURP_INVALID_EMAIL =>
				("MissingCurpInvalidEmail", "Missing CURP and Invalid e-mail."),
			Self::MISSING_EMAIL_INVALID_CURP =>
				("MissingEmailInvalidCurp", "Missing e-mail and Invalid CURP."),
			Self::MISSING_FULL_DATA => ("MissingFullData", "Missing full data."),
			Self::MISSING_REQUEST_ID => ("MissingRequestID", "Missing request ID."),
			Self::MISSING_FULL_DATA_AND_REQUEST_ID =>
				("MissingFullDataAndRequestID", "Missing full data and request ID."),
			Self::MISSING_FULL_DATA_INVALID_REQUEST_ID =>
				("MissingFullDataInvalidRequestID", "Missing full data and Invalid request ID."),
			Self::MISSING_REQUEST_ID_INVALID_FULL_DATA =>
				("MissingRequestIDInvalidFullData", "Missing request ID and Invalid full data."),
			Self::UNABLE_TO_MAKE_CONNECTION =>
				("UnableToMakeConnection", "Unable to make connection."),
			Self::LEAD_EVALUATION_MALFORMED_REQUEST =>
				("LeadEvaluationMalformedRequest", "Lead Evaluation malformed request."),
			Self::INVALID_LEAD_EVALUATION_RESPONSE_FORMAT => (
				"InvalidLeadEvaluationResponseFormat",
				"Invalid Lead Evaluation response format.",
			),
			Self::LEAD_DATA_MALFORMED_REQUEST =>
				("LeadDataMalformedRequest", "Lead Data malformed request."),
			Self::INVALID_LEAD_DATA_RESPONSE_FORMAT =>
				("InvalidLeadDataResponseFormat", "Invalid Lead Data response format."),
			Self::ERROR_NOT_IDENTIFIED_FROM_API =>
				("ErrorNotIdentifiedFromAPI", "Error from the API is not recognized"),
			Self::ACCESS_DENIED => ("AccessDenied", "Access denied."),
			Self::INVALID_JWT_RESPONSE_FORMAT =>
				("InvalidJWTResponseFormat", "Invalid JWT response format."),
			Self::UNABLE_TO_REFRESH_JWT => ("UnableToRefreshJWT", "Unable to refresh JWT."),
			Self::INVALID_SIGNATURE_FORMAT =>
				("InvalidSignatureFormat", "Invalid Signature format."),
			Self::EXPIRED_JWT_TOKEN => ("ExpiredJWTToken", "Expired JWT token."),
			Self::EXISTING_LEAD => ("ExistingLead", "Existing Lead."),
			Self::DUPLICATED_LEAD => ("DuplicatedLead", "Duplicated Lead."),
			Self::GENERAL_ERROR => ("GeneralError", "General error."),
			_ => return None,
		};

		Some(entry)
	}
}
impl Debug for ErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ErrorCode({}, {})", self.0, self.name())
	}
}
impl Display for ErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.name())
	}
}
impl StdError for ErrorCode {}
impl From<ErrorCode> for u16 {
	fn from(code: ErrorCode) -> Self {
		code.0
	}
}

/// Construction and configuration failures raised before any API call is made.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed or cannot serve as a base.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure, if any.
		#[source]
		source: Option<url::ParseError>,
	},
	/// A required credential is empty.
	#[error("Credential `{field}` must not be empty.")]
	MissingCredential {
		/// Credential field name.
		field: &'static str,
	},
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable holds a value that cannot be parsed.
	#[error("Environment variable `{name}` holds an invalid value.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
	},
	/// The renewal threshold does not fit a signed duration.
	#[error("Renewal threshold of {secs} seconds is out of range.")]
	InvalidRenewalThreshold {
		/// Configured threshold in seconds.
		secs: u64,
	},
	/// Configuration document could not be deserialized.
	#[error("Client configuration could not be parsed.")]
	Parse(#[from] serde_path_to_error::Error<serde_json::Error>),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
