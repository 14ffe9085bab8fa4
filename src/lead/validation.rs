//! Local lead validation run before any network call.

// crates.io
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
// self
use crate::{_prelude::*, error::ErrorCode, lead::LeadRequest};

static CURP_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new(concat!(
		r"^[A-Z]{4}\d{2}(0[1-9]|10|11|12)",
		r"(0[1-9]|[1-2][0-9]|30|31)(H|M)(AS|BC|BS|CC|CS|CH|CL|CM|DF|DG",
		r"|MC|GT|GR|HG|JC|MN|MS|NT|NL|OC|PL|QT|QR|SP|SL|SR|TC|TS|TL|VZ",
		r"|YN|ZS|NE)[B-DF-HJ-NP-TV-Z]{3}[\dA-Z]\d$",
	))
	.expect("CURP_REGEX should compile - this is a bug")
});
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new(concat!(
		r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+",
		r"@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}",
		r"[a-zA-Z0-9])?(?:\.[a-zA-Z0-9]",
		r"(?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
	))
	.expect("EMAIL_REGEX should compile - this is a bug")
});

/// Predicates applied to a lead before it is sent to the API.
///
/// The default [`full_data`](LeadValidator::full_data) hook delegates to [`encode_full_data`];
/// override it to add payload-specific checks.
pub trait LeadValidator
where
	Self: Send + Sync,
{
	/// Returns `true` if `curp` is a well-formed CURP.
	fn curp_valid(&self, curp: &str) -> bool;

	/// Returns `true` if `email` is a well-formed address.
	fn email_valid(&self, email: &str) -> bool;

	/// Checks the full data payload and returns its JSON form.
	fn full_data<D>(&self, full_data: Option<&D>) -> Result<Value>
	where
		D: ?Sized + Serialize,
	{
		encode_full_data(full_data)
	}
}

/// Validator using the CURP and e-mail formats accepted by the API.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardValidator;
impl LeadValidator for StandardValidator {
	fn curp_valid(&self, curp: &str) -> bool {
		is_valid_curp(curp)
	}

	fn email_valid(&self, email: &str) -> bool {
		is_valid_email(email)
	}
}

/// CURP format check: 4 letters, birth date, sex, state code, consonants, check digits.
pub fn is_valid_curp(curp: &str) -> bool {
	CURP_REGEX.is_match(curp)
}

/// E-mail format check.
pub fn is_valid_email(email: &str) -> bool {
	EMAIL_REGEX.is_match(email)
}

/// Serializes the full data payload, rejecting absent or `null` values.
pub fn encode_full_data<D>(full_data: Option<&D>) -> Result<Value>
where
	D: ?Sized + Serialize,
{
	let full_data = full_data.ok_or(ErrorCode::MISSING_FULL_DATA)?;

	match serde_json::to_value(full_data) {
		Ok(Value::Null) => Err(ErrorCode::MISSING_FULL_DATA),
		Ok(value) => Ok(value),
		Err(_) => Err(ErrorCode::INVALID_FULL_DATA_FORMAT),
	}
}

/// Runs every check on `request`, returning the encoded full data on success.
///
/// CURP and e-mail are checked together so a request with both fields wrong reports
/// [`ErrorCode::INVALID_CURP_AND_EMAIL`]; full data is only inspected once both pass.
pub fn validate_lead<V, D>(validator: &V, request: &LeadRequest<D>) -> Result<Value>
where
	V: ?Sized + LeadValidator,
	D: Serialize,
{
	let curp_valid = validator.curp_valid(&request.curp);
	let email_valid = validator.email_valid(&request.email);

	match (curp_valid, email_valid) {
		(false, false) => Err(ErrorCode::INVALID_CURP_AND_EMAIL),
		(false, true) => Err(ErrorCode::INVALID_CURP),
		(true, false) => Err(ErrorCode::INVALID_EMAIL),
		(true, true) => validator.full_data(request.full_data.as_ref()),
	}
}
