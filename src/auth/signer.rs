//! Canonical-string construction and HMAC-SHA1 signing for bootstrap authentication.
//!
//! The affiliates API authenticates the bootstrap call with an `APIAuth` header whose value is
//! `<api_key>:<base64(HMAC-SHA1(secret_key, canonical))>`. The canonical string is the
//! comma-joined tuple `METHOD,content-type,base64(MD5(body)),path,date` where the date is rendered
//! in RFC 1123 form in the GMT zone. Every byte matters: a different case, separator, or zone
//! breaks authentication on the remote side.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, auth::Credentials};

type HmacSha1 = Hmac<Sha1>;

const HTTP_DATE: &[BorrowedFormatItem<'_>] = format_description!(
	"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Failures raised while building a signature.
#[derive(Debug, ThisError)]
pub enum SignError {
	/// The date could not be rendered in HTTP format.
	#[error("Request date could not be formatted.")]
	Date(#[from] time::error::Format),
	/// The signing key was rejected by the MAC implementation.
	#[error("Signing key is not usable for HMAC-SHA1.")]
	Key(#[from] hmac::digest::InvalidLength),
}

/// Request attributes covered by the bootstrap signature.
#[derive(Clone, Debug)]
pub struct CanonicalRequest<'a> {
	/// HTTP method; uppercased when rendered.
	pub method: &'a str,
	/// Value of the `Content-Type` header.
	pub content_type: &'a str,
	/// Raw request body; only its MD5 digest is signed.
	pub body: &'a [u8],
	/// Request path, including the leading slash.
	pub path: &'a str,
	/// Instant sent in the `Date` header.
	pub date: OffsetDateTime,
}
impl<'a> CanonicalRequest<'a> {
	/// Creates a canonical request description.
	pub fn new(
		method: &'a str,
		content_type: &'a str,
		body: &'a [u8],
		path: &'a str,
		date: OffsetDateTime,
	) -> Self {
		Self { method, content_type, body, path, date }
	}

	/// Renders the comma-joined canonical string.
	pub fn to_canonical_string(&self) -> Result<String, SignError> {
		Ok(format!(
			"{},{},{},{},{}",
			self.method.to_uppercase(),
			self.content_type,
			content_md5(self.body),
			self.path,
			http_date(self.date)?,
		))
	}
}

/// Base64-encoded MD5 digest of `body`, as sent in `Content-MD5`.
pub fn content_md5(body: &[u8]) -> String {
	STANDARD.encode(Md5::digest(body))
}

/// Formats `date` as an RFC 1123 HTTP date in the GMT zone.
pub fn http_date(date: OffsetDateTime) -> Result<String, time::error::Format> {
	date.to_offset(UtcOffset::UTC).format(HTTP_DATE)
}

/// Signs `canonical` with the secret key and prefixes the API key.
pub fn sign(credentials: &Credentials, canonical: &str) -> Result<String, SignError> {
	let mut mac = HmacSha1::new_from_slice(credentials.secret_key().expose().as_bytes())?;

	mac.update(canonical.as_bytes());

	let digest = mac.finalize().into_bytes();

	Ok(format!("{}:{}", credentials.api_key(), STANDARD.encode(digest)))
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn signature_matches_known_vector() {
		let credentials =
			Credentials::new("apikey", "secretkey").expect("Credentials fixture should build.");

		assert_eq!(
			sign(&credentials, "canonical").expect("Signing should succeed."),
			"apikey:1pbKbWCwwA/cOlxtE9+9L4wp4Bc="
		);
	}

	#[test]
	fn signature_is_deterministic() {
		let credentials =
			Credentials::new("key-a", "secret-a").expect("Credentials fixture should build.");
		let first = sign(&credentials, "POST,application/json").expect("Signing should succeed.");
		let second = sign(&credentials, "POST,application/json").expect("Signing should succeed.");

		assert_eq!(first, second);
		assert!(first.starts_with("key-a:"));
	}

	#[test]
	fn canonical_string_uppercases_method_and_uses_gmt() {
		let canonical = CanonicalRequest::new(
			"posT",
			"type",
			b"content",
			"url",
			datetime!(2019-01-25 18:21:25 UTC),
		);

		assert_eq!(
			canonical.to_canonical_string().expect("Canonical string should render."),
			"POST,type,mgNkuembtIDdJeHwKEyFVQ==,url,Fri, 25 Jan 2019 18:21:25 GMT"
		);
	}

	#[test]
	fn http_date_normalizes_offsets_to_gmt() {
		let local = datetime!(2019-01-25 12:21:25 -6);

		assert_eq!(
			http_date(local).expect("Date should format."),
			"Fri, 25 Jan 2019 18:21:25 GMT"
		);
		assert_eq!(
			http_date(datetime!(2024-03-05 07:08:09 UTC)).expect("Date should format."),
			"Tue, 05 Mar 2024 07:08:09 GMT"
		);
	}

	#[test]
	fn content_md5_of_empty_body() {
		assert_eq!(content_md5(b""), "1B2M2Y8AsgTpgAmY7PhCfg==");
	}
}
