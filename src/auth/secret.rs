//! Redacted holder for the HMAC secret key and the cached bearer JWT.

// self
use crate::_prelude::*;

/// Sensitive string that signs bootstrap requests (as the secret key) or authorizes lead calls
/// (as the bearer JWT).
///
/// Formatting never prints the value; it serializes as a plain string so config documents can
/// carry the secret key directly.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn secret_key_deserializes_from_a_plain_string() {
		let secret = serde_json::from_str::<TokenSecret>("\"signing-key\"")
			.expect("Secret should deserialize.");

		assert_eq!(secret.expose(), "signing-key");
		assert_eq!(
			serde_json::to_string(&secret).expect("Secret should serialize."),
			"\"signing-key\""
		);
	}
}
