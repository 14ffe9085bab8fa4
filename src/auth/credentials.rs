//! Affiliate API credentials.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// API key + secret key pair issued to an affiliate.
///
/// The API key is a public identifier that prefixes every signature; the secret key is only
/// ever used as the HMAC key and is redacted from formatting.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	api_key: String,
	secret_key: TokenSecret,
}
impl Credentials {
	/// Builds a credential pair, rejecting empty values.
	pub fn new(
		api_key: impl Into<String>,
		secret_key: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let api_key = api_key.into();
		let secret_key = TokenSecret::new(secret_key);

		if api_key.is_empty() {
			return Err(ConfigError::MissingCredential { field: "api_key" });
		}
		if secret_key.is_empty() {
			return Err(ConfigError::MissingCredential { field: "secret_key" });
		}

		Ok(Self { api_key, secret_key })
	}

	/// Public API key.
	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	/// Signing key; callers must avoid logging it.
	pub fn secret_key(&self) -> &TokenSecret {
		&self.secret_key
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("api_key", &self.api_key)
			.field("secret_key", &self.secret_key)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_values_are_rejected() {
		assert!(matches!(
			Credentials::new("", "secret"),
			Err(ConfigError::MissingCredential { field: "api_key" })
		));
		assert!(matches!(
			Credentials::new("key", ""),
			Err(ConfigError::MissingCredential { field: "secret_key" })
		));
	}

	#[test]
	fn debug_redacts_secret_key() {
		let credentials =
			Credentials::new("public-key", "private-key").expect("Credentials should build.");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("public-key"));
		assert!(!rendered.contains("private-key"));
	}
}
