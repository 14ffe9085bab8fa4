//! Client configuration loaded from JSON documents or the process environment.

// std
use std::env;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret},
	cache::DEFAULT_RENEWAL_THRESHOLD,
	error::ConfigError,
};

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "KUESKI_API_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "KUESKI_API_KEY";
/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "KUESKI_SECRET_KEY";
/// Optional environment variable overriding the renewal threshold, in seconds.
pub const ENV_RENEWAL_THRESHOLD_SECS: &str = "KUESKI_RENEWAL_THRESHOLD_SECS";

/// Everything needed to construct a [`Client`](crate::client::Client).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
	/// API base URL, e.g. `https://api.example.com`.
	pub base_url: String,
	/// Public API key.
	pub api_key: String,
	/// Signing secret; redacted from formatting.
	pub secret_key: TokenSecret,
	/// Renewal threshold override in seconds; the ten-minute default applies when absent.
	#[serde(default)]
	pub renewal_threshold_secs: Option<u64>,
}
impl ClientConfig {
	/// Parses a JSON document, reporting the path of the offending field on failure.
	pub fn from_json(document: &str) -> Result<Self, ConfigError> {
		let deserializer = &mut serde_json::Deserializer::from_str(document);

		Ok(serde_path_to_error::deserialize(deserializer)?)
	}

	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which maps a variable name to its value.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingEnv { name });
		let renewal_threshold_secs = lookup(ENV_RENEWAL_THRESHOLD_SECS)
			.map(|raw| {
				raw.trim()
					.parse::<u64>()
					.ok()
					.filter(|secs| i64::try_from(*secs).is_ok())
					.ok_or(ConfigError::InvalidEnv { name: ENV_RENEWAL_THRESHOLD_SECS })
			})
			.transpose()?;

		Ok(Self {
			base_url: required(ENV_API_URL)?,
			api_key: required(ENV_API_KEY)?,
			secret_key: TokenSecret::new(required(ENV_SECRET_KEY)?),
			renewal_threshold_secs,
		})
	}

	/// Parses and validates the base URL.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
			url: self.base_url.clone(),
			source: Some(e),
		})
	}

	/// Builds the credential pair, rejecting empty values.
	pub fn credentials(&self) -> Result<Credentials, ConfigError> {
		Credentials::new(self.api_key.clone(), self.secret_key.expose())
	}

	/// Effective renewal threshold, rejecting values beyond `i64::MAX` seconds.
	pub fn renewal_threshold(&self) -> Result<Duration, ConfigError> {
		let Some(secs) = self.renewal_threshold_secs else {
			return Ok(DEFAULT_RENEWAL_THRESHOLD);
		};

		i64::try_from(secs)
			.map(Duration::seconds)
			.map_err(|_| ConfigError::InvalidRenewalThreshold { secs })
	}
}
