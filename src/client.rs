//! Affiliates API client: construction, bootstrap authentication, and the lead pipeline.

pub mod bootstrap;
pub mod pipeline;

pub use bootstrap::*;

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	cache::TokenCache,
	clock::{Clock, SystemClock},
	config::ClientConfig,
	error::ConfigError,
	http::HttpTransport,
	lead::{LEAD_DATA, LEAD_EVALUATION, LeadValidator, StandardValidator},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport and standard validators.
pub type DefaultClient = Client<ReqwestTransport, StandardValidator>;

/// Absolute URLs of every endpoint the client calls, resolved once at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Bootstrap authentication endpoint.
	pub authenticate: Url,
	/// Lead evaluation endpoint.
	pub lead_evaluation: Url,
	/// Lead data endpoint.
	pub lead_data: Url,
}
impl Endpoints {
	/// Resolves every endpoint against `base_url`.
	///
	/// Paths are appended as `<base>/<path>` so a base URL carrying its own path prefix keeps it
	/// regardless of a trailing slash.
	pub fn new(base_url: &Url) -> Result<Self, ConfigError> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { url: base_url.to_string(), source: None });
		}

		let join = |path: &str| {
			let raw = format!("{}/{path}", base_url.as_str().trim_end_matches('/'));

			Url::parse(&raw)
				.map_err(|e| ConfigError::InvalidBaseUrl { url: raw, source: Some(e) })
		};

		Ok(Self {
			authenticate: join(AUTHENTICATE_PATH)?,
			lead_evaluation: join(LEAD_EVALUATION.path)?,
			lead_data: join(LEAD_DATA.path)?,
		})
	}
}

/// Coordinates authenticated calls against the affiliates API.
///
/// The client owns the transport, the validator, the credentials, and the shared
/// [`TokenCache`]. Clones share the transport and the cache, so one client can serve any number
/// of concurrent callers while at most one bootstrap call is in flight.
pub struct Client<T, V = StandardValidator>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	/// HTTP transport used for every outbound request.
	pub transport: Arc<T>,
	/// Validator applied before any network call.
	pub validator: Arc<V>,
	/// Resolved endpoint URLs.
	pub endpoints: Endpoints,
	credentials: Credentials,
	clock: Arc<dyn Clock>,
	token_cache: Arc<TokenCache>,
}
impl<T> Client<T, StandardValidator>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		base_url: &Url,
		credentials: Credentials,
		transport: impl Into<Arc<T>>,
	) -> Result<Self, ConfigError> {
		let clock: Arc<dyn Clock> = Arc::new(SystemClock);

		Ok(Self {
			transport: transport.into(),
			validator: Arc::new(StandardValidator),
			endpoints: Endpoints::new(base_url)?,
			credentials,
			token_cache: Arc::new(TokenCache::new().with_clock(clock.clone())),
			clock,
		})
	}

	/// Creates a client from a [`ClientConfig`] and a caller-provided transport.
	pub fn from_config_with_transport(
		config: &ClientConfig,
		transport: impl Into<Arc<T>>,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_transport(&config.base_url()?, config.credentials()?, transport)?
			.with_renewal_threshold(config.renewal_threshold()?))
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport, StandardValidator> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(
		base_url: &str,
		api_key: impl Into<String>,
		secret_key: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
			url: base_url.to_owned(),
			source: Some(e),
		})?;

		Self::with_transport(
			&url,
			Credentials::new(api_key, secret_key)?,
			ReqwestTransport::with_client(ReqwestClient::builder().build()?),
		)
	}

	/// Creates a reqwest-backed client from a [`ClientConfig`].
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		Self::from_config_with_transport(
			config,
			ReqwestTransport::with_client(ReqwestClient::builder().build()?),
		)
	}
}
impl<T, V> Client<T, V>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	/// Replaces the lead validator.
	pub fn with_validator<W>(self, validator: W) -> Client<T, W>
	where
		W: LeadValidator,
	{
		Client {
			transport: self.transport,
			validator: Arc::new(validator),
			endpoints: self.endpoints,
			credentials: self.credentials,
			clock: self.clock,
			token_cache: self.token_cache,
		}
	}

	/// Overrides the token renewal threshold.
	///
	/// Installs a fresh, empty cache; configure the client before its first call.
	pub fn with_renewal_threshold(mut self, threshold: Duration) -> Self {
		self.token_cache = Arc::new(
			TokenCache::new().with_clock(self.clock.clone()).with_renewal_threshold(threshold),
		);

		self
	}

	/// Overrides the clock used for HTTP dates and token freshness.
	///
	/// Installs a fresh, empty cache; configure the client before its first call.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		let threshold = self.token_cache.renewal_threshold();

		self.token_cache =
			Arc::new(TokenCache::new().with_clock(clock.clone()).with_renewal_threshold(threshold));
		self.clock = clock;

		self
	}

	/// Returns the client credentials.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns the shared token cache.
	pub fn token_cache(&self) -> &TokenCache {
		&self.token_cache
	}
}
impl<T, V> Clone for Client<T, V>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			validator: Arc::clone(&self.validator),
			endpoints: self.endpoints.clone(),
			credentials: self.credentials.clone(),
			clock: Arc::clone(&self.clock),
			token_cache: Arc::clone(&self.token_cache),
		}
	}
}
impl<T, V> Debug for Client<T, V>
where
	T: ?Sized + HttpTransport,
	V: LeadValidator,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoints", &self.endpoints)
			.field("credentials", &self.credentials)
			.field("token_cache", &self.token_cache)
			.finish()
	}
}
