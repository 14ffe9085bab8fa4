//! Bearer token cache with a renewal window and single-flight refreshes.
//!
//! [`TokenCache::token`] holds an async mutex for the whole call, so while one caller runs the
//! bootstrap exchange every other caller waits and then observes the refreshed token instead of
//! issuing a redundant bootstrap call. A cached token is reused only while its remaining lifetime
//! is at least the renewal threshold (ten minutes by default). Failed refreshes leave the cached
//! state exactly as it was.
//!
//! Every successful refresh bumps a generation counter. A caller that queued behind an in-flight
//! refresh takes that refresh's token as long as it has not expired, even when the API issued it
//! with a lifetime already inside the renewal window.

mod metrics;

pub use metrics::CacheMetrics;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	clock::{Clock, SystemClock},
	error::ErrorCode,
	obs,
};

/// Remaining lifetime below which a cached token is refreshed.
pub const DEFAULT_RENEWAL_THRESHOLD: Duration = Duration::minutes(10);

/// Boxed future returned by [`TokenSource::request_token`].
pub type TokenSourceFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + 'a + Send>>;

/// Bootstrap collaborator that exchanges credentials for a raw `{token, expiration}` body.
///
/// Errors are already classified into the taxonomy; the cache propagates them unchanged.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Performs the bootstrap call and returns the response body.
	fn request_token(&self) -> TokenSourceFuture<'_>;
}

#[derive(Deserialize)]
struct AuthenticateResponse {
	token: String,
	expiration: i64,
}

#[derive(Clone)]
struct CachedToken {
	token: TokenSecret,
	expires_at: OffsetDateTime,
}
impl CachedToken {
	fn is_fresh(&self, now: OffsetDateTime, threshold: Duration) -> bool {
		self.expires_at - now >= threshold
	}
}

/// Holds the current bearer token and decides when it must be renewed.
pub struct TokenCache {
	state: AsyncMutex<Option<CachedToken>>,
	generation: AtomicU64,
	renewal_threshold: Duration,
	clock: Arc<dyn Clock>,
	metrics: CacheMetrics,
}
impl TokenCache {
	/// Creates an empty cache with the default renewal threshold and the system clock.
	pub fn new() -> Self {
		Self {
			state: AsyncMutex::new(None),
			generation: AtomicU64::new(0),
			renewal_threshold: DEFAULT_RENEWAL_THRESHOLD,
			clock: Arc::new(SystemClock),
			metrics: CacheMetrics::default(),
		}
	}

	/// Overrides the renewal threshold; negative values are clamped to zero.
	pub fn with_renewal_threshold(mut self, threshold: Duration) -> Self {
		self.renewal_threshold = if threshold.is_negative() { Duration::ZERO } else { threshold };

		self
	}

	/// Overrides the clock used to measure remaining token lifetime.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Returns the configured renewal threshold.
	pub fn renewal_threshold(&self) -> Duration {
		self.renewal_threshold
	}

	/// Returns the cache counters.
	pub fn metrics(&self) -> &CacheMetrics {
		&self.metrics
	}

	/// Returns the expiry of the cached token, if one is held.
	pub async fn expires_at(&self) -> Option<OffsetDateTime> {
		self.state.lock().await.as_ref().map(|cached| cached.expires_at)
	}

	/// Number of successful refreshes performed so far.
	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	/// Returns a usable bearer token, refreshing it through `source` when needed.
	pub async fn token<S>(&self, source: &S) -> Result<TokenSecret>
	where
		S: ?Sized + TokenSource,
	{
		let observed = self.generation();
		let mut state = self.state.lock().await;
		let refreshed_while_waiting = self.generation() != observed;
		let now = self.clock.now();

		if let Some(cached) = state.as_ref().filter(|cached| {
			(refreshed_while_waiting && cached.expires_at > now)
				|| cached.is_fresh(now, self.renewal_threshold)
		}) {
			self.metrics.record_hit();
			obs::trace_debug!(expires_at = %cached.expires_at, "Reusing cached bearer token.");

			return Ok(cached.token.clone());
		}

		obs::trace_debug!("Cached bearer token is missing or inside the renewal window.");

		let refreshed = match source.request_token().await.and_then(|body| parse_token(&body)) {
			Ok(refreshed) => refreshed,
			Err(e) => {
				self.metrics.record_failure();
				obs::trace_warn!(error = %e, "Bearer token refresh failed.");

				return Err(e);
			},
		};
		let token = refreshed.token.clone();

		*state = Some(refreshed);
		self.generation.fetch_add(1, Ordering::AcqRel);
		self.metrics.record_refresh();

		Ok(token)
	}
}
impl Default for TokenCache {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("renewal_threshold", &self.renewal_threshold)
			.field("metrics", &self.metrics)
			.finish()
	}
}

fn parse_token(body: &[u8]) -> Result<CachedToken> {
	let de = &mut serde_json::Deserializer::from_slice(body);
	let response: AuthenticateResponse = serde_path_to_error::deserialize(de).map_err(|_e| {
		obs::trace_warn!(path = %_e.path(), "Bootstrap response could not be parsed.");

		ErrorCode::INVALID_JWT_RESPONSE_FORMAT
	})?;

	if response.token.is_empty() {
		return Err(ErrorCode::INVALID_JWT_RESPONSE_FORMAT);
	}

	let expires_at = OffsetDateTime::from_unix_timestamp(response.expiration)
		.map_err(|_| ErrorCode::INVALID_JWT_RESPONSE_FORMAT)?;

	Ok(CachedToken { token: TokenSecret::new(response.token), expires_at })
}
