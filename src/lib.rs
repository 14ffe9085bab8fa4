//! Async client for the Kueski affiliates lending API: signed bootstrap authentication,
//! single-flight bearer-token caching, and a typed error taxonomy for lead evaluation.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod lead;
pub mod obs;
pub mod resolve;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		auth::Credentials,
		client::Client,
		clock::FixedClock,
		http::{Headers, HttpResponse, HttpTransport, TransportFuture},
	};

	/// Instant reported by the clock of [`build_recording_client`].
	pub const TEST_NOW: OffsetDateTime = time::macros::datetime!(2024-05-01 12:00:00 UTC);
	/// Base URL used by [`build_recording_client`].
	pub const TEST_BASE_URL: &str = "https://affiliates.test";

	/// Client type alias backed by [`RecordingTransport`].
	pub type RecordingClient = Client<RecordingTransport>;

	/// Failure returned by [`RecordingTransport`] for routes scripted to fail.
	#[derive(Debug, ThisError)]
	#[error("Scripted transport failure.")]
	pub struct ScriptedFailure;

	/// Request captured by [`RecordingTransport`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// Target URL.
		pub url: Url,
		/// Sent headers.
		pub headers: Headers,
		/// Sent body.
		pub body: Vec<u8>,
	}
	impl RecordedRequest {
		/// Path of the target URL without the leading slash.
		pub fn path(&self) -> &str {
			self.url.path().trim_start_matches('/')
		}
	}

	#[derive(Clone)]
	enum Scripted {
		Respond(HttpResponse),
		Fail,
	}

	/// In-memory transport answering from per-path scripts and recording every request.
	///
	/// Each path holds a queue of scripted answers; the last one repeats once the queue drains.
	/// Unscripted paths answer `404` with an empty body.
	#[derive(Default)]
	pub struct RecordingTransport {
		scripts: Mutex<BTreeMap<String, VecDeque<Scripted>>>,
		requests: Mutex<Vec<RecordedRequest>>,
	}
	impl RecordingTransport {
		/// Queues a response for `path`.
		pub fn respond(&self, path: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
			self.push(path, Scripted::Respond(HttpResponse::new(status, body)))
		}

		/// Queues a transport failure for `path`.
		pub fn fail(&self, path: &str) -> &Self {
			self.push(path, Scripted::Fail)
		}

		/// Returns every request seen so far.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}

		/// Counts the requests sent to `path`.
		pub fn calls(&self, path: &str) -> usize {
			self.requests().iter().filter(|request| request.path() == path).count()
		}

		fn push(&self, path: &str, scripted: Scripted) -> &Self {
			self.scripts.lock().entry(path.to_owned()).or_default().push_back(scripted);

			self
		}

		fn next(&self, path: &str) -> Option<Scripted> {
			let mut scripts = self.scripts.lock();
			let queue = scripts.get_mut(path)?;

			if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
		}
	}
	impl HttpTransport for RecordingTransport {
		type TransportError = ScriptedFailure;

		fn post<'a>(
			&'a self,
			url: &'a Url,
			headers: &'a Headers,
			body: Vec<u8>,
		) -> TransportFuture<'a, Self::TransportError> {
			let request = RecordedRequest { url: url.clone(), headers: headers.clone(), body };
			let scripted = self.next(request.path());

			self.requests.lock().push(request);

			Box::pin(async move {
				match scripted {
					Some(Scripted::Respond(response)) => Ok(response),
					Some(Scripted::Fail) => Err(ScriptedFailure),
					None => Ok(HttpResponse::new(404, Vec::new())),
				}
			})
		}
	}

	/// Renders a bootstrap success body expiring at `expires_at`.
	pub fn authenticate_body(token: &str, expires_at: OffsetDateTime) -> String {
		serde_json::json!({ "token": token, "expiration": expires_at.unix_timestamp() })
			.to_string()
	}

	/// Builds a client over `transport` whose clock is pinned to [`TEST_NOW`].
	pub fn build_recording_client(transport: Arc<RecordingTransport>) -> RecordingClient {
		let base_url = Url::parse(TEST_BASE_URL).expect("Test base URL should parse.");
		let credentials =
			Credentials::new("apikey", "secretkey").expect("Test credentials should build.");

		Client::with_transport(&base_url, credentials, transport)
			.expect("Test client should build.")
			.with_clock(Arc::new(FixedClock(TEST_NOW)))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{ErrorCode, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
