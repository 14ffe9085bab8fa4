//! Transport primitives for affiliates API calls.
//!
//! The module exposes [`HttpTransport`], the client's only dependency on an HTTP stack, along
//! with the [`HttpResponse`] value it produces. Every call the client makes is a `POST` with a
//! small header map and a JSON (or empty) body, so the contract is deliberately narrow: send the
//! request, hand back the status code and the fully-read body. Deadlines, proxies, and TLS
//! configuration belong to the transport implementation.

// self
use crate::_prelude::*;

/// Header names used by the affiliates API.
pub mod header {
	/// `Authorization` header.
	pub const AUTHORIZATION: &str = "Authorization";
	/// `Content-MD5` header.
	pub const CONTENT_MD5: &str = "Content-MD5";
	/// `Content-Type` header.
	pub const CONTENT_TYPE: &str = "Content-Type";
	/// `Date` header.
	pub const DATE: &str = "Date";
	/// Media type of every request body.
	pub const APPLICATION_JSON: &str = "application/json";
}

/// Ordered header map attached to an outbound request.
pub type Headers = BTreeMap<String, String>;

/// Boxed future returned by [`HttpTransport::post`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of issuing the client's `POST` calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// clone of a [`Client`](crate::client::Client) and by concurrent callers. The returned future
/// must own whatever it needs from the transport so it stays `Send` across executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends a `POST` to `url` with `headers` and `body`, returning the status and full body.
	fn post<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a Headers,
		body: Vec<u8>,
	) -> TransportFuture<'a, Self::TransportError>;
}

/// Status code and body returned by the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn post<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a Headers,
		body: Vec<u8>,
	) -> TransportFuture<'a, Self::TransportError> {
		let request = headers
			.iter()
			.fold(self.0.post(url.clone()), |builder, (name, value)| builder.header(name, value))
			.body(body);

		Box::pin(async move {
			let response = request.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn response_constructor_accepts_str_bodies() {
		let response = HttpResponse::new(200, "{}");

		assert_eq!(response.status, 200);
		assert_eq!(response.body, b"{}".to_vec());
	}
}
