//! Transport primitives for UAuth API dispatch.
//!
//! The module exposes [`ApiHttpClient`] as the adapter's only dependency on an HTTP stack.
//! Implementations perform exactly one POST round trip per call and surface failures as
//! [`TransportError`] values; envelope decoding stays in the [`api`](crate::api) layer so
//! transports never interpret response bodies.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// One outbound UAuth API call handed to the transport.
#[derive(Clone, Debug)]
pub struct ApiCall {
	/// Fully resolved endpoint URL.
	pub url: Url,
	/// Freshly generated Signed Token for the `Authorization` header.
	pub authorization: String,
	/// JSON envelope body (`{"type", "payload"}`).
	pub body: serde_json::Value,
}

/// Raw transport response: HTTP status plus undecoded body bytes.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}

/// Future type returned by [`ApiHttpClient::execute`].
pub type ApiFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing UAuth API dispatches.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across
/// concurrent requests behind an `Arc` without additional wrappers; the adapter holds no
/// per-call transport state, matching the one-round-trip contract (no retries, no
/// backoff, no internal timeout).
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a single POST round trip and returns the raw response.
	fn execute(&self, call: ApiCall) -> ApiFuture<'_>;
}

#[cfg(feature = "reqwest")]
/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestApiClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestApiClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestApiClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestApiClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestApiClient {
	fn execute(&self, call: ApiCall) -> ApiFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(call.url)
				.header("Authorization", call.authorization)
				.json(&call.body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
