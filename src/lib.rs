//! Delegated-authentication adapter for the UNLOQ UAuth service—HMAC-signed API dispatch,
//! redirect/logout URL builders, and a callback-validation middleware seam in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod callback;
pub mod config;
pub mod error;
pub mod http;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{api::UAuthClient, config::UAuthConfig, http::ReqwestApiClient};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = UAuthClient<ReqwestApiClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_api_client() -> ReqwestApiClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestApiClient::with_client(client)
	}

	/// Constructs a [`UAuthClient`] pointed at `base_url` with the provided credentials and the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestClient {
		let url = Url::parse(base_url).expect("Failed to parse test base URL.");
		let config = UAuthConfig::new(client_id, client_secret).with_url(url);

		UAuthClient::with_http_client(config, test_reqwest_api_client())
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	use super::_preludet::{ReqwestTestClient, build_reqwest_test_client};

	#[test]
	fn test_client_fixture_wires_credentials_and_base() {
		let client: ReqwestTestClient =
			build_reqwest_test_client("https://127.0.0.1:8443/v2", "cid", "cs");

		assert_eq!(client.config.url.as_str(), "https://127.0.0.1:8443/v2");
		assert_eq!(client.config.client_id, "cid");
		assert!(!format!("{:?}", client.config).contains("cs"));
	}
}
