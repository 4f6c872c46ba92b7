//! UAuth API client: signed dispatch, best-effort logout, and redirect/logout URL builders.
//!
//! Every outbound call carries an `Authorization` header equal to a freshly generated
//! Signed Token; no token is ever reused or cached. The wire envelope follows the host
//! framework's fetcher protocol: requests POST `{"type", "payload"}` to `{base}/api`, and
//! responses carry either `{"result"}` or `{"error": {"code", "ns", "message",
//! "statusCode"}}`.

// crates.io
use serde_json::{Value, json};
// self
use crate::{
	_prelude::*,
	auth::TokenSigner,
	config::UAuthConfig,
	error::{AuthError, ConfigError, RemoteError},
	http::{ApiCall, ApiHttpClient, ApiResponse},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestApiClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestUAuthClient = UAuthClient<ReqwestApiClient>;

/// Remote operation types consumed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RequestType {
	/// Exchange a one-time callback token for a user record.
	#[serde(rename = "auth.token")]
	AuthToken,
	/// Notify the service that a user's sessions should be terminated.
	#[serde(rename = "auth.logout")]
	AuthLogout,
}
impl RequestType {
	/// Returns the wire name of the operation.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestType::AuthToken => "auth.token",
			RequestType::AuthLogout => "auth.logout",
		}
	}
}
impl Display for RequestType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
	#[serde(default)]
	code: String,
	#[serde(default)]
	ns: Option<String>,
	#[serde(default)]
	message: String,
	#[serde(default, rename = "statusCode")]
	status_code: Option<u16>,
}
impl EnvelopeError {
	fn namespace(&self) -> &str {
		self.ns.as_deref().unwrap_or_else(|| self.code.split('.').next().unwrap_or(""))
	}

	fn into_error(self, http_status: u16) -> Error {
		let status = self.status_code.unwrap_or(http_status);

		if self.namespace() == "AUTH" {
			Error::Auth(AuthError { code: self.code, message: self.message, status, url: None })
		} else {
			Error::Remote(RemoteError { code: self.code, status, message: self.message })
		}
	}
}

/// Client for the UAuth remote API.
///
/// Stateless per call: the configuration is immutable, the transport holds no per-call
/// state, and every dispatch signs a fresh token, so one instance serves concurrent
/// requests without locks.
#[derive(Clone)]
pub struct UAuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Immutable adapter configuration.
	pub config: Arc<UAuthConfig>,
	/// Transport used for every outbound API call.
	pub http_client: Arc<C>,
	signer: TokenSigner,
}
impl<C> UAuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: UAuthConfig, http_client: impl Into<Arc<C>>) -> Self {
		let signer = TokenSigner::new(config.client_id.clone(), config.client_secret.clone());

		Self { config: Arc::new(config), http_client: http_client.into(), signer }
	}

	/// Returns a freshly generated Signed Token for the `Authorization` header.
	pub fn authorization_token(&self) -> String {
		self.signer.authorization_token()
	}

	/// Dispatches `request` with `payload` to the remote API.
	///
	/// Refuses with the `AUTH.API` category before any network activity when either half
	/// of the client credential is empty. Otherwise performs a single round trip with no
	/// retries; the successful envelope's `result` value is returned as-is.
	pub async fn dispatch(&self, request: RequestType, payload: Value) -> Result<Value> {
		if !self.config.has_credentials() {
			tracing::warn!(request = %request, "Failed to perform call, no credentials given.");

			return Err(Error::Api);
		}

		let url = self.endpoint("/api").map_err(|source| ConfigError::InvalidBaseUrl { source })?;
		let body = json!({ "type": request, "payload": payload });
		let response = self
			.http_client
			.execute(ApiCall { url, authorization: self.signer.authorization_token(), body })
			.await?;

		decode_envelope(response)
	}

	/// Announces that the user has logged out and all their sessions should terminate.
	///
	/// Best effort by contract: the returned result is **always `Ok`**. Any dispatch
	/// failure is logged (warning with the user id, debug with the detail) and swallowed.
	pub async fn logout(&self, unloq_id: &str) -> Result<()> {
		if let Err(e) =
			self.dispatch(RequestType::AuthLogout, json!({ "unloq_id": unloq_id })).await
		{
			tracing::warn!(unloq_id, "Could not terminate all sessions of user.");
			tracing::debug!(error = ?e, "Logout dispatch failure detail.");
		}

		Ok(())
	}

	/// Builds the login redirect URL against the remote base.
	///
	/// Merges `query` with the adapter's `client_id` and applies the configured toggles:
	/// `reauth=true` and `switch=organization` are injected unless the caller already set
	/// them. Caller-supplied `client_id` and `token` keys are always stripped.
	pub fn redirect_url(&self, query: &BTreeMap<String, String>) -> String {
		let mut merged = query.clone();

		if self.config.reauth {
			merged.entry("reauth".into()).or_insert_with(|| "true".into());
		}
		if self.config.organization_switch {
			merged.entry("switch".into()).or_insert_with(|| "organization".into());
		}

		self.build_url("/login", &merged)
	}

	/// Builds the logout URL against the remote base; same merging policy as
	/// [`redirect_url`](Self::redirect_url) but with no toggle injection.
	pub fn logout_url(&self, query: &BTreeMap<String, String>) -> String {
		self.build_url("/logout", query)
	}

	fn build_url(&self, path: &str, query: &BTreeMap<String, String>) -> String {
		match self.try_build_url(path, query) {
			Ok(url) => url.into(),
			Err(_) => {
				// Degraded form carrying only the client identifier.
				let fallback = url::form_urlencoded::Serializer::new(String::new())
					.append_pair("client_id", &self.config.client_id)
					.finish();

				format!("{}{path}?{fallback}", self.config.url.as_str().trim_end_matches('/'))
			},
		}
	}

	/// Resolves `path` against the configured base, keeping any path the base carries.
	fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
		Url::parse(&format!("{}{path}", self.config.url.as_str().trim_end_matches('/')))
	}

	fn try_build_url(
		&self,
		path: &str,
		query: &BTreeMap<String, String>,
	) -> Result<Url, url::ParseError> {
		let mut url = self.endpoint(path)?;

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("client_id", &self.config.client_id);

			for (name, value) in query {
				if name == "client_id" || name == "token" {
					continue;
				}

				pairs.append_pair(name, value);
			}
		}

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl UAuthClient<ReqwestApiClient> {
	/// Creates a new client with the crate's default reqwest transport.
	pub fn new(config: UAuthConfig) -> Self {
		Self::with_http_client(config, ReqwestApiClient::default())
	}
}
impl<C> Debug for UAuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UAuthClient").field("config", &self.config).finish()
	}
}

fn decode_envelope(response: ApiResponse) -> Result<Value> {
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let envelope: ApiEnvelope = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::EnvelopeParse { source, status: response.status })?;

	if let Some(error) = envelope.error {
		return Err(error.into_error(response.status));
	}
	if (200..300).contains(&response.status) {
		return Ok(envelope.result.unwrap_or(Value::Null));
	}

	// Non-2xx without an error envelope still must not read as success.
	Err(RemoteError {
		code: "API.ERROR".into(),
		status: response.status,
		message: format!("Remote API returned HTTP {}.", response.status),
	}
	.into())
}
