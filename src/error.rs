//! Adapter-level error types shared across signing, dispatch, and callback validation.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
///
/// Every variant carries an explicit [`ErrorCategory`]; callback normalization matches on
/// that discriminant rather than inspecting message strings.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local credential-configuration failure (`AUTH.API`); raised before any network call.
	#[error("Could not initiate authentication request.")]
	Api,
	/// User-facing authentication failure within the `AUTH` namespace.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Remote API error outside the `AUTH` namespace, carried through from the envelope.
	#[error(transparent)]
	Remote(#[from] RemoteError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Startup configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Remote API responded with an envelope that could not be parsed.
	#[error("Remote API returned a malformed response envelope.")]
	EnvelopeParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the unparseable response.
		status: u16,
	},
}
impl Error {
	/// Returns the category discriminant used by callback normalization.
	pub const fn category(&self) -> ErrorCategory {
		match self {
			Self::Api => ErrorCategory::Api,
			Self::Auth(_) => ErrorCategory::Auth,
			Self::Remote(_) => ErrorCategory::Remote,
			Self::Transport(_) => ErrorCategory::Transport,
			Self::Config(_) => ErrorCategory::Config,
			Self::EnvelopeParse { .. } => ErrorCategory::Envelope,
		}
	}

	/// Returns the HTTP status attached to the failure, when one exists.
	pub const fn status(&self) -> Option<u16> {
		match self {
			Self::Auth(inner) => Some(inner.status),
			Self::Remote(inner) => Some(inner.status),
			Self::EnvelopeParse { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Category discriminant attached to every [`Error`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
	/// Local credential-configuration failure (`AUTH.API`).
	Api,
	/// `AUTH`-namespace failure surfaced to end users.
	Auth,
	/// Remote envelope error outside the `AUTH` namespace.
	Remote,
	/// Network or IO failure from the HTTP transport.
	Transport,
	/// Startup configuration failure.
	Config,
	/// Malformed remote response envelope.
	Envelope,
}
impl ErrorCategory {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorCategory::Api => "api",
			ErrorCategory::Auth => "auth",
			ErrorCategory::Remote => "remote",
			ErrorCategory::Transport => "transport",
			ErrorCategory::Config => "config",
			ErrorCategory::Envelope => "envelope",
		}
	}

	/// Whether the category belongs to the remote service's `AUTH` namespace.
	///
	/// Auth-namespace failures pass through callback normalization verbatim; every other
	/// category is rewrapped into a generic [`AuthError::normalized`].
	pub const fn is_auth_namespace(self) -> bool {
		matches!(self, ErrorCategory::Api | ErrorCategory::Auth)
	}
}
impl Display for ErrorCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// `AUTH`-namespace failure surfaced to end users.
///
/// Serializes in the shape the host dispatch framework expects: `code`, `message`,
/// `statusCode`, and the optional redirect hint under `url`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
#[error("{message}")]
pub struct AuthError {
	/// Full error code within the `AUTH` namespace, e.g. `AUTH.ERROR`.
	pub code: String,
	/// Human-readable message safe to show to the end user.
	pub message: String,
	/// HTTP status attached to the failure.
	#[serde(rename = "statusCode")]
	pub status: u16,
	/// Redirect hint so the caller can restart authentication.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}
impl AuthError {
	const CODE: &'static str = "AUTH.ERROR";
	const STATUS: u16 = 401;

	/// The inbound request carried no callback token.
	pub fn missing_token(redirect: impl Into<String>) -> Self {
		Self {
			code: Self::CODE.into(),
			message: "Authentication token is missing from URL.".into(),
			status: Self::STATUS,
			url: Some(redirect.into()),
		}
	}

	/// The remote exchange succeeded but returned no usable user record.
	pub fn invalid_user(redirect: impl Into<String>) -> Self {
		Self {
			code: Self::CODE.into(),
			message: "User information could not be retrieved.".into(),
			status: Self::STATUS,
			url: Some(redirect.into()),
		}
	}

	/// Generic rewrap applied to non-auth-namespace failures so remote internals never
	/// leak to the end user.
	pub fn normalized(redirect: impl Into<String>) -> Self {
		Self {
			code: Self::CODE.into(),
			message: "An error occurred while authenticating you.".into(),
			status: Self::STATUS,
			url: Some(redirect.into()),
		}
	}
}

/// Error envelope entry outside the `AUTH` namespace, preserved as received.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Remote API call failed with `{code}`: {message}")]
pub struct RemoteError {
	/// Remote error code, e.g. `GLOBAL.ERROR`.
	pub code: String,
	/// HTTP status attached by the remote service.
	pub status: u16,
	/// Remote-supplied message.
	pub message: String,
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Client identifier was absent or empty.
	#[error("Missing Client ID.")]
	MissingClientId,
	/// Client secret was absent or empty.
	#[error("Missing Client Secret.")]
	MissingClientSecret,
	/// Remote base URL cannot be combined with an API path.
	#[error("Remote base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the UAuth API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the UAuth API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
