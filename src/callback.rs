//! Callback validation: exchanges a one-time inbound token for a user record.
//!
//! The validator is the adapter's half of the host framework's `uauth.callback`
//! authorization check. Per inbound request there are three outcomes: a missing token
//! fails immediately with a 401 carrying the redirect hint; a present token is exchanged
//! via `auth.token` and either attaches the user record to the request context or fails;
//! exchange failures outside the `AUTH` namespace are normalized so remote internals
//! never leak to the end user.

// crates.io
use serde_json::{Map, Value, json};
// self
use crate::{
	_prelude::*,
	api::{RequestType, UAuthClient},
	error::AuthError,
	http::ApiHttpClient,
};

/// Input declared by the `callback` authorization check: one optional `token` string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CallbackInput {
	/// One-time token from the URL query; defaults to absent.
	#[serde(default)]
	pub token: Option<String>,
}
impl CallbackInput {
	/// Wraps a present token value.
	pub fn with_token(token: impl Into<String>) -> Self {
		Self { token: Some(token.into()) }
	}
}

/// User record returned by the remote exchange.
///
/// Owned by the remote service: the adapter requires only that `email` is a non-empty
/// string and passes every other field through untouched.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);
impl UserRecord {
	/// Accepts the raw exchange result when it is an object carrying a non-empty `email`.
	pub fn from_result(value: Value) -> Option<Self> {
		let Value::Object(fields) = value else { return None };

		match fields.get("email") {
			Some(Value::String(email)) if !email.is_empty() => Some(Self(fields)),
			_ => None,
		}
	}

	/// Returns the user's email address; non-empty for every constructed record.
	pub fn email(&self) -> &str {
		self.0.get("email").and_then(Value::as_str).unwrap_or_default()
	}

	/// Returns every remote-supplied field.
	pub fn fields(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the record into its raw JSON object form.
	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}
}

/// Host-framework seam for the per-request data store.
///
/// On success the validator writes exactly one field: the user record under the `user`
/// key. Implementations map that write onto whatever context type the host dispatch
/// framework provides; the adapter performs no other context mutation.
pub trait RequestContext {
	/// Attaches the validated user record under the `user` key.
	fn set_user(&mut self, user: UserRecord);
}

/// Validates callback requests by exchanging the one-time token for a user record.
///
/// Each invocation is independent; the only shared state is the read-only configuration
/// and the stateless transport inside [`UAuthClient`], so concurrent requests need no
/// synchronization.
#[derive(Clone)]
pub struct CallbackValidator<C>
where
	C: ?Sized + ApiHttpClient,
{
	client: Arc<UAuthClient<C>>,
}
impl<C> CallbackValidator<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Name under which the host framework registers this authorization check.
	pub const NAME: &'static str = "uauth.callback";

	/// Creates a validator over a shared API client.
	pub fn new(client: impl Into<Arc<UAuthClient<C>>>) -> Self {
		Self { client: client.into() }
	}

	/// Runs the validation sequence for one inbound request.
	///
	/// On success the request context carries the user record and the pipeline may
	/// continue; on failure the pipeline short-circuits with an auth-namespace error
	/// carrying the redirect hint.
	pub async fn authorize(
		&self,
		input: &CallbackInput,
		ctx: &mut dyn RequestContext,
	) -> Result<()> {
		let hint = self.redirect_hint();
		let Some(token) = input.token.as_deref().filter(|token| !token.is_empty()) else {
			return Err(AuthError::missing_token(hint).into());
		};

		match self.client.dispatch(RequestType::AuthToken, json!({ "token": token })).await {
			Ok(result) => {
				let Some(user) = UserRecord::from_result(result) else {
					return Err(AuthError::invalid_user(hint).into());
				};

				ctx.set_user(user);

				Ok(())
			},
			Err(e) => Err(normalize(e, hint)),
		}
	}

	fn redirect_hint(&self) -> String {
		self.client.redirect_url(&BTreeMap::new())
	}
}
impl<C> Debug for CallbackValidator<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackValidator").field("client", &self.client).finish()
	}
}

/// Applies the error policy for failed exchanges.
///
/// Server-side failures (status >= 500) are logged as a warning with detail at debug
/// level. Auth-namespace errors pass through verbatim; everything else is rewrapped into
/// the generic normalized form so remote internals stay hidden.
fn normalize(e: Error, hint: String) -> Error {
	if e.status().is_some_and(|status| status >= 500) {
		tracing::warn!("Could not perform uauth callback on token.");
		tracing::debug!(error = ?e, "Callback exchange failure detail.");
	}

	if e.category().is_auth_namespace() { e } else { AuthError::normalized(hint).into() }
}
