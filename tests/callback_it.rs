// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// self
use uauth_adapter::{
	api::UAuthClient,
	callback::{CallbackInput, CallbackValidator, RequestContext, UserRecord},
	config::UAuthConfig,
	error::{Error, ErrorCategory, TransportError},
	http::{ApiCall, ApiFuture, ApiHttpClient, ApiResponse},
};

const CLIENT_ID: &str = "callback-client";
const CLIENT_SECRET: &str = "callback-secret";

/// Transport stub that replays one canned response and counts invocations.
#[derive(Clone)]
struct CannedHttpClient {
	status: u16,
	body: String,
	calls: Arc<AtomicUsize>,
}
impl CannedHttpClient {
	fn new(status: u16, body: &str) -> Self {
		Self { status, body: body.to_owned(), calls: Arc::new(AtomicUsize::new(0)) }
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl ApiHttpClient for CannedHttpClient {
	fn execute(&self, _call: ApiCall) -> ApiFuture<'_> {
		let status = self.status;
		let body = self.body.clone().into_bytes();
		let calls = self.calls.clone();

		Box::pin(async move {
			calls.fetch_add(1, Ordering::SeqCst);

			Ok(ApiResponse { status, body })
		})
	}
}

/// Transport stub that always fails at the network layer.
#[derive(Clone)]
struct UnreachableNetworkClient;
impl ApiHttpClient for UnreachableNetworkClient {
	fn execute(&self, _call: ApiCall) -> ApiFuture<'_> {
		Box::pin(async move {
			Err(TransportError::Io(std::io::Error::other("connection refused")))
		})
	}
}

#[derive(Default)]
struct MemoryContext {
	user: Option<UserRecord>,
}
impl RequestContext for MemoryContext {
	fn set_user(&mut self, user: UserRecord) {
		self.user = Some(user);
	}
}

fn validator<C>(http_client: C) -> CallbackValidator<C>
where
	C: ApiHttpClient,
{
	let config = UAuthConfig::new(CLIENT_ID, CLIENT_SECRET);

	CallbackValidator::new(UAuthClient::with_http_client(config, http_client))
}

fn expect_auth(err: Error) -> uauth_adapter::error::AuthError {
	match err {
		Error::Auth(auth) => auth,
		other => panic!("Expected an auth-category error, got {other:?}."),
	}
}

#[test]
fn validator_registers_under_the_expected_name() {
	assert_eq!(CallbackValidator::<CannedHttpClient>::NAME, "uauth.callback");
}

#[tokio::test]
async fn missing_token_fails_with_redirect_hint_and_no_network() {
	let http_client = CannedHttpClient::new(200, "{}");
	let validator = validator(http_client.clone());
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::default(), &mut ctx)
		.await
		.expect_err("Missing token should fail validation.");
	let auth = expect_auth(err);

	assert_eq!(auth.code, "AUTH.ERROR");
	assert_eq!(auth.status, 401);

	let url = auth.url.expect("Missing-token failure should carry the redirect hint.");

	assert!(url.starts_with("https://auth.unloq.io/login?"));
	assert!(url.contains("client_id=callback-client"));
	assert_eq!(http_client.calls(), 0);
	assert!(ctx.user.is_none());
}

#[tokio::test]
async fn empty_token_is_treated_as_missing() {
	let http_client = CannedHttpClient::new(200, "{}");
	let validator = validator(http_client.clone());
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::with_token(""), &mut ctx)
		.await
		.expect_err("Empty token should fail validation.");

	assert_eq!(expect_auth(err).status, 401);
	assert_eq!(http_client.calls(), 0);
}

#[tokio::test]
async fn valid_record_lands_in_the_request_context() {
	let body = r#"{"type":"auth.token","result":{"email":"a@b.com","name":"Ada","id":7}}"#;
	let http_client = CannedHttpClient::new(200, body);
	let validator = validator(http_client.clone());
	let mut ctx = MemoryContext::default();

	validator
		.authorize(&CallbackInput::with_token("one-time"), &mut ctx)
		.await
		.expect("Valid record should pass validation.");

	let user = ctx.user.expect("Context should carry the user record.");

	assert_eq!(user.email(), "a@b.com");
	assert_eq!(user.fields().get("name"), Some(&serde_json::json!("Ada")));
	assert_eq!(http_client.calls(), 1);
}

#[tokio::test]
async fn record_without_email_fails_validation() {
	let http_client = CannedHttpClient::new(200, r#"{"result":{}}"#);
	let validator = validator(http_client.clone());
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::with_token("one-time"), &mut ctx)
		.await
		.expect_err("Record without email should fail validation.");
	let auth = expect_auth(err);

	assert_eq!(auth.code, "AUTH.ERROR");
	assert_eq!(auth.status, 401);
	assert!(auth.url.is_some());
	assert!(ctx.user.is_none());
}

#[tokio::test]
async fn auth_namespace_exchange_errors_pass_through_verbatim() {
	let body = r#"{"error":{"code":"AUTH.TOKEN","ns":"AUTH","message":"Token already used.","statusCode":403}}"#;
	let validator = validator(CannedHttpClient::new(403, body));
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::with_token("one-time"), &mut ctx)
		.await
		.expect_err("Remote auth error should fail validation.");
	let auth = expect_auth(err);

	assert_eq!(auth.code, "AUTH.TOKEN");
	assert_eq!(auth.status, 403);
	assert_eq!(auth.message, "Token already used.");
}

#[tokio::test]
async fn server_side_exchange_errors_are_normalized() {
	let body = r#"{"error":{"code":"GLOBAL.ERROR","message":"Database connection pool exhausted."}}"#;
	let validator = validator(CannedHttpClient::new(500, body));
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::with_token("one-time"), &mut ctx)
		.await
		.expect_err("Server-side failure should fail validation.");
	let auth = expect_auth(err);

	assert_eq!(auth.code, "AUTH.ERROR");
	assert_eq!(auth.status, 401);
	assert!(auth.url.is_some());
	// Remote internals must never leak to the end user.
	assert!(!auth.message.contains("Database"));
}

#[tokio::test]
async fn transport_failures_are_normalized() {
	let validator = validator(UnreachableNetworkClient);
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::with_token("one-time"), &mut ctx)
		.await
		.expect_err("Transport failure should fail validation.");
	let auth = expect_auth(err);

	assert_eq!(auth.code, "AUTH.ERROR");
	assert_eq!(auth.status, 401);
	assert!(auth.url.is_some());
}

#[tokio::test]
async fn missing_credentials_surface_the_api_category() {
	let http_client = CannedHttpClient::new(200, "{}");
	let config = UAuthConfig::new("", "");
	let validator =
		CallbackValidator::new(UAuthClient::with_http_client(config, http_client.clone()));
	let mut ctx = MemoryContext::default();
	let err = validator
		.authorize(&CallbackInput::with_token("one-time"), &mut ctx)
		.await
		.expect_err("Missing credentials should fail validation.");

	assert_eq!(err.category(), ErrorCategory::Api);
	assert_eq!(http_client.calls(), 0);
}
