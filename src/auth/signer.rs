//! HMAC signing of time-stamped bearer credentials for outbound UAuth API calls.
//!
//! The Signed Token format is:
//!
//! ```text
//! <client_id>-<timestamp_ms>-<signature>
//! ```
//!
//! Where `signature = hex(HMAC-SHA256(key = client_secret, msg = timestamp_ms))` and
//! `timestamp_ms` is the decimal millisecond count since the Unix epoch. The digest and
//! encoding are a pinned contract with the UAuth service, not a local design choice.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::ClientSecret};

type HmacSha256 = Hmac<Sha256>;

/// Signs the decimal millisecond timestamp with the client secret.
///
/// Returns the lowercase hex HMAC-SHA256 digest.
pub fn sign(secret: &ClientSecret, timestamp_ms: &str) -> String {
	// HMAC accepts keys of any length.
	let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
		.expect("HMAC key initialization is infallible.");

	mac.update(timestamp_ms.as_bytes());

	hex::encode(mac.finalize().into_bytes())
}

/// Produces time-stamped, HMAC-signed bearer credentials identifying this client.
///
/// Stateless per call: every token reads the clock and signs fresh, so one signer can be
/// shared across concurrent requests without locks.
#[derive(Clone)]
pub struct TokenSigner {
	client_id: String,
	client_secret: ClientSecret,
}
impl TokenSigner {
	/// Creates a signer over the immutable client credential.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<ClientSecret>) -> Self {
		Self { client_id: client_id.into(), client_secret: client_secret.into() }
	}

	/// Composes a fresh Signed Token from the current clock.
	///
	/// Always succeeds; the only side effect is the clock read.
	pub fn authorization_token(&self) -> String {
		self.token_at(OffsetDateTime::now_utc())
	}

	/// Timestamp-explicit variant of [`authorization_token`](Self::authorization_token) used by
	/// deterministic tests.
	pub fn token_at(&self, moment: OffsetDateTime) -> String {
		let timestamp = (moment.unix_timestamp_nanos() / 1_000_000).to_string();
		let signature = sign(&self.client_secret, &timestamp);

		format!("{}-{timestamp}-{signature}", self.client_id)
	}
}
impl Debug for TokenSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenSigner")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn sign_matches_rfc_4231_case_two() {
		// RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?".
		let digest = sign(&ClientSecret::new("Jefe"), "what do ya want for nothing?");

		assert_eq!(digest, "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
	}

	#[test]
	fn distinct_timestamps_yield_distinct_signatures() {
		let signer = TokenSigner::new("cid", "cs");
		let first = signer.token_at(datetime!(2024-01-01 00:00:00 UTC));
		let second = signer.token_at(datetime!(2024-01-01 00:00:00.001 UTC));

		assert_ne!(first, second);
	}

	#[test]
	fn token_carries_id_timestamp_and_hex_signature() {
		let moment = datetime!(2024-05-01 12:00:00 UTC);
		let token = TokenSigner::new("cid", "cs").token_at(moment);
		let timestamp = (moment.unix_timestamp_nanos() / 1_000_000).to_string();
		let signature = token
			.rsplit('-')
			.next()
			.expect("Token should contain dash-separated segments.");

		assert!(token.starts_with(&format!("cid-{timestamp}-")));
		assert_eq!(signature.len(), 64);
		assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn distinct_secrets_yield_distinct_signatures() {
		let moment = datetime!(2024-05-01 12:00:00 UTC);
		let first = TokenSigner::new("cid", "left").token_at(moment);
		let second = TokenSigner::new("cid", "right").token_at(moment);

		assert_ne!(first, second);
	}

	#[test]
	fn signer_debug_redacts_the_secret() {
		let rendered = format!("{:?}", TokenSigner::new("cid", "cs"));

		assert!(rendered.contains("cid"));
		assert!(!rendered.contains("\"cs\""));
		assert!(rendered.contains("<redacted>"));
	}
}
