//! Immutable adapter configuration captured once at construction.

// self
use crate::{_prelude::*, auth::ClientSecret, error::ConfigError};

/// Default UAuth service base URL.
pub const DEFAULT_URL: &str = "https://auth.unloq.io";

/// Adapter configuration: the client credential plus remote-base and toggle settings.
///
/// Deserializable from host-supplied configuration with the documented field defaults.
/// The struct never mutates after construction; both the signer and the callback
/// validator read it behind a shared reference.
#[derive(Clone, Debug, Deserialize)]
pub struct UAuthConfig {
	/// UAuth client identifier; mandatory, see [`validate`](Self::validate).
	#[serde(default)]
	pub client_id: String,
	/// UAuth client secret; mandatory, see [`validate`](Self::validate).
	#[serde(default)]
	pub client_secret: ClientSecret,
	/// Remote service base URL.
	#[serde(default = "default_url")]
	pub url: Url,
	/// Injects `switch=organization` into redirect URLs when the caller did not set one.
	#[serde(default = "default_switch", rename = "switch")]
	pub organization_switch: bool,
	/// Injects `reauth=true` into redirect URLs when the caller did not set one.
	#[serde(default)]
	pub reauth: bool,
}
impl UAuthConfig {
	/// Creates a configuration with the provided credential and defaulted settings.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<ClientSecret>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			url: default_url(),
			organization_switch: default_switch(),
			reauth: false,
		}
	}

	/// Overrides the remote service base URL.
	pub fn with_url(mut self, url: Url) -> Self {
		self.url = url;

		self
	}

	/// Overrides the organization-switch toggle (defaults to `true`).
	pub fn with_organization_switch(mut self, organization_switch: bool) -> Self {
		self.organization_switch = organization_switch;

		self
	}

	/// Overrides the force-reauthentication toggle (defaults to `false`).
	pub fn with_reauth(mut self, reauth: bool) -> Self {
		self.reauth = reauth;

		self
	}

	/// Refuses configurations missing either half of the client credential.
	///
	/// Hosts must call this at startup; `dispatch` additionally guards at call time so an
	/// unvalidated configuration can never reach the network.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingClientSecret);
		}

		Ok(())
	}

	pub(crate) fn has_credentials(&self) -> bool {
		!self.client_id.is_empty() && !self.client_secret.is_empty()
	}
}
impl Default for UAuthConfig {
	fn default() -> Self {
		Self::new("", "")
	}
}

fn default_url() -> Url {
	Url::parse(DEFAULT_URL).expect("Hardcoded default URL must parse.")
}

fn default_switch() -> bool {
	true
}
