//! Service-account credentials and their resolution order.

use crate::error::{RemoteError, RemoteResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_AUTH_PROVIDER_CERT_URL: &str = "https://www.googleapis.com/oauth2/v1/certs";
pub const DEFAULT_UNIVERSE_DOMAIN: &str = "googleapis.com";

fn default_type() -> String {
    "service_account".to_string()
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_cert_url() -> String {
    DEFAULT_AUTH_PROVIDER_CERT_URL.to_string()
}

fn default_universe_domain() -> String {
    DEFAULT_UNIVERSE_DOMAIN.to_string()
}

/// A Google service-account key, in the layout of the downloadable JSON key file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default = "default_type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_cert_url")]
    pub auth_provider_x509_cert_url: String,
    #[serde(default)]
    pub client_x509_cert_url: String,
    #[serde(default = "default_universe_domain")]
    pub universe_domain: String,
}

// Keep the private key out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON representation
    pub fn from_json(json: &str) -> RemoteResult<Self> {
        let key: Self = serde_json::from_str(json)
            .map_err(|e| RemoteError::credentials(format!("invalid service account key: {e}")))?;
        key.validate()?;
        Ok(key)
    }

    /// Read a key file from disk
    pub fn from_file(path: &Path) -> RemoteResult<Self> {
        if !path.is_file() {
            return Err(RemoteError::credentials(format!(
                "credentials file not found: {}",
                path.display()
            )));
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            RemoteError::credentials(format!(
                "cannot read credentials file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Build a key from `GOOGLE_*` settings.
    ///
    /// Returns `None` unless `GOOGLE_PRIVATE_KEY` is set. Literal `\n`
    /// sequences in the private key are expanded, since multi-line values do
    /// not survive most environment files.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = lookup("GOOGLE_PRIVATE_KEY").filter(|k| !k.is_empty())?;
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Some(ServiceAccountKey {
            key_type: get("GOOGLE_TYPE", "service_account"),
            project_id: get("GOOGLE_PROJECT_ID", ""),
            private_key_id: get("GOOGLE_PRIVATE_KEY_ID", ""),
            private_key: private_key.replace("\\n", "\n"),
            client_email: get("GOOGLE_CLIENT_EMAIL", ""),
            client_id: get("GOOGLE_CLIENT_ID", ""),
            auth_uri: get("GOOGLE_AUTH_URI", DEFAULT_AUTH_URI),
            token_uri: get("GOOGLE_TOKEN_URI", DEFAULT_TOKEN_URI),
            auth_provider_x509_cert_url: get(
                "GOOGLE_AUTH_PROVIDER_X509_CERT_URL",
                DEFAULT_AUTH_PROVIDER_CERT_URL,
            ),
            client_x509_cert_url: get("GOOGLE_CLIENT_X509_CERT_URL", ""),
            universe_domain: get("GOOGLE_UNIVERSE_DOMAIN", DEFAULT_UNIVERSE_DOMAIN),
        })
    }

    /// Check the fields needed to request a token
    pub fn validate(&self) -> RemoteResult<()> {
        if self.private_key.trim().is_empty() {
            return Err(RemoteError::credentials("service account key has no private_key"));
        }
        if self.client_email.trim().is_empty() {
            return Err(RemoteError::credentials("service account key has no client_email"));
        }
        if self.token_uri.trim().is_empty() {
            return Err(RemoteError::credentials("service account key has no token_uri"));
        }
        Ok(())
    }
}

/// Where the remote store gets its authority from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// An in-memory service-account key.
    ServiceAccount(ServiceAccountKey),
    /// Path to a service-account key file.
    File(PathBuf),
    /// A bearer token obtained elsewhere.
    AccessToken(String),
}

impl Credentials {
    /// Resolve credentials by precedence: an explicit value, then a key built
    /// from environment fields, then a key file path from the environment.
    ///
    /// Fails with [`RemoteError::Credentials`] when nothing is available.
    pub fn resolve(
        explicit: Option<Credentials>,
        env_key: Option<ServiceAccountKey>,
        env_file: Option<PathBuf>,
    ) -> RemoteResult<Self> {
        if let Some(credentials) = explicit {
            debug!("using explicit credentials");
            return Ok(credentials);
        }
        if let Some(key) = env_key {
            debug!(client_email = %key.client_email, "using credentials from environment fields");
            return Ok(Credentials::ServiceAccount(key));
        }
        if let Some(path) = env_file.filter(|p| !p.as_os_str().is_empty()) {
            debug!(path = %path.display(), "using credentials file");
            return Ok(Credentials::File(path));
        }
        Err(RemoteError::credentials(
            "no credentials found; set GOOGLE_PRIVATE_KEY or GOOGLE_APPLICATION_CREDENTIALS",
        ))
    }
}
