//! OAuth2 access tokens for the Sheets API.

use crate::credentials::{Credentials, ServiceAccountKey};
use crate::error::{RemoteError, RemoteResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// OAuth2 scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Something that can produce a bearer token for API calls.
pub trait TokenSource {
    fn access_token(&mut self) -> RemoteResult<String>;
}

/// A fixed bearer token.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl TokenSource for StaticToken {
    fn access_token(&mut self) -> RemoteResult<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: i64,
}

/// Exchanges a signed JWT assertion for an access token and caches it until
/// shortly before it expires.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    http: Client,
    cached: Option<CachedToken>,
}

impl ServiceAccountTokenSource {
    /// Prepare a token source. The private key is parsed here so a malformed
    /// key fails before any request is made.
    pub fn new(key: ServiceAccountKey, http: Client) -> RemoteResult<Self> {
        key.validate()?;
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| RemoteError::credentials(format!("invalid private key: {e}")))?;

        Ok(ServiceAccountTokenSource {
            key,
            encoding_key,
            scope: SPREADSHEETS_SCOPE.to_string(),
            http,
            cached: None,
        })
    }

    fn assertion(&self, now: i64) -> RemoteResult<String> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.key.private_key_id.is_empty() {
            header.kid = Some(self.key.private_key_id.clone());
        }

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| RemoteError::credentials(format!("failed to sign assertion: {e}")))
    }

    fn fetch_token(&self, now: i64) -> RemoteResult<CachedToken> {
        let assertion = self.assertion(now)?;
        debug!(token_uri = %self.key.token_uri, "requesting access token");

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Auth(format!(
                "token endpoint returned HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let token: TokenResponse = response.json()?;
        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        info!(client_email = %self.key.client_email, expires_in = lifetime, "obtained access token");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: now + lifetime,
        })
    }
}

impl TokenSource for ServiceAccountTokenSource {
    fn access_token(&mut self) -> RemoteResult<String> {
        let now = chrono::Utc::now().timestamp();

        if let Some(cached) = &self.cached {
            if cached.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.fetch_token(now)?;
        let token = fresh.token.clone();
        self.cached = Some(fresh);
        Ok(token)
    }
}

/// Turn resolved credentials into a token source.
pub fn token_source_for(
    credentials: Credentials,
    http: &Client,
) -> RemoteResult<Box<dyn TokenSource>> {
    match credentials {
        Credentials::AccessToken(token) => Ok(Box::new(StaticToken::new(token))),
        Credentials::ServiceAccount(key) => {
            Ok(Box::new(ServiceAccountTokenSource::new(key, http.clone())?))
        }
        Credentials::File(path) => {
            let key = ServiceAccountKey::from_file(&path)?;
            Ok(Box::new(ServiceAccountTokenSource::new(key, http.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let mut source = StaticToken::new("abc");
        assert_eq!(source.access_token().unwrap(), "abc");
    }

    #[test]
    fn test_malformed_private_key_fails_early() {
        let key = ServiceAccountKey::from_json(
            r#"{"private_key": "not a pem", "client_email": "bot@example.com"}"#,
        )
        .unwrap();
        let err = ServiceAccountTokenSource::new(key, Client::new())
            .err()
            .unwrap();
        assert!(matches!(err, RemoteError::Credentials(_)));
    }

    #[test]
    fn test_missing_key_file_fails_early() {
        let err = token_source_for(
            Credentials::File("/nonexistent/key.json".into()),
            &Client::new(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, RemoteError::Credentials(_)));
    }
}
