use crate::{CatalogError, Result};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable holding the application's client id.
pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
/// Environment variable holding the application's client secret.
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Tokens are refreshed this many seconds before the API would reject them.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// Client id and secret of a registered Spotify application.
///
/// These are exchanged for a bearer token with the client-credentials grant,
/// which gives access to public catalog data only.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read the credential pair from `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    CatalogError::Config(format!("{name} environment variable not set"))
                })
        };

        Ok(Self::new(read(CLIENT_ID_ENV)?, read(CLIENT_SECRET_ENV)?))
    }

    /// Form body for the token endpoint.
    pub fn token_request_body(&self) -> String {
        format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.client_secret)
        )
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token issued by the accounts service.
///
/// Held in memory for the duration of one run; nothing is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Unix timestamp (seconds) at which the accounts service stops honouring the token
    pub expires_at: u64,
}

impl AccessToken {
    /// Build a token from a grant response received at `now`.
    pub fn new(access_token: String, token_type: String, expires_in: u64, now: u64) -> Self {
        Self {
            access_token,
            token_type,
            expires_at: now.saturating_add(expires_in),
        }
    }

    /// Whether the token should be replaced before making a request at `now`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now.saturating_add(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
