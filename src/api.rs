use crate::auth::{unix_now, AccessToken, ClientCredentials};
use crate::headers::{add_api_headers, add_token_headers};
use crate::{ArtistRecord, CatalogClient, CatalogError, Result, TrackRecord};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use serde::Deserialize;
use std::sync::Mutex;

/// Base URL of the Spotify Web API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
/// Token endpoint of the Spotify accounts service.
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";

/// Environment variable overriding [`DEFAULT_API_BASE_URL`].
pub const API_BASE_URL_ENV: &str = "SPOTIFY_API_BASE_URL";
/// Environment variable overriding [`DEFAULT_ACCOUNTS_URL`].
pub const ACCOUNTS_URL_ENV: &str = "SPOTIFY_ACCOUNTS_URL";

// =============================================================================
// SpotifyClient
// =============================================================================

/// [`CatalogClient`] backed by the Spotify Web API.
///
/// The client authenticates lazily: the first lookup exchanges the client
/// credentials for a bearer token, which is reused until it is about to
/// expire. Requests are sent one at a time and never retried.
///
/// # Examples
///
/// ```rust,no_run
/// use spotify_extract::{CatalogClient, ClientCredentials, Result, SpotifyClient};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let http_client = http_client::native::NativeClient::new();
///     let client = SpotifyClient::new(Box::new(http_client), ClientCredentials::from_env()?)
///         .with_market("IN");
///
///     let track = client.get_track("6SZgnc7BvRmSXErk0hyXkq").await?;
///     println!("{track} (playable: {:?})", track.is_playable);
///     Ok(())
/// }
/// ```
pub struct SpotifyClient {
    client: Box<dyn HttpClient>,
    credentials: ClientCredentials,
    api_base_url: String,
    accounts_url: String,
    market: Option<String>,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    /// Create a client against the public Spotify endpoints.
    pub fn new(client: Box<dyn HttpClient>, credentials: ClientCredentials) -> Self {
        Self::with_base_urls(
            client,
            credentials,
            DEFAULT_API_BASE_URL.to_string(),
            DEFAULT_ACCOUNTS_URL.to_string(),
        )
    }

    /// Create a client with custom endpoints.
    ///
    /// This is useful for testing against a local stub server.
    pub fn with_base_urls(
        client: Box<dyn HttpClient>,
        credentials: ClientCredentials,
        api_base_url: String,
        accounts_url: String,
    ) -> Self {
        Self {
            client,
            credentials,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            accounts_url,
            market: None,
            token: Mutex::new(None),
        }
    }

    /// Resolve tracks for a specific market (ISO 3166-1 alpha-2 code).
    ///
    /// Only market-specific lookups report `is_playable` and `linked_from`.
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn market(&self) -> Option<&str> {
        self.market.as_deref()
    }

    /// Return a valid bearer token, requesting a new one if needed.
    async fn access_token(&self) -> Result<AccessToken> {
        let now = unix_now();
        if let Some(token) = self.cached_token() {
            if !token.is_expired_at(now) {
                return Ok(token);
            }
            log::debug!("Access token expired, requesting a new one");
        }

        let token = self.request_token().await?;
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());
        Ok(token)
    }

    fn cached_token(&self) -> Option<AccessToken> {
        self.token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn request_token(&self) -> Result<AccessToken> {
        log::debug!(
            "Requesting access token for client {}",
            self.credentials.client_id
        );

        let mut request = Request::new(Method::Post, parse_url(&self.accounts_url)?);
        add_token_headers(&mut request);
        request.set_body(self.credentials.token_request_body());

        let body = self.send(request).await.map_err(|e| match e {
            // The accounts service reports bad credentials as 400 invalid_client.
            CatalogError::Api {
                status: 400,
                message,
            } => CatalogError::Auth(message),
            other => other,
        })?;

        let token = parse_token_response(&body, unix_now())?;
        log::info!("Obtained access token (expires at {})", token.expires_at);
        Ok(token)
    }

    /// Authenticated GET returning the response body.
    async fn get(&self, url: &str) -> Result<String> {
        let token = self.access_token().await?;

        let mut request = Request::new(Method::Get, parse_url(url)?);
        add_api_headers(&mut request, &token.authorization());

        self.send(request).await
    }

    async fn send(&self, request: Request) -> Result<String> {
        let method = request.method();
        let url = request.url().to_string();

        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status: u16 = response.status().into();
        let retry_after = response
            .header("Retry-After")
            .and_then(|values| values.last().as_str().trim().parse::<u64>().ok());

        log::debug!("{method} {url} -> {status}");

        let body = response
            .body_string()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        check_status(status, retry_after, &body)?;
        Ok(body)
    }
}

#[async_trait(?Send)]
impl CatalogClient for SpotifyClient {
    async fn get_track(&self, track_id: &str) -> Result<TrackRecord> {
        let url = track_url(&self.api_base_url, track_id, self.market.as_deref());
        let body = self.get(&url).await?;
        let track = parse_track_response(&body)?;
        log::debug!("Fetched track {}: {track}", track.id);
        Ok(track)
    }

    async fn get_artist(&self, artist_id: &str) -> Result<ArtistRecord> {
        let url = artist_url(&self.api_base_url, artist_id);
        let body = self.get(&url).await?;
        let artist = parse_artist_response(&body)?;
        log::debug!("Fetched artist {}: {artist}", artist.id);
        Ok(artist)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    url.parse::<Url>()
        .map_err(|e| CatalogError::Config(format!("Invalid URL '{url}': {e}")))
}

/// URL of `GET /tracks/{id}`, optionally scoped to a market.
pub fn track_url(api_base_url: &str, track_id: &str, market: Option<&str>) -> String {
    let url = format!("{api_base_url}/tracks/{}", urlencoding::encode(track_id));
    match market {
        Some(market) => format!("{url}?market={}", urlencoding::encode(market)),
        None => url,
    }
}

/// URL of `GET /artists/{id}`.
pub fn artist_url(api_base_url: &str, artist_id: &str) -> String {
    format!("{api_base_url}/artists/{}", urlencoding::encode(artist_id))
}

// =============================================================================
// Response handling
// =============================================================================

/// Map an HTTP status to the crate's error taxonomy.
pub fn check_status(status: u16, retry_after: Option<u64>, body: &str) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(CatalogError::Auth(error_message(body))),
        404 => Err(CatalogError::NotFound(error_message(body))),
        429 => Err(CatalogError::RateLimit {
            retry_after: retry_after.unwrap_or(1),
        }),
        _ => Err(CatalogError::Api {
            status,
            message: error_message(body),
        }),
    }
}

/// Best-effort human readable message from an error body.
///
/// The Web API nests `{"error": {"status": .., "message": ..}}`, while the
/// accounts service uses `{"error": "..", "error_description": ".."}`.
fn error_message(body: &str) -> String {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "empty response body".to_string()
        } else {
            trimmed.to_string()
        }
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    match value.get("error") {
        Some(serde_json::Value::Object(error)) => error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(fallback),
        Some(serde_json::Value::String(code)) => value
            .get("error_description")
            .and_then(|d| d.as_str())
            .map(|d| format!("{code}: {d}"))
            .unwrap_or_else(|| code.clone()),
        _ => fallback(),
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

pub fn parse_token_response(body: &str, now: u64) -> Result<AccessToken> {
    let response: TokenResponse = serde_json::from_str(body)
        .map_err(|e| CatalogError::Parse(format!("token response: {e}")))?;

    Ok(AccessToken::new(
        response.access_token,
        response.token_type,
        response.expires_in,
        now,
    ))
}

pub fn parse_track_response(body: &str) -> Result<TrackRecord> {
    serde_json::from_str(body).map_err(|e| CatalogError::Parse(format!("track response: {e}")))
}

pub fn parse_artist_response(body: &str) -> Result<ArtistRecord> {
    serde_json::from_str(body).map_err(|e| CatalogError::Parse(format!("artist response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_types::{Error, Response};
    use std::collections::VecDeque;
    use std::sync::Arc;

    const API: &str = "http://api.test/v1";
    const ACCOUNTS: &str = "http://accounts.test/api/token";

    /// A request as it reached the transport.
    #[derive(Debug, Clone)]
    struct SentRequest {
        method: String,
        url: String,
        authorization: Option<String>,
        body: String,
    }

    #[derive(Debug)]
    struct CannedResponse {
        status: u16,
        retry_after: Option<&'static str>,
        body: String,
    }

    /// Transport replaying canned responses in order and recording every request.
    #[derive(Debug, Clone, Default)]
    struct ReplayClient {
        responses: Arc<Mutex<VecDeque<CannedResponse>>>,
        sent: Arc<Mutex<Vec<SentRequest>>>,
    }

    impl ReplayClient {
        fn respond(self, status: u16, body: impl Into<String>) -> Self {
            self.responses.lock().unwrap().push_back(CannedResponse {
                status,
                retry_after: None,
                body: body.into(),
            });
            self
        }

        fn respond_rate_limited(self, retry_after: &'static str) -> Self {
            self.responses.lock().unwrap().push_back(CannedResponse {
                status: 429,
                retry_after: Some(retry_after),
                body: String::new(),
            });
            self
        }

        fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for ReplayClient {
        async fn send(&self, mut req: Request) -> std::result::Result<Response, Error> {
            let body = req.body_string().await?;
            self.sent.lock().unwrap().push(SentRequest {
                method: req.method().to_string(),
                url: req.url().to_string(),
                authorization: req
                    .header("Authorization")
                    .map(|values| values.last().as_str().to_string()),
                body,
            });

            let canned = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::from_str(500u16, "no canned response left"))?;

            let mut response = Response::new(canned.status);
            if let Some(retry_after) = canned.retry_after {
                let _ = response.insert_header("Retry-After", retry_after);
            }
            response.set_body(canned.body);
            Ok(response)
        }
    }

    fn spotify_client(transport: &ReplayClient) -> SpotifyClient {
        SpotifyClient::with_base_urls(
            Box::new(transport.clone()),
            ClientCredentials::new("my-client", "s3cr3t"),
            API.to_string(),
            ACCOUNTS.to_string(),
        )
    }

    fn token_body(access_token: &str, expires_in: u64) -> String {
        format!(
            r#"{{"access_token": "{access_token}", "token_type": "Bearer", "expires_in": {expires_in}}}"#
        )
    }

    fn track_body(id: &str) -> String {
        format!(
            r#"{{
                "id": "{id}", "name": "Hukum", "popularity": 72, "duration_ms": 204000,
                "explicit": false,
                "artists": [{{"id": "4zCH9qm4R2DADamUHMCa6O", "name": "Anirudh Ravichander"}}],
                "album": {{"name": "Jailer", "release_date": "2023-07-17"}}
            }}"#
        )
    }

    const ARTIST_BODY: &str = r#"{
        "id": "4zCH9qm4R2DADamUHMCa6O",
        "name": "Anirudh Ravichander",
        "genres": ["kollywood"]
    }"#;

    #[tokio::test]
    async fn test_token_is_requested_once_and_reused() {
        let transport = ReplayClient::default()
            .respond(200, token_body("tok1", 3600))
            .respond(200, track_body("1uQU9b93tlMlMoZ0h2bRgf"))
            .respond(200, ARTIST_BODY);
        let client = spotify_client(&transport);

        let track = client.get_track("1uQU9b93tlMlMoZ0h2bRgf").await.unwrap();
        let artist = client.get_artist("4zCH9qm4R2DADamUHMCa6O").await.unwrap();
        assert_eq!(track.name, "Hukum");
        assert_eq!(artist.genres, vec!["kollywood"]);

        let sent = transport.sent();
        assert_eq!(sent.len(), 3);

        assert_eq!(sent[0].method, "POST");
        assert_eq!(sent[0].url, ACCOUNTS);
        assert_eq!(sent[0].authorization, None);
        assert_eq!(
            sent[0].body,
            "grant_type=client_credentials&client_id=my-client&client_secret=s3cr3t"
        );

        assert_eq!(sent[1].method, "GET");
        assert_eq!(sent[1].url, format!("{API}/tracks/1uQU9b93tlMlMoZ0h2bRgf"));
        assert_eq!(sent[1].authorization.as_deref(), Some("Bearer tok1"));

        assert_eq!(sent[2].method, "GET");
        assert_eq!(sent[2].url, format!("{API}/artists/4zCH9qm4R2DADamUHMCa6O"));
        assert_eq!(sent[2].authorization.as_deref(), Some("Bearer tok1"));
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        // 30 seconds is inside the refresh margin, so the first token is stale at once
        let transport = ReplayClient::default()
            .respond(200, token_body("tok1", 30))
            .respond(200, track_body("trackA"))
            .respond(200, token_body("tok2", 3600))
            .respond(200, track_body("trackB"));
        let client = spotify_client(&transport);

        client.get_track("trackA").await.unwrap();
        client.get_track("trackB").await.unwrap();

        let sent = transport.sent();
        let methods: Vec<&str> = sent.iter().map(|r| r.method.as_str()).collect();
        assert_eq!(methods, vec!["POST", "GET", "POST", "GET"]);
        assert_eq!(sent[1].authorization.as_deref(), Some("Bearer tok1"));
        assert_eq!(sent[3].authorization.as_deref(), Some("Bearer tok2"));
    }

    #[tokio::test]
    async fn test_market_is_sent_with_track_lookup_only() {
        let transport = ReplayClient::default()
            .respond(200, token_body("tok1", 3600))
            .respond(200, track_body("6SZgnc7BvRmSXErk0hyXkq"))
            .respond(200, ARTIST_BODY);
        let client = spotify_client(&transport).with_market("IN");

        client.get_track("6SZgnc7BvRmSXErk0hyXkq").await.unwrap();
        client.get_artist("4zCH9qm4R2DADamUHMCa6O").await.unwrap();

        let sent = transport.sent();
        assert_eq!(
            sent[1].url,
            format!("{API}/tracks/6SZgnc7BvRmSXErk0hyXkq?market=IN")
        );
        assert_eq!(sent[2].url, format!("{API}/artists/4zCH9qm4R2DADamUHMCa6O"));
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_an_auth_error() {
        let transport = ReplayClient::default().respond(
            400,
            r#"{"error": "invalid_client", "error_description": "Invalid client"}"#,
        );
        let client = spotify_client(&transport);

        match client.get_track("6SZgnc7BvRmSXErk0hyXkq").await {
            Err(CatalogError::Auth(msg)) => assert_eq!(msg, "invalid_client: Invalid client"),
            other => panic!("Expected auth error, got: {other:?}"),
        }

        // No lookup is attempted without a token
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_header_is_reported() {
        let transport = ReplayClient::default()
            .respond(200, token_body("tok1", 3600))
            .respond_rate_limited("7");
        let client = spotify_client(&transport);

        match client.get_track("6SZgnc7BvRmSXErk0hyXkq").await {
            Err(CatalogError::RateLimit { retry_after }) => assert_eq!(retry_after, 7),
            other => panic!("Expected rate limit error, got: {other:?}"),
        }
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_http_error() {
        let transport = ReplayClient::default();
        let client = spotify_client(&transport);

        assert!(matches!(
            client.get_track("6SZgnc7BvRmSXErk0hyXkq").await,
            Err(CatalogError::Http(_))
        ));
    }

    #[test]
    fn test_track_and_artist_urls() {
        assert_eq!(
            track_url(DEFAULT_API_BASE_URL, "6SZgnc7BvRmSXErk0hyXkq", None),
            "https://api.spotify.com/v1/tracks/6SZgnc7BvRmSXErk0hyXkq"
        );
        assert_eq!(
            track_url(DEFAULT_API_BASE_URL, "6SZgnc7BvRmSXErk0hyXkq", Some("IN")),
            "https://api.spotify.com/v1/tracks/6SZgnc7BvRmSXErk0hyXkq?market=IN"
        );
        assert_eq!(
            artist_url("http://localhost:8080", "4zCH9qm4R2DADamUHMCa6O"),
            "http://localhost:8080/artists/4zCH9qm4R2DADamUHMCa6O"
        );
    }

    #[test]
    fn test_check_status_success() {
        assert!(check_status(200, None, "{}").is_ok());
        assert!(check_status(204, None, "").is_ok());
    }

    #[test]
    fn test_check_status_not_found_uses_api_message() {
        let body = r#"{"error": {"status": 404, "message": "Non existing id"}}"#;
        match check_status(404, None, body) {
            Err(CatalogError::NotFound(msg)) => assert_eq!(msg, "Non existing id"),
            other => panic!("Expected not found error, got: {other:?}"),
        }
    }

    #[test]
    fn test_check_status_auth() {
        let body = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        match check_status(401, None, body) {
            Err(CatalogError::Auth(msg)) => assert_eq!(msg, "The access token expired"),
            other => panic!("Expected auth error, got: {other:?}"),
        }
    }

    #[test]
    fn test_check_status_rate_limit() {
        match check_status(429, Some(30), "") {
            Err(CatalogError::RateLimit { retry_after }) => assert_eq!(retry_after, 30),
            other => panic!("Expected rate limit error, got: {other:?}"),
        }
        match check_status(429, None, "") {
            Err(CatalogError::RateLimit { retry_after }) => assert_eq!(retry_after, 1),
            other => panic!("Expected rate limit error, got: {other:?}"),
        }
    }

    #[test]
    fn test_check_status_other_errors() {
        let token_error = r#"{"error": "invalid_client", "error_description": "Invalid client"}"#;
        match check_status(400, None, token_error) {
            Err(CatalogError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid_client: Invalid client");
            }
            other => panic!("Expected API error, got: {other:?}"),
        }

        match check_status(502, None, "<html>Bad Gateway</html>\n") {
            Err(CatalogError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>Bad Gateway</html>");
            }
            other => panic!("Expected API error, got: {other:?}"),
        }

        match check_status(500, None, "   ") {
            Err(CatalogError::Api { message, .. }) => assert_eq!(message, "empty response body"),
            other => panic!("Expected API error, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_token_response() {
        let body = r#"{"access_token": "BQDx", "token_type": "Bearer", "expires_in": 3600}"#;
        let token = parse_token_response(body, 1_700_000_000).unwrap();
        assert_eq!(token.access_token, "BQDx");
        assert_eq!(token.expires_at, 1_700_003_600);
        assert_eq!(token.authorization(), "Bearer BQDx");
    }

    #[test]
    fn test_parse_track_response_missing_album_is_parse_error() {
        let body = r#"{
            "id": "x", "name": "Song", "popularity": 10, "duration_ms": 1,
            "explicit": false, "artists": [{"id": "a", "name": "A"}]
        }"#;
        match parse_track_response(body) {
            Err(CatalogError::Parse(msg)) => assert!(msg.contains("album")),
            other => panic!("Expected parse error, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_artist_response() {
        let body = r#"{
            "id": "4zCH9qm4R2DADamUHMCa6O",
            "name": "Anirudh Ravichander",
            "genres": ["kollywood", "tamil pop"],
            "popularity": 80
        }"#;
        let artist = parse_artist_response(body).unwrap();
        assert_eq!(artist.name, "Anirudh Ravichander");
        assert_eq!(artist.genres, vec!["kollywood", "tamil pop"]);
    }
}
