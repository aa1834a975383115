use thiserror::Error;

/// Error types for catalog lookups and CSV export.
///
/// Every way a single reference can fail to become a row is one of these
/// variants: a reference that does not parse, a lookup the API refuses, or a
/// response that is missing a field the row needs. Per-reference failures are
/// collected by [`extract`](crate::extract::extract) rather than propagated.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use spotify_extract::{CatalogClient, CatalogError, ClientCredentials, SpotifyClient};
///
/// #[tokio::main]
/// async fn main() {
///     let credentials = ClientCredentials::new("client-id", "client-secret");
///     let client = SpotifyClient::new(
///         Box::new(http_client::native::NativeClient::new()),
///         credentials,
///     );
///
///     match client.get_track("6SZgnc7BvRmSXErk0hyXkq").await {
///         Ok(track) => println!("Found {track}"),
///         Err(CatalogError::Auth(msg)) => eprintln!("Authentication failed: {msg}"),
///         Err(CatalogError::RateLimit { retry_after }) => {
///             eprintln!("Rate limited, retry in {retry_after} seconds");
///         }
///         Err(e) => eprintln!("Other error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, DNS errors, and other
    /// low-level networking issues.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication failures.
    ///
    /// Returned when the token endpoint rejects the client credentials or the
    /// API rejects the bearer token (401/403).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The requested track or artist does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limiting from the API (429).
    ///
    /// No retry is attempted; the reference is reported as failed.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimit {
        /// Number of seconds the API asked us to wait
        retry_after: u64,
    },

    /// Any other non-success status returned by the API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to decode an API response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A reference string with no `track/<id>` segment.
    #[error("No track id found in reference: {0}")]
    InvalidReference(String),

    /// A record decoded fine but lacks something the row needs,
    /// such as an empty artist list.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Missing or invalid configuration (credentials, base URLs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV serialization errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File system I/O errors.
    ///
    /// Reading a reference file or writing the output table.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
