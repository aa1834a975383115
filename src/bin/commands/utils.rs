use spotify_extract::api::{
    ACCOUNTS_URL_ENV, API_BASE_URL_ENV, DEFAULT_ACCOUNTS_URL, DEFAULT_API_BASE_URL,
};
use spotify_extract::{ClientCredentials, SpotifyClient};
use std::env;

/// Initialise env_logger; `RUST_LOG` takes precedence over the default level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Get client id and secret from environment variables
pub fn get_credentials() -> Result<ClientCredentials, Box<dyn std::error::Error>> {
    Ok(ClientCredentials::from_env()?)
}

/// Build the API client, honouring endpoint overrides from the environment.
pub fn create_client(credentials: ClientCredentials, market: Option<String>) -> SpotifyClient {
    let api_base_url =
        env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    let accounts_url =
        env::var(ACCOUNTS_URL_ENV).unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string());

    let http_client = http_client::native::NativeClient::new();
    let client = SpotifyClient::with_base_urls(
        Box::new(http_client),
        credentials,
        api_base_url,
        accounts_url,
    );

    let client = match market {
        Some(market) => client.with_market(market),
        None => client,
    };

    if let Some(market) = client.market() {
        log::info!("Resolving tracks for market {market}");
    }
    client
}
