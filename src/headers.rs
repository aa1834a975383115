use http_client::Request;

/// User agent sent with every request
const USER_AGENT: &str = concat!("spotify-extract/", env!("CARGO_PKG_VERSION"));

/// Add headers shared by all requests
pub fn add_common_headers(request: &mut Request) {
    let _ = request.insert_header("User-Agent", USER_AGENT);
    let _ = request.insert_header("Accept", "application/json");
}

/// Add headers for the client-credentials token request
pub fn add_token_headers(request: &mut Request) {
    add_common_headers(request);
    let _ = request.insert_header("Content-Type", "application/x-www-form-urlencoded");
}

/// Add headers for an authenticated Web API request
pub fn add_api_headers(request: &mut Request, authorization: &str) {
    add_common_headers(request);
    let _ = request.insert_header("Authorization", authorization);
}
