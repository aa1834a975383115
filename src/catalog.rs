use crate::{ArtistRecord, Result, TrackRecord};
use async_trait::async_trait;

/// Read-only catalog lookups that can be mocked for testing.
///
/// The export only ever needs two calls: a track by id, then optionally that
/// track's primary artist by id. [`SpotifyClient`](crate::SpotifyClient) is
/// the HTTP implementation; tests hand [`extract`](crate::extract::extract)
/// any other implementation that returns canned records.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockCatalogClient`
/// that implements this trait using the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait CatalogClient {
    /// Look up a track by its base-62 id.
    async fn get_track(&self, track_id: &str) -> Result<TrackRecord>;

    /// Look up an artist by its base-62 id.
    async fn get_artist(&self, artist_id: &str) -> Result<ArtistRecord>;
}
