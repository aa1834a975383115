pub mod api;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod extract;
mod headers;
pub mod output;
pub mod projection;
pub mod reference;
pub mod types;

pub use api::SpotifyClient;
pub use auth::{AccessToken, ClientCredentials};
pub use catalog::CatalogClient;
#[cfg(feature = "mock")]
pub use catalog::MockCatalogClient;
pub use error::CatalogError;
pub use extract::{extract, Extraction, ExtractionFailure};
pub use output::{preview, write_csv, write_csv_to};
pub use projection::{
    GenreProjection, GenreRow, Projection, TabularRow, TrackProjection, TrackRow,
};
pub use reference::{load_references, parse_track_id, TRENDING_NOW_TAMIL};
pub use types::{AlbumRef, ArtistRecord, ArtistRef, LinkedFrom, TrackRecord};

pub type Result<T> = std::result::Result<T, CatalogError>;
