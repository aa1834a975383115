//! Data types for catalog records returned by the Spotify Web API.
//!
//! Only the attributes the export consumes are modelled. Fields the API always
//! sends for a full track object are required, so a response missing one of
//! them fails to decode instead of producing a half-empty row. Fields the API
//! only sends in some situations (for example `is_playable`, which needs a
//! market) are `Option`s.

use serde::{Deserialize, Serialize};
use std::fmt;

// ================================================================================================
// TRACK METADATA
// ================================================================================================

/// A track object as returned by `GET /tracks/{id}`.
///
/// # Examples
///
/// ```rust
/// use spotify_extract::TrackRecord;
///
/// let json = r#"{
///     "id": "6SZgnc7BvRmSXErk0hyXkq",
///     "name": "Golden Sparrow",
///     "popularity": 61,
///     "duration_ms": 245000,
///     "explicit": false,
///     "artists": [{"id": "4zCH9qm4R2DADamUHMCa6O", "name": "G. V. Prakash"}],
///     "album": {"name": "Nilavuku En Mel", "release_date": "2025-02-21"}
/// }"#;
///
/// let track: TrackRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(track.primary_artist().map(|a| a.name.as_str()), Some("G. V. Prakash"));
/// assert_eq!(track.to_string(), "G. V. Prakash - Golden Sparrow [Nilavuku En Mel]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// The base-62 track id
    pub id: String,
    /// The track name/title
    pub name: String,
    /// Position of the track on its disc
    pub track_number: Option<u32>,
    /// Disc number, usually 1 unless the album has several discs
    pub disc_number: Option<u32>,
    /// Popularity score between 0 and 100
    pub popularity: u32,
    /// Track length in milliseconds
    pub duration_ms: u64,
    /// Whether the track has explicit lyrics
    pub explicit: bool,
    /// Credited artists, primary artist first
    pub artists: Vec<ArtistRef>,
    /// The album the track appears on
    pub album: AlbumRef,
    /// A 30 second MP3 preview, often absent
    pub preview_url: Option<String>,
    /// Only present when the lookup specified a market
    pub is_playable: Option<bool>,
    /// Present when track relinking replaced the requested track
    /// with another one for the requested market
    pub linked_from: Option<LinkedFrom>,
}

impl TrackRecord {
    /// The first credited artist, if any.
    pub fn primary_artist(&self) -> Option<&ArtistRef> {
        self.artists.first()
    }

    /// Id of the originally requested track when relinking happened.
    pub fn linked_from_id(&self) -> Option<&str> {
        self.linked_from.as_ref().and_then(|l| l.id.as_deref())
    }
}

impl fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary_artist() {
            Some(artist) => write!(f, "{} - {} [{}]", artist.name, self.name, self.album.name),
            None => write!(f, "{} [{}]", self.name, self.album.name),
        }
    }
}

/// Simplified artist object embedded in a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Missing for local files
    pub id: Option<String>,
    pub name: String,
}

/// Simplified album object embedded in a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` depending on the album's precision
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedFrom {
    pub id: Option<String>,
}

// ================================================================================================
// ARTIST METADATA
// ================================================================================================

/// An artist object as returned by `GET /artists/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    /// Genre tags, frequently empty for smaller artists
    #[serde(default)]
    pub genres: Vec<String>,
}

impl fmt::Display for ArtistRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
