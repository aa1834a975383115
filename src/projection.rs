//! Field projections from catalog records to flat output rows.
//!
//! A [`Projection`] decides which lookups a reference needs and how the
//! resulting records flatten into one row. Both exports share the same
//! pipeline in [`extract`](crate::extract::extract) and differ only here.

use crate::{ArtistRecord, CatalogError, Result, TrackRecord};
use serde::{Serialize, Serializer};

/// Rendered in the genre column when the artist has no genre tags.
pub const NO_GENRES: &str = "N/A";

/// A flat output record with a fixed column order.
///
/// `COLUMNS` must list the serialized field names in declaration order; it is
/// written as the CSV header even when there are no rows.
pub trait TabularRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// Flattens a resolved track (and optionally its primary artist) into a row.
pub trait Projection {
    type Row: TabularRow;

    /// Whether the primary artist must be looked up before projecting.
    fn requires_artist(&self) -> bool;

    /// Build the row. `artist` is `Some` whenever [`requires_artist`](Self::requires_artist)
    /// returns true.
    fn project(&self, track: &TrackRecord, artist: Option<&ArtistRecord>) -> Result<Self::Row>;
}

/// Track length in minutes, rounded to two decimal places.
///
/// Rounding goes through the exact decimal expansion of the quotient, so a
/// value such as 4.085 (stored as 4.08499...) rounds down to 4.08.
pub fn duration_minutes(duration_ms: u64) -> f64 {
    let minutes = duration_ms as f64 / 60_000.0;
    format!("{minutes:.2}").parse().unwrap_or(minutes)
}

/// Join genre tags with `", "`, or [`NO_GENRES`] when there are none.
pub fn format_genres(genres: &[String]) -> String {
    if genres.is_empty() {
        NO_GENRES.to_string()
    } else {
        genres.join(", ")
    }
}

/// Booleans are written capitalised (`True`/`False`) so exports stay
/// comparable with the historical CSV files.
fn serialize_flag<S: Serializer>(
    value: &bool,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

fn serialize_optional_flag<S: Serializer>(
    value: &Option<bool>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(flag) => serialize_flag(flag, serializer),
        None => serializer.serialize_none(),
    }
}

fn primary_artist_name(track: &TrackRecord) -> Result<&str> {
    track
        .primary_artist()
        .map(|artist| artist.name.as_str())
        .ok_or_else(|| CatalogError::MissingField(format!("track {} has no artists", track.id)))
}

// ================================================================================================
// TRACK METADATA EXPORT
// ================================================================================================

/// One row of the track metadata export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRow {
    pub track_id: String,
    pub track_number: Option<u32>,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub track_popularity: u32,
    #[serde(rename = "duration_(in_minutes)")]
    pub duration_in_minutes: f64,
    #[serde(serialize_with = "serialize_flag")]
    pub explicit: bool,
    pub release_date: String,
    pub disc_number: Option<u32>,
    pub preview_url: Option<String>,
    #[serde(serialize_with = "serialize_optional_flag")]
    pub is_playable: Option<bool>,
    pub linked_from_id: Option<String>,
}

impl TabularRow for TrackRow {
    const COLUMNS: &'static [&'static str] = &[
        "track_id",
        "track_number",
        "track_name",
        "artist_name",
        "album_name",
        "track_popularity",
        "duration_(in_minutes)",
        "explicit",
        "release_date",
        "disc_number",
        "preview_url",
        "is_playable",
        "linked_from_id",
    ];
}

/// Track attributes only; the artist name comes from the track itself, so no
/// artist lookup is made.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackProjection;

impl Projection for TrackProjection {
    type Row = TrackRow;

    fn requires_artist(&self) -> bool {
        false
    }

    fn project(&self, track: &TrackRecord, _artist: Option<&ArtistRecord>) -> Result<TrackRow> {
        Ok(TrackRow {
            track_id: track.id.clone(),
            track_number: track.track_number,
            track_name: track.name.clone(),
            artist_name: primary_artist_name(track)?.to_string(),
            album_name: track.album.name.clone(),
            track_popularity: track.popularity,
            duration_in_minutes: duration_minutes(track.duration_ms),
            explicit: track.explicit,
            release_date: track.album.release_date.clone(),
            disc_number: track.disc_number,
            preview_url: track.preview_url.clone(),
            is_playable: track.is_playable,
            linked_from_id: track.linked_from_id().map(str::to_string),
        })
    }
}

// ================================================================================================
// GENRE EXPORT
// ================================================================================================

/// One row of the artist genre export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreRow {
    #[serde(rename = "Track Name")]
    pub track_name: String,
    #[serde(rename = "Artist Name")]
    pub artist_name: String,
    #[serde(rename = "Genres")]
    pub genres: String,
}

impl TabularRow for GenreRow {
    const COLUMNS: &'static [&'static str] = &["Track Name", "Artist Name", "Genres"];
}

/// Track name plus the primary artist's name and genre tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenreProjection;

impl Projection for GenreProjection {
    type Row = GenreRow;

    fn requires_artist(&self) -> bool {
        true
    }

    fn project(&self, track: &TrackRecord, artist: Option<&ArtistRecord>) -> Result<GenreRow> {
        let artist = artist.ok_or_else(|| {
            CatalogError::MissingField(format!("artist record for track {}", track.id))
        })?;

        Ok(GenreRow {
            track_name: track.name.clone(),
            artist_name: artist.name.clone(),
            genres: format_genres(&artist.genres),
        })
    }
}
