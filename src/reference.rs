use crate::{CatalogError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

macro_rules! dataset_name {
    () => {
        "Trending_Now_tamil"
    };
}

/// Name of the built-in playlist snapshot, used in the default output file names.
pub const DATASET_NAME: &str = dataset_name!();

/// Default output file for the track metadata export.
pub const DEFAULT_TRACKS_OUTPUT: &str = concat!("spotify_tracks_info(", dataset_name!(), ").csv");

/// Default output file for the artist genre export.
pub const DEFAULT_GENRES_OUTPUT: &str = concat!("spotify_genres(", dataset_name!(), ").csv");

/// Hand-maintained snapshot of the "Trending Now Tamil" playlist.
///
/// The last entry repeats the 15th; duplicates are kept so they show up twice
/// in the output.
pub const TRENDING_NOW_TAMIL: &[&str] = &[
    "https://open.spotify.com/track/6SZgnc7BvRmSXErk0hyXkq",
    "https://open.spotify.com/track/2JlzHPGIVaLNAppX1viq7f",
    "https://open.spotify.com/track/361FMJC5uRSXzato4NE5Zg",
    "https://open.spotify.com/track/1uQU9b93tlMlMoZ0h2bRgf",
    "https://open.spotify.com/track/0Vh3jGxKhm9KxzQgnfnIV6",
    "https://open.spotify.com/track/6g3pwMsCrqV5HcxF6p99GB",
    "https://open.spotify.com/track/3MELuNUntwMZwsNK9zNxJi",
    "https://open.spotify.com/track/6DhffBxB0edyANDTYtKSbI",
    "https://open.spotify.com/track/2SD9x7M7leWlQr2JCm0iH4",
    "https://open.spotify.com/track/67Wp0iVQWeH3lwQAuIdthY",
    "https://open.spotify.com/track/3YH8zD0ycqxKtk6xTyW4w3",
    "https://open.spotify.com/track/12zT7djETGfDeL6JIVjM2b",
    "https://open.spotify.com/track/7HmYlNxtnnLdHQb7U9pFxm",
    "https://open.spotify.com/track/3jixbQHg5vDuZRNqzordcI",
    "https://open.spotify.com/track/3dHP1GUSR19PB1baWz37LN",
    "https://open.spotify.com/track/5vUumh0QzTwWlla9hK1XJd",
    "https://open.spotify.com/track/1LhiESiiI929TNIdxLBV61",
    "https://open.spotify.com/track/1iY0uzOBbKkIyL56HLwqc3",
    "https://open.spotify.com/track/7dIovld3QsNhYseLcwMJHj",
    "https://open.spotify.com/track/2sThPnkC1gTl1nKhX7ewzZ",
    "https://open.spotify.com/track/28rtWBDUGP8JLEuJ57cwdv",
    "https://open.spotify.com/track/5zgalMo7LWrUPbnv9tgupN",
    "https://open.spotify.com/track/7qw72jXJNBeqIMsqzvBft5",
    "https://open.spotify.com/track/3vxjyhcguZvf5qcX5YNyc8",
    "https://open.spotify.com/track/1kmJ0EvXClJAt0fSSQLX1m",
    "https://open.spotify.com/track/6uHuw5ynf6PFpJ2adWprxu",
    "https://open.spotify.com/track/60NKtVtW65UhstCQHZx0WY",
    "https://open.spotify.com/track/2109dBho14Lqh2wr8goqAP",
    "https://open.spotify.com/track/0MTdYgTZ25sLCO6kVnDoje",
    "https://open.spotify.com/track/7KB0zREYCrQU3refE5x0M3",
    "https://open.spotify.com/track/79Aa3LFIeZpMWTXs8y3Qgk",
    "https://open.spotify.com/track/5mLQsi5t349Wdm9sB07so0",
    "https://open.spotify.com/track/3h9UdkxpoUQxNqS8IeTC4Z",
    "https://open.spotify.com/track/4Dd5XLOdAAmURIZSLThPvH",
    "https://open.spotify.com/track/2PKjUxmdIhPjKS1wwEVqHp",
    "https://open.spotify.com/track/6CvW7N8JjBHmwEfGz2Yxhk",
    "https://open.spotify.com/track/1zzejMGRYKP5XOa3FmzXfa",
    "https://open.spotify.com/track/1hHrBEkN0JIaeFPegy4Xak",
    "https://open.spotify.com/track/0xN4nwgOWg59k0t94CJAj4",
    "https://open.spotify.com/track/1a1xLj9W8libnO9PvJf6ao",
    "https://open.spotify.com/track/35qzjEf7XtwRM7cjfgF55n",
    "https://open.spotify.com/track/5DgY6Ab0vpyUMKnY9ubFOF",
    "https://open.spotify.com/track/13ZISM2bmrMBCRlMzl669x",
    "https://open.spotify.com/track/4uwUk23qJYXHWFJgXWPg9T",
    "https://open.spotify.com/track/161BGczu2fn59QR7EYdjWB",
    "https://open.spotify.com/track/5eSoySxUnx3xsm0FHFgHiv",
    "https://open.spotify.com/track/09ihDlGHKhAKrIqK6JUWNy",
    "https://open.spotify.com/track/7Et1EN5V7xAyPjYOk8nSh3",
    "https://open.spotify.com/track/45THyhjDbYhNU7bDrTTUK6",
    "https://open.spotify.com/track/1pTkmFDgxz09fg6Mu1mBpH",
    "https://open.spotify.com/track/3dHP1GUSR19PB1baWz37LN",
];

fn track_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"track/([a-zA-Z0-9]+)").unwrap())
}

/// Extract the track id from a reference such as
/// `https://open.spotify.com/track/6SZgnc7BvRmSXErk0hyXkq?si=abc`.
///
/// The id is the run of ASCII alphanumerics right after the first `track/`
/// segment; anything after it (query string, trailing slash) is ignored.
pub fn parse_track_id(reference: &str) -> Result<String> {
    track_id_pattern()
        .captures(reference)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| CatalogError::InvalidReference(reference.to_string()))
}

/// Load references from a text file, one per line.
///
/// Blank lines and lines starting with `#` are skipped. Order and duplicates
/// are preserved; the lines are not validated here, so a malformed line fails
/// later for that reference only.
pub fn load_references(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;

    let references: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    log::debug!(
        "Loaded {} references from {}",
        references.len(),
        path.display()
    );
    Ok(references)
}
