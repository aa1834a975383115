use crate::projection::Projection;
use crate::reference::parse_track_id;
use crate::{CatalogClient, CatalogError, Result};
use std::fmt;

/// A reference that could not be turned into a row, and why.
#[derive(Debug)]
pub struct ExtractionFailure {
    /// The reference exactly as it appeared in the input
    pub reference: String,
    pub error: CatalogError,
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to process {}: {}", self.reference, self.error)
    }
}

/// Outcome of one extraction run.
///
/// `rows` holds one row per successfully resolved reference in input order;
/// `failures` holds every other reference, also in input order.
#[derive(Debug)]
pub struct Extraction<R> {
    pub rows: Vec<R>,
    pub failures: Vec<ExtractionFailure>,
}

impl<R> Extraction<R> {
    /// True when every reference produced a row.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of references processed.
    pub fn attempted(&self) -> usize {
        self.rows.len() + self.failures.len()
    }
}

/// Resolve every reference through `client` and flatten it with `projection`.
///
/// References are processed strictly one after another. A failure at any step
/// (unparseable reference, failed lookup, missing field) drops that reference,
/// is logged and recorded in [`Extraction::failures`], and the run moves on.
/// Nothing is retried and no partial row is kept.
///
/// # Examples
///
/// ```rust,no_run
/// # use spotify_extract::{extract, ClientCredentials, GenreProjection, SpotifyClient};
/// # tokio_test::block_on(async {
/// let client = SpotifyClient::new(
///     Box::new(http_client::native::NativeClient::new()),
///     ClientCredentials::from_env()?,
/// );
/// let references = ["https://open.spotify.com/track/6SZgnc7BvRmSXErk0hyXkq"];
///
/// let extraction = extract(&client, &GenreProjection, &references).await;
/// for failure in &extraction.failures {
///     eprintln!("{failure}");
/// }
/// println!("{} rows", extraction.rows.len());
/// # Ok::<(), spotify_extract::CatalogError>(())
/// # });
/// ```
pub async fn extract<C, P, S>(client: &C, projection: &P, references: &[S]) -> Extraction<P::Row>
where
    C: CatalogClient + ?Sized,
    P: Projection,
    S: AsRef<str>,
{
    let mut rows = Vec::with_capacity(references.len());
    let mut failures = Vec::new();

    for (index, reference) in references.iter().enumerate() {
        let reference = reference.as_ref();

        match extract_one(client, projection, reference).await {
            Ok(row) => {
                log::debug!(
                    "[{}/{}] Extracted {reference}",
                    index + 1,
                    references.len()
                );
                rows.push(row);
            }
            Err(error) => {
                let failure = ExtractionFailure {
                    reference: reference.to_string(),
                    error,
                };
                log::warn!("{failure}");
                failures.push(failure);
            }
        }
    }

    log::info!(
        "Extracted {} of {} references ({} failed)",
        rows.len(),
        references.len(),
        failures.len()
    );

    Extraction { rows, failures }
}

async fn extract_one<C, P>(client: &C, projection: &P, reference: &str) -> Result<P::Row>
where
    C: CatalogClient + ?Sized,
    P: Projection,
{
    let track_id = parse_track_id(reference)?;
    let track = client.get_track(&track_id).await?;

    let primary_artist = track.primary_artist().ok_or_else(|| {
        CatalogError::MissingField(format!("track {} has no artists", track.id))
    })?;

    let artist = if projection.requires_artist() {
        let artist_id = primary_artist.id.as_deref().ok_or_else(|| {
            CatalogError::MissingField(format!(
                "primary artist '{}' of track {} has no id",
                primary_artist.name, track.id
            ))
        })?;
        Some(client.get_artist(artist_id).await?)
    } else {
        None
    };

    projection.project(&track, artist.as_ref())
}
