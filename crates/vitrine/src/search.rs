use futures::{StreamExt, stream::FuturesOrdered};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::Serialize;
use spotify::{
    AccessToken, Spotify, SpotifyError,
    album::{Album, Image},
    id::{AlbumId, ArtistId},
};
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error;
use tokio::sync::Semaphore;

/// Number of single-letter searches issued when no term is given.
pub const DISCOVERY_TERMS: usize = 10;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to authenticate with spotify: {0}")]
    Auth(#[from] SpotifyError),
}

/// Picks the letters used for discovery searches.
pub trait LetterSource: Send + Sync {
    /// One lowercase ASCII letter.
    fn letter(&self) -> char;
}

/// Uniform draw over `a..=z` from the thread-local rng.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomLetters;

impl LetterSource for RandomLetters {
    fn letter(&self) -> char {
        ALPHABET
            .choose(&mut rand::rng())
            .map(|b| *b as char)
            .unwrap_or('a')
    }
}

/// Reproducible letter sequence for a fixed seed.
#[derive(Debug)]
pub struct SeededLetters(Mutex<StdRng>);

impl SeededLetters {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl LetterSource for SeededLetters {
    fn letter(&self) -> char {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        ALPHABET
            .choose(&mut *rng)
            .map(|b| *b as char)
            .unwrap_or('a')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub id: AlbumId,
    pub album: String,
    pub ano: String,
    pub artista: String,
    pub imagem: Option<String>,
    pub faixas: u32,
    pub generos: Vec<String>,
}

impl ResultItem {
    fn new(album: Album, generos: Vec<String>) -> Self {
        let artista = album
            .primary_artist()
            .map(|a| a.name.clone())
            .unwrap_or_default();

        Self {
            ano: release_year(&album.release_date),
            imagem: thumbnail(&album.images),
            id: album.id,
            album: album.name,
            artista,
            faixas: album.total_tracks,
            generos,
        }
    }
}

/// Upstream dates are `YYYY[-MM[-DD]]`, so the year is the first four chars.
fn release_year(release_date: &str) -> String {
    release_date.chars().take(4).collect()
}

// images come widest first; the second one is a mid-sized thumbnail, and a
// lone image stands in for it
fn thumbnail(images: &[Image]) -> Option<String> {
    images
        .get(1)
        .or_else(|| images.first())
        .map(|image| image.url.clone())
}

/// A non-empty term is searched as given, whitespace included; otherwise one
/// random letter per discovery search.
pub fn query_terms(term: Option<&str>, letters: &dyn LetterSource) -> Vec<String> {
    match term.filter(|t| !t.is_empty()) {
        Some(term) => vec![term.to_owned()],
        None => (0..DISCOVERY_TERMS)
            .map(|_| letters.letter().to_string())
            .collect(),
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    client: Spotify,
    letters: Arc<dyn LetterSource>,
    concurrency: usize,
}

impl Orchestrator {
    pub fn new(client: Spotify, concurrency: usize) -> Self {
        Self {
            client,
            letters: Arc::new(RandomLetters),
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_letters(mut self, letters: impl LetterSource + 'static) -> Self {
        self.letters = Arc::new(letters);
        self
    }

    /// Searches albums for `term` (or a discovery sample when absent) and
    /// attaches the primary artist's genres to each.
    ///
    /// Only a failure to obtain an access token is returned as an error. A
    /// failed search drops that term's results and a failed artist lookup
    /// leaves the album's genres empty.
    pub async fn search(
        &self,
        term: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ResultItem>, SearchError> {
        let terms = query_terms(term, self.letters.as_ref());
        let token = self.client.access_token().await?;
        let semaphore = Semaphore::new(self.concurrency);

        tracing::debug!(?terms, limit, "searching");

        let mut searches: FuturesOrdered<_> = terms
            .iter()
            .map(|term| self.search_term(&token, term, limit, &semaphore))
            .collect();

        let mut results = Vec::new();
        while let Some(items) = searches.next().await {
            results.extend(items);
        }

        tracing::info!(
            terms = terms.len(),
            results = results.len(),
            "search finished"
        );

        Ok(results)
    }

    async fn search_term(
        &self,
        token: &AccessToken,
        term: &str,
        limit: u32,
        semaphore: &Semaphore,
    ) -> Vec<ResultItem> {
        let albums = match limited(semaphore, self.client.search_albums(token, term, limit)).await
        {
            Ok(albums) => albums,
            Err(e) => {
                tracing::warn!(term, error = %e, "album search failed, skipping term");
                return Vec::new();
            }
        };

        tracing::debug!(term, albums = albums.len(), "album search returned");

        albums
            .into_iter()
            .map(|album| self.enrich(token, album, semaphore))
            .collect::<FuturesOrdered<_>>()
            .collect()
            .await
    }

    async fn enrich(&self, token: &AccessToken, album: Album, semaphore: &Semaphore) -> ResultItem {
        let generos = match album.primary_artist() {
            Some(artist) => self.genres(token, &artist.id, semaphore).await,
            None => {
                tracing::warn!(album_id = %album.id, "album lists no artists");
                Vec::new()
            }
        };

        ResultItem::new(album, generos)
    }

    async fn genres(&self, token: &AccessToken, id: &ArtistId, semaphore: &Semaphore) -> Vec<String> {
        match limited(semaphore, self.client.artist(token, id)).await {
            Ok(artist) => artist.genres,
            Err(e) => {
                tracing::warn!(artist_id = %id, error = %e, "artist lookup failed, leaving genres empty");
                Vec::new()
            }
        }
    }
}

/// Runs `fut` while holding one permit. The permit is released as soon as the
/// call returns, so nested fan-out never waits on its own parent.
async fn limited<F: Future>(semaphore: &Semaphore, fut: F) -> F::Output {
    // acquire only fails on a closed semaphore, and this one is never closed
    let _permit = semaphore.acquire().await;
    fut.await
}
