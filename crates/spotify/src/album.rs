use crate::{artist::ArtistRef, id::AlbumId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` depending on `release_date_precision`
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub total_tracks: u32,
}

impl Album {
    /// The credited primary artist, if upstream listed any.
    pub fn primary_artist(&self) -> Option<&ArtistRef> {
        self.artists.first()
    }
}

/// Cover art, ordered widest first by upstream.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
