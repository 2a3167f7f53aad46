use crate::id::ArtistId;
use serde::{Deserialize, Serialize};

/// Artist as embedded in other objects (album artist lists).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ArtistRef {
    pub id: ArtistId,
    pub name: String,
}

/// Full artist object from `/v1/artists/{id}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}
