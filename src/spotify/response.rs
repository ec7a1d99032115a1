//! Subset of the `GET /me/player/currently-playing` payload that is needed to build a
//! [`NowPlaying`](super::NowPlaying) snapshot. Unknown fields are ignored.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CurrentlyPlaying {
    pub is_playing: bool,
    /// `null` while an advert is playing
    pub progress_ms: Option<u64>,
    /// `null` when the current item can not be resolved
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Track {
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    pub artists: Vec<SimplifiedArtist>,
    pub album: Album,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Album {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimplifiedArtist {
    pub name: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
