use serde::Serialize;

use super::response::CurrentlyPlaying;
use crate::Error;

/// Flat snapshot of the track playing at the moment of one poll tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub album_image_url: String,
    /// Track artist names joined with `", "`
    pub artist: String,
    pub is_playing: bool,
    pub song_url: String,
    pub title: String,
    /// Elapsed milliseconds
    pub time_played: u64,
    /// Track length in milliseconds
    pub time_total: u64,
    /// Url of the first artist listed on the album, which can differ from the first
    /// track artist on features and compilations.
    pub artist_url: String,
}

impl TryFrom<CurrentlyPlaying> for NowPlaying {
    type Error = Error;

    fn try_from(playing: CurrentlyPlaying) -> Result<Self, Self::Error> {
        let track = playing
            .item
            .ok_or_else(|| Error::parse("item: no track in response"))?;

        let album_image_url = track
            .album
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| Error::parse("item.album.images: empty"))?;

        let artist_url = track
            .album
            .artists
            .into_iter()
            .next()
            .and_then(|mut artist| artist.external_urls.remove("spotify"))
            .ok_or_else(|| Error::parse("item.album.artists[0].external_urls.spotify: missing"))?;

        let mut external_urls = track.external_urls;
        let song_url = external_urls
            .remove("spotify")
            .ok_or_else(|| Error::parse("item.external_urls.spotify: missing"))?;

        let artist = track
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            album_image_url,
            artist,
            is_playing: playing.is_playing,
            song_url,
            title: track.name,
            time_played: playing.progress_ms.unwrap_or_default(),
            time_total: track.duration_ms,
            artist_url,
        })
    }
}
