//! Spotify Web API response shapes and their mapping onto catalog results.

use serde::Deserialize;
use sonobot_core::model::{AlbumResult, PlaylistResult, SearchResult, TrackResult};

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// `/v1/search` response. Only the section matching `type` is present.
#[derive(Deserialize, Default)]
pub(crate) struct SearchResponse {
    pub tracks: Option<Page<Track>>,
    pub albums: Option<Page<Album>>,
    pub playlists: Option<Page<Playlist>>,
}

/// Spotify returns `null` for removed entries, notably in playlist results.
#[derive(Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
}

#[derive(Deserialize)]
pub(crate) struct Image {
    pub url: String,
}

#[derive(Deserialize)]
pub(crate) struct Artist {
    pub name: String,
}

#[derive(Deserialize)]
pub(crate) struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
    #[serde(default)]
    pub duration_ms: u64,
    pub uri: String,
}

#[derive(Deserialize)]
pub(crate) struct Album {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub total_tracks: u32,
    pub release_date: Option<String>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Deserialize)]
pub(crate) struct Owner {
    pub display_name: Option<String>,
    #[serde(default)]
    pub id: String,
}

#[derive(Deserialize)]
pub(crate) struct TrackCount {
    #[serde(default)]
    pub total: u32,
}

#[derive(Deserialize)]
pub(crate) struct Playlist {
    pub name: String,
    pub owner: Option<Owner>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    pub tracks: Option<TrackCount>,
    pub uri: String,
}

fn first_artist(artists: &[Artist]) -> String {
    artists.first().map(|a| a.name.clone()).unwrap_or_default()
}

/// Images are ordered largest first; chat previews want the smallest.
fn smallest(images: &[Image]) -> Option<String> {
    images.last().map(|i| i.url.clone())
}

impl From<Track> for TrackResult {
    fn from(t: Track) -> Self {
        let (album, image_url, release_date) = match t.album {
            Some(a) => (a.name, smallest(&a.images), a.release_date),
            None => (String::new(), None, None),
        };
        TrackResult {
            title: t.name,
            artist: first_artist(&t.artists),
            album,
            image_url,
            duration_secs: t.duration_ms / 1000,
            release_date,
            uri: t.uri,
        }
    }
}

impl From<Album> for AlbumResult {
    fn from(a: Album) -> Self {
        AlbumResult {
            artist: first_artist(&a.artists),
            image_url: smallest(&a.images),
            title: a.name,
            total_tracks: a.total_tracks,
            release_date: a.release_date,
            uri: a.uri,
        }
    }
}

impl From<Playlist> for PlaylistResult {
    fn from(p: Playlist) -> Self {
        PlaylistResult {
            title: p.name,
            owner: p
                .owner
                .map(|o| o.display_name.unwrap_or(o.id))
                .unwrap_or_default(),
            image_url: p.images.and_then(|i| i.into_iter().next()).map(|i| i.url),
            total_tracks: p.tracks.map(|t| t.total).unwrap_or(0),
            uri: p.uri,
        }
    }
}

impl SearchResponse {
    /// Flatten into catalog results, skipping null entries, at most `limit`.
    pub fn into_results(self, limit: usize) -> Vec<SearchResult> {
        fn collect<T, R>(page: Option<Page<T>>, wrap: impl Fn(T) -> R) -> Vec<R> {
            page.map(|p| p.items.into_iter().flatten().map(wrap).collect())
                .unwrap_or_default()
        }

        let mut results = collect(self.tracks, |t| SearchResult::Track(t.into()));
        results.extend(collect(self.albums, |a| SearchResult::Album(a.into())));
        results.extend(collect(self.playlists, |p| SearchResult::Playlist(p.into())));
        results.truncate(limit);
        results
    }
}
