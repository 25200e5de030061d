//! Domain model shared by the orchestrator and the adapters.
//!
//! Every value here is transient: it is fetched fresh from the device or
//! catalog for a single command and dropped when the reply is sent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device play mode. Closed set, mirrors the UPnP `PlayMode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayMode {
    Normal,
    RepeatOne,
    RepeatAll,
    Shuffle,
    ShuffleNorepeat,
    ShuffleRepeatOne,
}

impl PlayMode {
    /// All recognised modes, in display order.
    pub const ALL: [PlayMode; 6] = [
        PlayMode::Normal,
        PlayMode::RepeatOne,
        PlayMode::RepeatAll,
        PlayMode::Shuffle,
        PlayMode::ShuffleNorepeat,
        PlayMode::ShuffleRepeatOne,
    ];

    /// Wire value sent to and received from the device.
    pub fn as_upnp(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::RepeatOne => "REPEAT_ONE",
            Self::RepeatAll => "REPEAT_ALL",
            Self::Shuffle => "SHUFFLE",
            Self::ShuffleNorepeat => "SHUFFLE_NOREPEAT",
            Self::ShuffleRepeatOne => "SHUFFLE_REPEAT_ONE",
        }
    }

    /// Parse an exact wire value.
    pub fn from_upnp(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_upnp() == value)
    }
}

/// Human form: lower-case words separated by spaces (`repeat one`).
impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_upnp().to_lowercase().replace('_', " "))
    }
}

/// Error returned when free text does not name one of the six play modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlayMode(pub String);

impl fmt::Display for UnknownPlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown play mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownPlayMode {}

/// Parses free text ("repeat one", "Repeat-One", "repeatOne", "REPEAT_ONE").
impl FromStr for PlayMode {
    type Err = UnknownPlayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_play_mode(s);
        Self::from_upnp(&normalized).ok_or(UnknownPlayMode(normalized))
    }
}

/// Normalize free text into the upper snake form used on the wire.
///
/// Words are split on any non-alphanumeric character, on lower-to-upper case
/// transitions and on letter/digit transitions.
pub fn normalize_play_mode(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in input.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let boundary = (p.is_lowercase() && c.is_uppercase())
                || (p.is_alphabetic() && c.is_numeric())
                || (p.is_numeric() && c.is_alphabetic());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_").to_uppercase()
}

/// One item of the device play queue. `position` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub position: usize,
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// What the device is playing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub artist: String,
    pub title: String,
    pub position_secs: u64,
    pub duration_secs: u64,
    /// 1-based position of the current track in the queue (0 when not playing from it).
    pub queue_position: usize,
}

/// Result of adding a URI to the device queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueResult {
    /// 1-based position of the first enqueued track.
    pub first_position: usize,
    pub new_length: usize,
}

/// A playlist saved on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlaylist {
    /// Device object id (e.g. `SQ:3`).
    pub id: String,
    pub title: String,
    /// Resource URI used to load the playlist into the queue.
    pub uri: String,
}

/// What kind of catalog object a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Track,
    Album,
    Playlist,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Playlist => "playlist",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResult {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub image_url: Option<String>,
    pub duration_secs: u64,
    pub release_date: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumResult {
    pub title: String,
    pub artist: String,
    pub image_url: Option<String>,
    pub total_tracks: u32,
    pub release_date: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistResult {
    pub title: String,
    pub owner: String,
    pub image_url: Option<String>,
    pub total_tracks: u32,
    pub uri: String,
}

/// A normalized catalog search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchResult {
    Track(TrackResult),
    Album(AlbumResult),
    Playlist(PlaylistResult),
}

impl SearchResult {
    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Track(_) => SearchKind::Track,
            Self::Album(_) => SearchKind::Album,
            Self::Playlist(_) => SearchKind::Playlist,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Track(t) => &t.title,
            Self::Album(a) => &a.title,
            Self::Playlist(p) => &p.title,
        }
    }

    /// Artist for tracks and albums, owner for playlists.
    pub fn artist(&self) -> &str {
        match self {
            Self::Track(t) => &t.artist,
            Self::Album(a) => &a.artist,
            Self::Playlist(p) => &p.owner,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Track(t) => t.image_url.as_deref(),
            Self::Album(a) => a.image_url.as_deref(),
            Self::Playlist(p) => p.image_url.as_deref(),
        }
    }

    pub fn release_date(&self) -> Option<&str> {
        match self {
            Self::Track(t) => t.release_date.as_deref(),
            Self::Album(a) => a.release_date.as_deref(),
            Self::Playlist(_) => None,
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::Track(t) => &t.uri,
            Self::Album(a) => &a.uri,
            Self::Playlist(p) => &p.uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_play_mode_variants() {
        assert_eq!(normalize_play_mode("repeat one"), "REPEAT_ONE");
        assert_eq!(normalize_play_mode("Repeat-One"), "REPEAT_ONE");
        assert_eq!(normalize_play_mode("repeatOne"), "REPEAT_ONE");
        assert_eq!(normalize_play_mode("  shuffle   norepeat "), "SHUFFLE_NOREPEAT");
        assert_eq!(normalize_play_mode("SHUFFLE_REPEAT_ONE"), "SHUFFLE_REPEAT_ONE");
        assert_eq!(normalize_play_mode(""), "");
    }

    #[test]
    fn test_play_mode_from_str() {
        assert_eq!("normal".parse::<PlayMode>(), Ok(PlayMode::Normal));
        assert_eq!("shuffle".parse::<PlayMode>(), Ok(PlayMode::Shuffle));
        assert_eq!(
            "shuffle repeat one".parse::<PlayMode>(),
            Ok(PlayMode::ShuffleRepeatOne)
        );
        assert_eq!(
            "party".parse::<PlayMode>(),
            Err(UnknownPlayMode("PARTY".to_string()))
        );
    }

    #[test]
    fn test_play_mode_display_is_lower_words() {
        assert_eq!(PlayMode::RepeatAll.to_string(), "repeat all");
        assert_eq!(PlayMode::ShuffleNorepeat.to_string(), "shuffle norepeat");
        assert_eq!(PlayMode::Normal.to_string(), "normal");
    }

    #[test]
    fn test_play_mode_round_trips_wire_values() {
        for mode in PlayMode::ALL {
            assert_eq!(PlayMode::from_upnp(mode.as_upnp()), Some(mode));
        }
        assert_eq!(PlayMode::from_upnp("normal"), None);
    }

    #[test]
    fn test_search_result_accessors() {
        let playlist = SearchResult::Playlist(PlaylistResult {
            title: "Focus".into(),
            owner: "spotify".into(),
            image_url: None,
            total_tracks: 50,
            uri: "spotify:playlist:abc".into(),
        });
        assert_eq!(playlist.kind(), SearchKind::Playlist);
        assert_eq!(playlist.artist(), "spotify");
        assert_eq!(playlist.release_date(), None);
        assert_eq!(playlist.uri(), "spotify:playlist:abc");
    }
}
