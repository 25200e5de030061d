//! Spotify URIs as Sonos queue entries.
//!
//! Sonos only enqueues Spotify content when handed its own URI scheme plus a
//! DIDL-Lite descriptor naming the Spotify service account for the region.

use crate::xml::escape_xml;

/// Spotify service account region on the speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotifyRegion {
    Europe,
    NorthAmerica,
}

impl SpotifyRegion {
    /// `US` maps to the North American account; every other market to Europe.
    pub fn from_market(market: &str) -> Self {
        if market.eq_ignore_ascii_case("US") {
            Self::NorthAmerica
        } else {
            Self::Europe
        }
    }

    fn service_id(self) -> &'static str {
        match self {
            Self::Europe => "2311",
            Self::NorthAmerica => "3079",
        }
    }
}

/// Kinds of Spotify content the speaker can queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpotifyKind {
    Track,
    Album,
    Playlist,
}

impl SpotifyKind {
    fn of(uri: &str) -> Option<Self> {
        let mut parts = uri.split(':');
        if parts.next() != Some("spotify") {
            return None;
        }
        // `spotify:user:<id>:playlist:<id>` is the legacy playlist form.
        parts.find_map(|p| match p {
            "track" => Some(Self::Track),
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            _ => None,
        })
    }
}

/// `EnqueuedURI` and `EnqueuedURIMetaData` for `AddURIToQueue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SonosEnqueue {
    pub uri: String,
    pub metadata: String,
}

/// Translate a `spotify:` URI. Returns `None` for anything else.
pub fn to_sonos(spotify_uri: &str, region: SpotifyRegion) -> Option<SonosEnqueue> {
    let kind = SpotifyKind::of(spotify_uri)?;
    let encoded = spotify_uri.replace(':', "%3a");

    let (uri, item_id, class) = match kind {
        SpotifyKind::Track => (
            format!("x-sonos-spotify:{encoded}?sid=9&flags=8224&sn=7"),
            format!("00032020{encoded}"),
            "object.item.audioItem.musicTrack",
        ),
        SpotifyKind::Album => (
            format!("x-rincon-cpcontainer:0004206c{encoded}"),
            format!("0004206c{encoded}"),
            "object.container.album.musicAlbum",
        ),
        SpotifyKind::Playlist => (
            format!("x-rincon-cpcontainer:1006206c{encoded}"),
            format!("1006206c{encoded}"),
            "object.container.playlistContainer",
        ),
    };

    let sid = region.service_id();
    let metadata = format!(
        concat!(
            r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
            r#"xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" "#,
            r#"xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" "#,
            r#"xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/">"#,
            r#"<item id="{id}" restricted="true"><dc:title></dc:title>"#,
            r#"<upnp:class>{class}</upnp:class>"#,
            r#"<desc id="cdudn" nameSpace="urn:schemas-rinconnetworks-com:metadata-1-0/">"#,
            r#"SA_RINCON{sid}_X_#Svc{sid}-0-Token</desc></item></DIDL-Lite>"#
        ),
        id = escape_xml(&item_id),
        class = class,
        sid = sid,
    );

    Some(SonosEnqueue { uri, metadata })
}
