//! Sonos UPnP service definitions.

/// Sonos UPnP services used for control.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SonosService {
    /// Transport control and queue manipulation.
    AVTransport,
    /// Per-speaker volume.
    RenderingControl,
    /// Browsing the queue (`Q:0`) and saved playlists (`SQ:`).
    ContentDirectory,
}

impl SonosService {
    /// Returns the UPnP service URN for SOAP requests.
    pub fn urn(&self) -> &'static str {
        match self {
            Self::AVTransport => "urn:schemas-upnp-org:service:AVTransport:1",
            Self::RenderingControl => "urn:schemas-upnp-org:service:RenderingControl:1",
            Self::ContentDirectory => "urn:schemas-upnp-org:service:ContentDirectory:1",
        }
    }

    /// Returns the UPnP control endpoint path for SOAP requests.
    pub fn control_path(&self) -> &'static str {
        match self {
            Self::AVTransport => "/MediaRenderer/AVTransport/Control",
            Self::RenderingControl => "/MediaRenderer/RenderingControl/Control",
            Self::ContentDirectory => "/MediaServer/ContentDirectory/Control",
        }
    }
}
