//! # sonobot-sonos
//!
//! Sonos speaker control over UPnP/SOAP: transport, queue, play mode, volume
//! and saved playlists. Spotify URIs are translated into the speaker's own
//! queue URI scheme before being enqueued.

pub mod device;
pub mod error;
pub mod services;
pub mod soap;
pub mod spotify;
pub mod xml;

pub use device::SonosDevice;
pub use error::{SoapError, SoapResult};
pub use spotify::SpotifyRegion;
