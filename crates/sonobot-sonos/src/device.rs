//! High-level Sonos speaker control built on the SOAP layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sonobot_core::{
    config::SonosConfig,
    error::SonobotError,
    model::{EnqueueResult, PlayMode, PlaybackState, QueueEntry, SavedPlaylist},
    traits::Device,
};
use tracing::{debug, info};

use crate::error::{SoapError, SoapResult};
use crate::services::SonosService;
use crate::soap::SoapRequestBuilder;
use crate::spotify::{to_sonos, SpotifyRegion};
use crate::xml::{extract_xml_text, parse_didl, parse_hms, DidlItem};

/// Items requested per ContentDirectory `Browse` page.
const BROWSE_PAGE: usize = 100;

/// A single Sonos speaker addressed by IP.
pub struct SonosDevice {
    client: Client,
    base_url: String,
    region: SpotifyRegion,
}

impl SonosDevice {
    /// `market` picks the Spotify service account used in queue metadata.
    pub fn new(config: &SonosConfig, market: &str) -> Result<Self, SonobotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SonobotError::Device(format!("http client: {e}")))?;
        Ok(Self::with_client(
            client,
            &format!("http://{}:{}", config.ip, config.port),
            SpotifyRegion::from_market(market),
        ))
    }

    pub fn with_client(client: Client, base_url: &str, region: SpotifyRegion) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            region,
        }
    }

    fn request(&self, service: SonosService, action: &'static str) -> SoapRequestBuilder<'_> {
        SoapRequestBuilder::new(&self.client, &self.base_url)
            .service(service)
            .action(action)
    }

    fn av(&self, action: &'static str) -> SoapRequestBuilder<'_> {
        self.request(SonosService::AVTransport, action).instance_id()
    }

    /// The speaker's `RINCON_...` id, read from its device description.
    async fn rincon_id(&self) -> SoapResult<String> {
        let url = format!("{}/xml/device_description.xml", self.base_url);
        let body = self.client.get(&url).send().await?.text().await?;
        let udn = extract_xml_text(&body, "UDN").ok_or(SoapError::Parse("device description"))?;
        Ok(udn.trim_start_matches("uuid:").to_string())
    }

    /// Transport commands answer `false` when the speaker refuses the
    /// transition (UPnP 701), e.g. `Next` on the last track.
    async fn transport(&self, builder: SoapRequestBuilder<'_>, action: &str) -> Result<bool, SonobotError> {
        match builder.send().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_transition_unavailable() => {
                debug!("[Sonos] {action} not available in current state");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Browse every child of a ContentDirectory container, following pages.
    async fn browse_all(&self, object_id: &str) -> SoapResult<Vec<DidlItem>> {
        let mut items = Vec::new();
        loop {
            let response = self
                .request(SonosService::ContentDirectory, "Browse")
                .arg("ObjectID", object_id)
                .arg("BrowseFlag", "BrowseDirectChildren")
                .arg("Filter", "*")
                .arg("StartingIndex", items.len().to_string())
                .arg("RequestedCount", BROWSE_PAGE.to_string())
                .arg("SortCriteria", "")
                .send()
                .await?;

            let result = extract_xml_text(&response, "Result").ok_or(SoapError::Parse("Browse"))?;
            let returned: usize = extract_xml_text(&response, "NumberReturned")
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);
            let total: usize = extract_xml_text(&response, "TotalMatches")
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);

            let page = parse_didl(&result);
            if returned == 0 || page.is_empty() {
                break;
            }
            items.extend(page);
            if items.len() >= total {
                break;
            }
        }
        Ok(items)
    }

    async fn add_to_queue(&self, uri: &str, metadata: &str) -> SoapResult<EnqueueResult> {
        let response = self
            .av("AddURIToQueue")
            .arg("EnqueuedURI", uri)
            .arg("EnqueuedURIMetaData", metadata)
            .arg("DesiredFirstTrackNumberEnqueued", "0")
            .arg("EnqueueAsNext", "0")
            .send()
            .await?;

        let number = |field: &str| {
            extract_xml_text(&response, field)
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or(SoapError::Parse("AddURIToQueue"))
        };
        Ok(EnqueueResult {
            first_position: number("FirstTrackNumberEnqueued")?,
            new_length: number("NewQueueLength")?,
        })
    }
}

#[async_trait]
impl Device for SonosDevice {
    fn name(&self) -> &str {
        "sonos"
    }

    async fn current_track(&self) -> Result<PlaybackState, SonobotError> {
        let response = self.av("GetPositionInfo").send().await?;

        let queue_position = extract_xml_text(&response, "Track")
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let duration_secs = extract_xml_text(&response, "TrackDuration")
            .map(|t| parse_hms(&t))
            .unwrap_or(0);
        let position_secs = extract_xml_text(&response, "RelTime")
            .map(|t| parse_hms(&t))
            .unwrap_or(0);
        let meta = extract_xml_text(&response, "TrackMetaData")
            .map(|m| parse_didl(&m))
            .and_then(|items| items.into_iter().next())
            .unwrap_or_default();

        Ok(PlaybackState {
            artist: meta.creator,
            title: meta.title,
            position_secs,
            duration_secs,
            queue_position,
        })
    }

    async fn play(&self) -> Result<bool, SonobotError> {
        self.transport(self.av("Play").arg("Speed", "1"), "Play").await
    }

    async fn pause(&self) -> Result<bool, SonobotError> {
        self.transport(self.av("Pause"), "Pause").await
    }

    async fn stop(&self) -> Result<bool, SonobotError> {
        self.transport(self.av("Stop"), "Stop").await
    }

    async fn next(&self) -> Result<bool, SonobotError> {
        self.transport(self.av("Next"), "Next").await
    }

    async fn previous(&self) -> Result<bool, SonobotError> {
        self.transport(self.av("Previous"), "Previous").await
    }

    async fn select_queue(&self) -> Result<(), SonobotError> {
        let rincon = self.rincon_id().await?;
        self.av("SetAVTransportURI")
            .arg("CurrentURI", format!("x-rincon-queue:{rincon}#0"))
            .arg("CurrentURIMetaData", "")
            .send()
            .await?;
        debug!("[Sonos] transport set to queue of {rincon}");
        Ok(())
    }

    async fn enqueue(&self, uri: &str) -> Result<EnqueueResult, SonobotError> {
        let target = to_sonos(uri, self.region)
            .ok_or_else(|| SonobotError::Device(format!("cannot queue '{uri}'")))?;
        let result = self.add_to_queue(&target.uri, &target.metadata).await?;
        info!(
            "[Sonos] queued {uri} at {} (queue length {})",
            result.first_position, result.new_length
        );
        Ok(result)
    }

    async fn queue(&self) -> Result<Vec<QueueEntry>, SonobotError> {
        let items = self.browse_all("Q:0").await?;
        Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, item)| QueueEntry {
                position: i + 1,
                title: item.title,
                artist: item.creator,
                album: item.album,
            })
            .collect())
    }

    async fn remove_at(&self, position: usize) -> Result<(), SonobotError> {
        self.av("RemoveTrackRangeFromQueue")
            .arg("UpdateID", "0")
            .arg("StartingIndex", position.to_string())
            .arg("NumberOfTracks", "1")
            .send()
            .await?;
        Ok(())
    }

    async fn play_mode(&self) -> Result<PlayMode, SonobotError> {
        let response = self.av("GetTransportSettings").send().await?;
        let raw = extract_xml_text(&response, "PlayMode").ok_or(SoapError::Parse("GetTransportSettings"))?;
        PlayMode::from_upnp(&raw).ok_or_else(|| SonobotError::Device(format!("unknown play mode '{raw}'")))
    }

    async fn set_play_mode(&self, mode: PlayMode) -> Result<(), SonobotError> {
        self.av("SetPlayMode")
            .arg("NewPlayMode", mode.as_upnp())
            .send()
            .await?;
        Ok(())
    }

    async fn volume(&self) -> Result<u8, SonobotError> {
        let response = self
            .request(SonosService::RenderingControl, "GetVolume")
            .instance_id()
            .arg("Channel", "Master")
            .send()
            .await?;
        extract_xml_text(&response, "CurrentVolume")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| SoapError::Parse("GetVolume").into())
    }

    async fn set_volume(&self, level: u8) -> Result<(), SonobotError> {
        self.request(SonosService::RenderingControl, "SetVolume")
            .instance_id()
            .arg("Channel", "Master")
            .arg("DesiredVolume", level.min(100).to_string())
            .send()
            .await?;
        Ok(())
    }

    async fn saved_playlists(&self) -> Result<Vec<SavedPlaylist>, SonobotError> {
        let items = self.browse_all("SQ:").await?;
        Ok(items
            .into_iter()
            .map(|item| SavedPlaylist {
                id: item.id,
                title: item.title,
                uri: item.res,
            })
            .collect())
    }

    async fn create_playlist(&self, name: &str) -> Result<(), SonobotError> {
        self.av("CreateSavedQueue")
            .arg("Title", name)
            .arg("EnqueuedURI", "")
            .arg("EnqueuedURIMetaData", "")
            .send()
            .await?;
        info!("[Sonos] created saved queue '{name}'");
        Ok(())
    }

    async fn load_playlist(&self, playlist: &SavedPlaylist) -> Result<(), SonobotError> {
        self.av("RemoveAllTracksFromQueue").send().await?;
        self.add_to_queue(&playlist.uri, "").await?;
        self.select_queue().await?;
        if !self.play().await? {
            return Err(SonobotError::Device(format!(
                "speaker refused to play '{}'",
                playlist.title
            )));
        }
        info!("[Sonos] loaded saved queue '{}'", playlist.title);
        Ok(())
    }
}
