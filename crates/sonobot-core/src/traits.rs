use crate::{
    error::SonobotError,
    message::{IncomingMessage, OutgoingMessage},
    model::{
        EnqueueResult, PlayMode, PlaybackState, QueueEntry, SavedPlaylist, SearchKind,
        SearchResult,
    },
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every chat platform (Slack, the local console) implements this trait to
/// receive command lines and send replies.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, SonobotError>;

    /// Send a reply back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), SonobotError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), SonobotError>;
}

/// Playback device trait.
///
/// Wraps transport control, queue management, play mode, volume and saved
/// playlists. Implementations do not retry and hold no cached state: every
/// call goes to the device.
///
/// Transport commands return `Ok(false)` when the device answered but did
/// not accept the command.
#[async_trait]
pub trait Device: Send + Sync {
    /// Human-readable device name.
    fn name(&self) -> &str;

    async fn current_track(&self) -> Result<PlaybackState, SonobotError>;

    async fn play(&self) -> Result<bool, SonobotError>;
    async fn pause(&self) -> Result<bool, SonobotError>;
    async fn stop(&self) -> Result<bool, SonobotError>;
    async fn next(&self) -> Result<bool, SonobotError>;
    async fn previous(&self) -> Result<bool, SonobotError>;

    /// Point the transport at the device's own queue.
    async fn select_queue(&self) -> Result<(), SonobotError>;

    /// Append a catalog URI to the queue.
    async fn enqueue(&self, uri: &str) -> Result<EnqueueResult, SonobotError>;

    /// Full queue, in play order, 1-indexed.
    async fn queue(&self) -> Result<Vec<QueueEntry>, SonobotError>;

    /// Remove the item at a 1-based queue position.
    async fn remove_at(&self, position: usize) -> Result<(), SonobotError>;

    async fn play_mode(&self) -> Result<PlayMode, SonobotError>;
    async fn set_play_mode(&self, mode: PlayMode) -> Result<(), SonobotError>;

    async fn volume(&self) -> Result<u8, SonobotError>;
    async fn set_volume(&self, level: u8) -> Result<(), SonobotError>;

    async fn saved_playlists(&self) -> Result<Vec<SavedPlaylist>, SonobotError>;
    async fn create_playlist(&self, name: &str) -> Result<(), SonobotError>;

    /// Replace the queue with a saved playlist and start playing it.
    async fn load_playlist(&self, playlist: &SavedPlaylist) -> Result<(), SonobotError>;
}

/// Music catalog trait.
///
/// Results come back in the service's relevance order, at most `limit` of them.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Human-readable catalog name.
    fn name(&self) -> &str;

    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SonobotError>;
}
