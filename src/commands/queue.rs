//! Queue and saved-playlist commands.

use super::{CommandError, Orchestrator};
use sonobot_core::{
    format::{code_block, format_duration},
    model::{SearchKind, SearchResult},
};
use tracing::info;

impl Orchestrator {
    /// Search, take the top track, enqueue it, report where it landed.
    pub(super) async fn add(&self, query: &str) -> Result<String, CommandError> {
        let results = self
            .catalog
            .search(SearchKind::Track, query, self.search_limit)
            .await?;

        let Some(SearchResult::Track(track)) = results.into_iter().next() else {
            return Err(CommandError::NotFound("No songs found! :(".into()));
        };

        let queued = self.device.enqueue(&track.uri).await?;
        info!(
            "queued '{} - {}' at {}/{}",
            track.artist, track.title, queued.first_position, queued.new_length
        );

        let mut lines = Vec::with_capacity(3);
        if let Some(image) = &track.image_url {
            lines.push(image.clone());
        }
        lines.push(format!(
            "Sure thing! *{}* - *{} ({})* has been added to the queue!",
            track.artist, track.title, track.album
        ));
        lines.push(format!(
            "Position *{}* out of *{}* in playlist",
            queued.first_position, queued.new_length
        ));
        Ok(lines.join("\n"))
    }

    /// Remove the item at a 1-based position and name what was removed.
    pub(super) async fn remove(&self, position: i64) -> Result<String, CommandError> {
        let queue = self.device.queue().await?;
        let entry = usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|i| queue.get(i))
            .ok_or_else(|| {
                CommandError::NotFound(format!("There is no song at position *{position}*"))
            })?;

        self.device.remove_at(entry.position).await?;

        Ok(format!(
            "*{}* - *{} ({})* has been removed from the playlist",
            entry.artist, entry.title, entry.album
        ))
    }

    pub(super) async fn list_queue(&self) -> Result<String, CommandError> {
        let queue = self.device.queue().await?;
        if queue.is_empty() {
            return Ok("The playlist is empty!".into());
        }

        let songs: Vec<String> = queue
            .iter()
            .map(|e| format!("{}. {} - {} ({})", e.position, e.artist, e.title, e.album))
            .collect();
        let s = self.device.current_track().await?;

        Ok(format!(
            ":notes: Currently playing #{}: *{}* - *{}* ({} / {}) :notes:\n{}",
            s.queue_position,
            s.artist,
            s.title,
            format_duration(s.position_secs),
            format_duration(s.duration_secs),
            code_block(&songs)
        ))
    }

    pub(super) async fn list_playlists(&self) -> Result<String, CommandError> {
        let playlists = self.device.saved_playlists().await?;
        if playlists.is_empty() {
            return Ok("There are no saved playlists!".into());
        }

        let lines: Vec<String> = playlists
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p.title))
            .collect();
        Ok(format!(
            ":notebook: There are *{}* playlists saved:\n{}",
            playlists.len(),
            code_block(&lines)
        ))
    }

    pub(super) async fn create_playlist(&self, name: &str) -> Result<String, CommandError> {
        self.device.create_playlist(name).await?;
        Ok(format!("Playlist *{name}* successfully created!"))
    }

    /// Replace the queue with the saved playlist numbered `id` (as listed by
    /// `playlists`) and start it.
    pub(super) async fn set_playlist(&self, id: i64) -> Result<String, CommandError> {
        let playlists = self.device.saved_playlists().await?;
        if playlists.is_empty() {
            return Err(CommandError::NotFound("There are no saved playlists!".into()));
        }

        let playlist = usize::try_from(id)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|i| playlists.get(i))
            .ok_or_else(|| CommandError::NotFound(format!("There is no playlist with ID *{id}*!")))?;

        self.device.load_playlist(playlist).await?;
        Ok(format!(":notes: Playlist *{}* now playing! :notes:", playlist.title))
    }
}
