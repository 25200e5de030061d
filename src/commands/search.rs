//! Catalog search listings.

use super::{CommandError, Orchestrator};
use sonobot_core::{
    format::{code_block, pad_right},
    model::{SearchKind, SearchResult},
};

/// Width of the description column before `Released:`.
const DESCRIPTION_WIDTH: usize = 80;

impl Orchestrator {
    pub(super) async fn search(&self, kind: SearchKind, query: &str) -> Result<String, CommandError> {
        let results = self.catalog.search(kind, query, self.search_limit).await?;

        if results.is_empty() {
            let reply = match kind {
                SearchKind::Track => "No songs found! :(",
                SearchKind::Album => "No albums found! :(",
                SearchKind::Playlist => "No playlists found! :(",
            };
            return Err(CommandError::NotFound(reply.into()));
        }

        let lines: Vec<String> = results.iter().map(result_line).collect();
        Ok(code_block(&lines))
    }
}

fn result_line(result: &SearchResult) -> String {
    let released = |date: &Option<String>| date.as_deref().unwrap_or("unknown").to_string();
    match result {
        SearchResult::Track(t) => format!(
            "{} Released: {}",
            pad_right(&format!("{} - {} ({})", t.artist, t.title, t.album), DESCRIPTION_WIDTH),
            released(&t.release_date)
        ),
        SearchResult::Album(a) => format!(
            "{} Released: {}",
            pad_right(
                &format!("{} - {} ({} songs)", a.artist, a.title, a.total_tracks),
                DESCRIPTION_WIDTH
            ),
            released(&a.release_date)
        ),
        SearchResult::Playlist(p) => format!("{} ({} songs)", p.title, p.total_tracks),
    }
}
