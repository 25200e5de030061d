//! In-memory adapters shared by the unit tests.

use async_trait::async_trait;
use sonobot_core::{
    error::SonobotError,
    message::{IncomingMessage, OutgoingMessage, ReplyTarget},
    model::{
        EnqueueResult, PlayMode, PlaybackState, QueueEntry, SavedPlaylist, SearchKind,
        SearchResult, TrackResult,
    },
    traits::{Catalog, Channel, Device},
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

pub(crate) struct DeviceState {
    pub(crate) queue: Vec<(String, String, String)>,
    pub(crate) volume: u8,
    pub(crate) mode: PlayMode,
    pub(crate) playlists: Vec<SavedPlaylist>,
    pub(crate) transport_accepts: bool,
    pub(crate) failing: bool,
}

/// In-memory speaker recording every call by name.
pub(crate) struct MockDevice {
    pub(crate) state: Mutex<DeviceState>,
    pub(crate) calls: Mutex<Vec<String>>,
    enqueue_delay: Mutex<Option<Duration>>,
    enqueues_active: AtomicUsize,
    enqueues_peak: AtomicUsize,
}

impl MockDevice {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(DeviceState {
                queue: vec![
                    ("Bohemian Rhapsody".into(), "Queen".into(), "A Night at the Opera".into()),
                    ("Hey Jude".into(), "The Beatles".into(), "Hey Jude".into()),
                    ("Africa".into(), "Toto".into(), "Toto IV".into()),
                ],
                volume: 30,
                mode: PlayMode::Normal,
                playlists: vec![
                    SavedPlaylist {
                        id: "SQ:1".into(),
                        title: "Friday".into(),
                        uri: "file:///jffs/settings/savedqueues.rsq#1".into(),
                    },
                    SavedPlaylist {
                        id: "SQ:2".into(),
                        title: "Focus".into(),
                        uri: "file:///jffs/settings/savedqueues.rsq#2".into(),
                    },
                ],
                transport_accepts: true,
                failing: false,
            }),
            calls: Mutex::new(Vec::new()),
            enqueue_delay: Mutex::new(None),
            enqueues_active: AtomicUsize::new(0),
            enqueues_peak: AtomicUsize::new(0),
        }
    }

    /// Make every `enqueue` take `delay`, so overlapping calls can be observed.
    pub(crate) fn set_enqueue_delay(&self, delay: Duration) {
        *self.enqueue_delay.lock().unwrap() = Some(delay);
    }

    /// Most `enqueue` calls ever in progress at once.
    pub(crate) fn peak_enqueues(&self) -> usize {
        self.enqueues_peak.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> Result<(), SonobotError> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.state.lock().unwrap().failing {
            return Err(SonobotError::Device("connection refused".into()));
        }
        Ok(())
    }

    fn transport(&self, call: &str) -> Result<bool, SonobotError> {
        self.record(call)?;
        Ok(self.state.lock().unwrap().transport_accepts)
    }
}

#[async_trait]
impl Device for MockDevice {
    fn name(&self) -> &str {
        "mock"
    }

    async fn current_track(&self) -> Result<PlaybackState, SonobotError> {
        self.record("current_track")?;
        Ok(PlaybackState {
            artist: "Queen".into(),
            title: "Bohemian Rhapsody".into(),
            position_secs: 65,
            duration_secs: 355,
            queue_position: 1,
        })
    }

    async fn play(&self) -> Result<bool, SonobotError> {
        self.transport("play")
    }

    async fn pause(&self) -> Result<bool, SonobotError> {
        self.transport("pause")
    }

    async fn stop(&self) -> Result<bool, SonobotError> {
        self.transport("stop")
    }

    async fn next(&self) -> Result<bool, SonobotError> {
        self.transport("next")
    }

    async fn previous(&self) -> Result<bool, SonobotError> {
        self.transport("previous")
    }

    async fn select_queue(&self) -> Result<(), SonobotError> {
        self.record("select_queue")
    }

    async fn enqueue(&self, uri: &str) -> Result<EnqueueResult, SonobotError> {
        self.record(&format!("enqueue {uri}"))?;
        let delay = *self.enqueue_delay.lock().unwrap();
        if let Some(delay) = delay {
            let active = self.enqueues_active.fetch_add(1, Ordering::SeqCst) + 1;
            self.enqueues_peak.fetch_max(active, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.enqueues_active.fetch_sub(1, Ordering::SeqCst);
        }
        let mut state = self.state.lock().unwrap();
        state.queue.push((uri.into(), String::new(), String::new()));
        let len = state.queue.len();
        Ok(EnqueueResult {
            first_position: len,
            new_length: len,
        })
    }

    async fn queue(&self) -> Result<Vec<QueueEntry>, SonobotError> {
        self.record("queue")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .queue
            .iter()
            .enumerate()
            .map(|(i, (title, artist, album))| QueueEntry {
                position: i + 1,
                title: title.clone(),
                artist: artist.clone(),
                album: album.clone(),
            })
            .collect())
    }

    async fn remove_at(&self, position: usize) -> Result<(), SonobotError> {
        self.record(&format!("remove_at {position}"))?;
        self.state.lock().unwrap().queue.remove(position - 1);
        Ok(())
    }

    async fn play_mode(&self) -> Result<PlayMode, SonobotError> {
        self.record("play_mode")?;
        Ok(self.state.lock().unwrap().mode)
    }

    async fn set_play_mode(&self, mode: PlayMode) -> Result<(), SonobotError> {
        self.record(&format!("set_play_mode {}", mode.as_upnp()))?;
        self.state.lock().unwrap().mode = mode;
        Ok(())
    }

    async fn volume(&self) -> Result<u8, SonobotError> {
        self.record("volume")?;
        Ok(self.state.lock().unwrap().volume)
    }

    async fn set_volume(&self, level: u8) -> Result<(), SonobotError> {
        self.record(&format!("set_volume {level}"))?;
        self.state.lock().unwrap().volume = level;
        Ok(())
    }

    async fn saved_playlists(&self) -> Result<Vec<SavedPlaylist>, SonobotError> {
        self.record("saved_playlists")?;
        Ok(self.state.lock().unwrap().playlists.clone())
    }

    async fn create_playlist(&self, name: &str) -> Result<(), SonobotError> {
        self.record(&format!("create_playlist {name}"))
    }

    async fn load_playlist(&self, playlist: &SavedPlaylist) -> Result<(), SonobotError> {
        self.record(&format!("load_playlist {}", playlist.id))
    }
}

/// Catalog returning canned results and counting searches.
pub(crate) struct MockCatalog {
    pub(crate) results: Vec<SearchResult>,
    pub(crate) searches: Mutex<Vec<(SearchKind, String, usize)>>,
    pub(crate) failing: bool,
}

impl MockCatalog {
    pub(crate) fn with(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            searches: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    pub(crate) fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SonobotError> {
        self.searches
            .lock()
            .unwrap()
            .push((kind, query.to_string(), limit));
        if self.failing {
            return Err(SonobotError::Catalog("503 Service Unavailable".into()));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// A mock channel that records sent messages for assertion.
///
/// `start()` yields the scripted inbound lines and then closes.
pub(crate) struct MockChannel {
    pub(crate) sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    pub(crate) fail_send: bool,
    inbound: Mutex<Vec<IncomingMessage>>,
}

impl MockChannel {
    pub(crate) fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_send: false,
            inbound: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_send: true,
            ..Self::new()
        }
    }

    /// Scripted inbound lines, all from user `U1` in channel `C1`.
    pub(crate) fn scripted(lines: &[&str]) -> Self {
        Self {
            inbound: Mutex::new(lines.iter().map(|text| Self::message(text)).collect()),
            ..Self::new()
        }
    }

    pub(crate) fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            id: uuid::Uuid::new_v4(),
            channel: "mock".into(),
            sender_id: "U1".into(),
            text: text.to_string(),
            timestamp: chrono::Utc::now(),
            reply_target: ReplyTarget::channel("C1"),
        }
    }

    pub(crate) fn replies(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.text.clone()).collect()
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, SonobotError> {
        let pending: Vec<IncomingMessage> = self.inbound.lock().unwrap().drain(..).collect();
        let (tx, rx) = tokio::sync::mpsc::channel(pending.len().max(1));
        for message in pending {
            let _ = tx.send(message).await;
        }
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), SonobotError> {
        if self.fail_send {
            return Err(SonobotError::Channel("connection reset".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn stop(&self) -> Result<(), SonobotError> {
        Ok(())
    }
}

pub(crate) fn bohemian() -> SearchResult {
    SearchResult::Track(TrackResult {
        title: "Bohemian Rhapsody".into(),
        artist: "Queen".into(),
        album: "A Night at the Opera".into(),
        image_url: Some("https://i.scdn.co/image/64".into()),
        duration_secs: 354,
        release_date: Some("1975-11-21".into()),
        uri: "spotify:track:4u7EnebtmKWzUH433cf5Qv".into(),
    })
}
