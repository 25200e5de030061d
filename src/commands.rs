//! Chat commands: parsing a trigger-prefixed line into a verb and argument,
//! and running it against the speaker and the catalog.
//!
//! Every command ends in exactly one reply. Validation happens before any
//! device or catalog call; adapter failures become a fixed per-verb apology
//! and the cause goes to the log only.

mod action;
mod playback;
mod queue;
mod search;
mod settings;


pub use action::{help_text, Action, PlayModeChange, Request, Transport, VolumeChange};

use sonobot_core::{
    config::LimitsConfig,
    error::SonobotError,
    message::{OutgoingMessage, ReplyTarget},
    traits::{Catalog, Channel, Device},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// A parsed chat command. `verb` is lower-cased; `argument` is the rest of
/// the line after the first whitespace run, otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub argument: String,
}

impl Command {
    pub fn new(verb: &str, argument: &str) -> Self {
        Self {
            verb: verb.to_lowercase(),
            argument: argument.to_string(),
        }
    }

    /// Parse a chat line. Returns `None` unless the line starts with `trigger`.
    pub fn parse(text: &str, trigger: char) -> Option<Self> {
        let rest = text.strip_prefix(trigger)?;
        let (verb, argument) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim_start()),
            None => (rest, ""),
        };
        Some(Self::new(verb, argument))
    }
}

/// Why a command did not produce a success reply.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Missing or malformed argument.
    #[error("{0}")]
    Usage(String),
    /// Value outside the accepted bounds or set.
    #[error("{0}")]
    Range(String),
    /// Queue position or playlist id that does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Requested state is already in effect.
    #[error("{0}")]
    Unchanged(String),
    /// Speaker answered but did not accept the transport command.
    #[error("{0}")]
    NoEffect(String),
    #[error(transparent)]
    Adapter(#[from] SonobotError),
}

/// User-correctable rejection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UnknownVerb,
    Usage,
    Range,
    NotFound,
    Unchanged,
    NoEffect,
}

/// Final state of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(String),
    Rejected { kind: Rejection, reply: String },
    /// Device or catalog failure; `reply` is the verb's apology.
    Failed { reply: String },
}

impl Outcome {
    pub fn reply(&self) -> &str {
        match self {
            Self::Succeeded(reply) | Self::Rejected { reply, .. } | Self::Failed { reply } => reply,
        }
    }
}

/// Runs commands against injected adapters and reports through `replies`.
pub struct Orchestrator {
    pub(crate) device: Arc<dyn Device>,
    pub(crate) catalog: Arc<dyn Catalog>,
    replies: Arc<dyn Channel>,
    pub(crate) limits: LimitsConfig,
    pub(crate) search_limit: usize,
    pub(crate) trigger: char,
    /// Present when mutating commands must run one at a time.
    mutations: Option<Mutex<()>>,
}

impl Orchestrator {
    pub fn new(
        device: Arc<dyn Device>,
        catalog: Arc<dyn Catalog>,
        replies: Arc<dyn Channel>,
        limits: LimitsConfig,
        search_limit: usize,
        trigger: char,
    ) -> Self {
        Self {
            device,
            catalog,
            replies,
            limits,
            search_limit,
            trigger,
            mutations: None,
        }
    }

    /// Serialize queue/transport/volume/playmode changes across commands.
    pub fn with_serialized_mutations(mut self, enabled: bool) -> Self {
        self.mutations = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Run a command to completion and send its reply to `target`.
    pub async fn execute(&self, command: Command, target: ReplyTarget) -> Outcome {
        let outcome = self.run(&command).await;
        match &outcome {
            Outcome::Succeeded(_) => info!("{}: ok", command.verb),
            Outcome::Rejected { kind, .. } => debug!("{}: rejected ({kind:?})", command.verb),
            Outcome::Failed { .. } => {}
        }
        self.reply(target, outcome.reply()).await;
        outcome
    }

    async fn run(&self, command: &Command) -> Outcome {
        let Some(action) = Action::from_verb(&command.verb) else {
            return Outcome::Rejected {
                kind: Rejection::UnknownVerb,
                reply: format!("I'm sorry, but {} is not a command", command.verb),
            };
        };

        let result = match action.validate(&command.argument, &self.limits, self.trigger) {
            Ok(request) => {
                let _guard = match (&self.mutations, action.is_mutation()) {
                    (Some(lock), true) => Some(lock.lock().await),
                    _ => None,
                };
                self.handle(request).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => Outcome::Succeeded(reply),
            Err(CommandError::Adapter(e)) => {
                error!("{} failed: {e}", action.name());
                Outcome::Failed {
                    reply: action.apology().to_string(),
                }
            }
            Err(e) => {
                let kind = match e {
                    CommandError::Usage(_) => Rejection::Usage,
                    CommandError::Range(_) => Rejection::Range,
                    CommandError::NotFound(_) => Rejection::NotFound,
                    CommandError::Unchanged(_) => Rejection::Unchanged,
                    _ => Rejection::NoEffect,
                };
                Outcome::Rejected {
                    kind,
                    reply: e.to_string(),
                }
            }
        }
    }

    async fn handle(&self, request: Request) -> Result<String, CommandError> {
        match request {
            Request::Transport(command) => self.transport(command).await,
            Request::Current => self.current().await,
            Request::Queue => self.list_queue().await,
            Request::Playlists => self.list_playlists().await,
            Request::Help => Ok(help_text(self.trigger)),
            Request::CreatePlaylist(name) => self.create_playlist(&name).await,
            Request::SetPlaylist(id) => self.set_playlist(id).await,
            Request::PlayMode(change) => self.play_mode(change).await,
            Request::Search(kind, query) => self.search(kind, &query).await,
            Request::Add(query) => self.add(&query).await,
            Request::Remove(position) => self.remove(position).await,
            Request::Volume(change) => self.volume(change).await,
        }
    }

    /// Send failures are logged, never raised.
    async fn reply(&self, target: ReplyTarget, text: &str) {
        let message = OutgoingMessage {
            text: text.to_string(),
            target,
        };
        if let Err(e) = self.replies.send(message).await {
            warn!("failed to send reply via {}: {e}", self.replies.name());
        }
    }
}
