//! Verb table: every action the bot understands, its aliases, and the
//! argument validation that runs before any device or catalog call.

use super::CommandError;
use sonobot_core::{config::LimitsConfig, model::PlayMode, model::SearchKind};

/// Closed set of actions. Each verb maps to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Play,
    Resume,
    Stop,
    Pause,
    Next,
    Previous,
    Current,
    Queue,
    Playlists,
    CreatePlaylist,
    SetPlaylist,
    PlayMode,
    Search,
    SearchAlbum,
    SearchPlaylist,
    Add,
    Remove,
    Volume,
    Help,
}

/// Validated, typed input for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Transport(Transport),
    Current,
    Queue,
    Playlists,
    Help,
    CreatePlaylist(String),
    SetPlaylist(i64),
    PlayMode(Option<PlayModeChange>),
    Search(SearchKind, String),
    Add(String),
    Remove(i64),
    Volume(Option<VolumeChange>),
}

/// Single-call transport commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Play,
    Resume,
    Stop,
    Pause,
    Next,
    Previous,
}

/// A requested play mode along with the text the user typed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayModeChange {
    pub mode: PlayMode,
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Up,
    Down,
    Set(u8),
}

impl Action {
    /// Every action, in help-listing order.
    pub const ALL: [Action; 19] = [
        Action::Play,
        Action::Stop,
        Action::Pause,
        Action::Resume,
        Action::Next,
        Action::Previous,
        Action::Current,
        Action::Queue,
        Action::Playlists,
        Action::CreatePlaylist,
        Action::SetPlaylist,
        Action::PlayMode,
        Action::Search,
        Action::SearchAlbum,
        Action::SearchPlaylist,
        Action::Add,
        Action::Remove,
        Action::Volume,
        Action::Help,
    ];

    /// Verbs that select this action. The first is the canonical name.
    pub fn verbs(&self) -> &'static [&'static str] {
        match self {
            Self::Play => &["play"],
            Self::Resume => &["resume"],
            Self::Stop => &["stop"],
            Self::Pause => &["pause"],
            Self::Next => &["next"],
            Self::Previous => &["previous", "prev", "back"],
            Self::Current => &["current"],
            Self::Queue => &["playlist", "list", "songs"],
            Self::Playlists => &["playlists"],
            Self::CreatePlaylist => &["createplaylist"],
            Self::SetPlaylist => &["setplaylist"],
            Self::PlayMode => &["playmode"],
            Self::Search => &["search"],
            Self::SearchAlbum => &["searchalbum"],
            Self::SearchPlaylist => &["searchplaylist"],
            Self::Add => &["add"],
            Self::Remove => &["remove", "rem", "del"],
            Self::Volume => &["volume", "vol"],
            Self::Help => &["help"],
        }
    }

    /// Look up a (lower-cased) verb.
    pub fn from_verb(verb: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.verbs().contains(&verb))
    }

    pub fn name(&self) -> &'static str {
        self.verbs()[0]
    }

    /// Actions that change transport, queue, play mode or volume.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Play
                | Self::Resume
                | Self::Stop
                | Self::Pause
                | Self::Next
                | Self::Previous
                | Self::CreatePlaylist
                | Self::SetPlaylist
                | Self::PlayMode
                | Self::Add
                | Self::Remove
                | Self::Volume
        )
    }

    /// Reply used when a device or catalog call fails.
    pub fn apology(&self) -> &'static str {
        match self {
            Self::Play => "An error occurred trying to play the song! :(",
            Self::Resume => "An error occurred trying to resume the song! :(",
            Self::Stop => "An error occurred trying to stop the song! :(",
            Self::Pause => "An error occurred trying to pause the song! :(",
            Self::Next => "An error occurred trying to play the next song! :(",
            Self::Previous => "An error occurred trying to play the previous song! :(",
            Self::Current => "An error occurred trying to get the current song! :(",
            Self::Queue => "An error occurred trying to get the playlist! :(",
            Self::Playlists => "An error occurred trying to get the playlists! :(",
            Self::CreatePlaylist => "An error occurred trying to create the playlist! :(",
            Self::SetPlaylist => "An error occurred trying to load the playlist! :(",
            Self::PlayMode => "An error occurred trying to get/change the playmode! :(",
            Self::Search => "An error occurred searching for the song! :(",
            Self::SearchAlbum => "An error occurred searching for the album! :(",
            Self::SearchPlaylist => "An error occurred searching for the playlist! :(",
            Self::Add => "An error occurred trying to add the song to the playlist! :(",
            Self::Remove => "An error occurred trying to remove the song from the playlist! :(",
            Self::Volume => "An error occurred trying to get/change the volume! :(",
            Self::Help => "An error occurred trying to display the help list! :(",
        }
    }

    /// Argument synopsis and description for the help listing.
    fn help(&self) -> (&'static str, &'static str) {
        match self {
            Self::Play => ("", "Play the playlist"),
            Self::Resume => ("", "Resume song"),
            Self::Stop => ("", "Stop song"),
            Self::Pause => ("", "Pause song"),
            Self::Next => ("", "Play the next song"),
            Self::Previous => ("", "Play the previous song"),
            Self::Current => ("", "Display the current song"),
            Self::Queue => ("", "Display the entire playlist"),
            Self::Playlists => ("", "Display a list of all saved playlists"),
            Self::CreatePlaylist => (" <name>", "Save a new, empty playlist"),
            Self::SetPlaylist => (" <ID>", "Replace the playlist with a saved one and play it"),
            Self::PlayMode => (" [playmode]", "Display or change the playmode"),
            Self::Search => (" <text>", "Search Spotify for a song"),
            Self::SearchAlbum => (" <text>", "Search Spotify for an album"),
            Self::SearchPlaylist => (" <text>", "Search Spotify for a playlist"),
            Self::Add => (" <text>", "Add the first song result from Spotify to the playlist"),
            Self::Remove => (" <position>", "Remove the song at the position from the playlist"),
            Self::Volume => (" [up/down/number]", "Display or change the volume level"),
            Self::Help => ("", "Show this list"),
        }
    }

    /// Check the raw argument and turn it into a typed request.
    ///
    /// Never touches the device or catalog.
    pub fn validate(
        &self,
        raw: &str,
        limits: &LimitsConfig,
        trigger: char,
    ) -> Result<Request, CommandError> {
        let text = raw.trim();
        let first = text.split_whitespace().next().unwrap_or("");

        match self {
            Self::Play => Ok(Request::Transport(Transport::Play)),
            Self::Resume => Ok(Request::Transport(Transport::Resume)),
            Self::Stop => Ok(Request::Transport(Transport::Stop)),
            Self::Pause => Ok(Request::Transport(Transport::Pause)),
            Self::Next => Ok(Request::Transport(Transport::Next)),
            Self::Previous => Ok(Request::Transport(Transport::Previous)),
            Self::Current => Ok(Request::Current),
            Self::Queue => Ok(Request::Queue),
            Self::Playlists => Ok(Request::Playlists),
            Self::Help => Ok(Request::Help),

            Self::Search => query(text, "a song", trigger, "search <song name>")
                .map(|q| Request::Search(SearchKind::Track, q)),
            Self::SearchAlbum => query(text, "an album", trigger, "searchalbum <album name>")
                .map(|q| Request::Search(SearchKind::Album, q)),
            Self::SearchPlaylist => query(text, "a playlist", trigger, "searchplaylist <playlist name>")
                .map(|q| Request::Search(SearchKind::Playlist, q)),
            Self::Add => query(text, "a song", trigger, "add <song name>").map(Request::Add),

            Self::Remove => {
                if first.is_empty() {
                    return Err(CommandError::Usage(format!(
                        "You must specify a playlist position to remove!\n{trigger}remove <position>"
                    )));
                }
                number(first).map(Request::Remove)
            }
            Self::SetPlaylist => {
                if first.is_empty() {
                    return Err(CommandError::Usage(format!(
                        "You must specify a playlist ID to load!\n{trigger}setplaylist <ID>"
                    )));
                }
                number(first).map(Request::SetPlaylist)
            }
            Self::CreatePlaylist => {
                if text.is_empty() {
                    return Err(CommandError::Usage(format!(
                        "You must specify a playlist name!\n{trigger}createplaylist <playlist name>"
                    )));
                }
                if text.chars().count() > limits.playlist_name_max {
                    return Err(CommandError::Range(format!(
                        "Playlist names are limited to *{}* characters!",
                        limits.playlist_name_max
                    )));
                }
                Ok(Request::CreatePlaylist(text.to_string()))
            }

            Self::PlayMode => {
                if text.is_empty() {
                    return Ok(Request::PlayMode(None));
                }
                match text.parse::<PlayMode>() {
                    Ok(mode) => Ok(Request::PlayMode(Some(PlayModeChange {
                        mode,
                        input: text.to_string(),
                    }))),
                    Err(_) => Err(CommandError::Range(format!(
                        "That playmode is not recognised, the available playmodes are: {}",
                        PlayMode::ALL
                            .iter()
                            .map(|m| format!("*{m}*"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))),
                }
            }

            Self::Volume => {
                if first.is_empty() {
                    return Ok(Request::Volume(None));
                }
                let bounds = || {
                    format!(
                        "You can only turn the volume up/down or set it to a value between *0* and *{}*!",
                        limits.volume_max
                    )
                };
                if first.eq_ignore_ascii_case("up") {
                    return Ok(Request::Volume(Some(VolumeChange::Up)));
                }
                if first.eq_ignore_ascii_case("down") {
                    return Ok(Request::Volume(Some(VolumeChange::Down)));
                }
                match first.parse::<i64>() {
                    Ok(v) if (0..=i64::from(limits.volume_max)).contains(&v) => {
                        Ok(Request::Volume(Some(VolumeChange::Set(v as u8))))
                    }
                    Ok(_) => Err(CommandError::Range(bounds())),
                    Err(_) => Err(CommandError::Usage(bounds())),
                }
            }
        }
    }
}

fn query(text: &str, what: &str, trigger: char, usage: &str) -> Result<String, CommandError> {
    if text.is_empty() {
        return Err(CommandError::Usage(format!(
            "You must specify {what} to search for!\n{trigger}{usage}"
        )));
    }
    Ok(text.to_string())
}

fn number(token: &str) -> Result<i64, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::Usage(format!("*{token}* is not a number!")))
}

/// The full command list, aliases included.
pub fn help_text(trigger: char) -> String {
    let mut lines = vec![
        "Current commands!".to_string(),
        " ===  ===  ===  ===  ===  ===  ===  ===  ===  ===  === ".to_string(),
    ];
    for action in Action::ALL {
        let (args, description) = action.help();
        let verbs = action.verbs();
        let mut line = format!("`{trigger}{}{args}`", verbs[0]);
        if verbs.len() > 1 {
            let aliases: Vec<String> = verbs[1..].iter().map(|v| format!("`{trigger}{v}`")).collect();
            line.push_str(&format!(" ({})", aliases.join(", ")));
        }
        line.push_str(&format!(" : {description}"));
        lines.push(line);
    }
    lines.join("\n")
}
