//! Transport commands and the current-song report.

use super::{CommandError, Orchestrator, Transport};
use sonobot_core::format::format_duration;

impl Orchestrator {
    /// Issue one transport command; only an accepted command reports the new state.
    pub(super) async fn transport(&self, command: Transport) -> Result<String, CommandError> {
        let accepted = match command {
            Transport::Play => {
                self.device.select_queue().await?;
                self.device.play().await?
            }
            Transport::Resume => self.device.play().await?,
            Transport::Stop => self.device.stop().await?,
            Transport::Pause => self.device.pause().await?,
            Transport::Next => self.device.next().await?,
            Transport::Previous => self.device.previous().await?,
        };

        if !accepted {
            let reply = match command {
                Transport::Play => "The speaker did not start playing!",
                Transport::Resume => "There is nothing to resume!",
                Transport::Stop | Transport::Pause => "Nothing is playing right now!",
                Transport::Next => "There is no next song in the playlist!",
                Transport::Previous => "There is no previous song in the playlist!",
            };
            return Err(CommandError::NoEffect(reply.to_string()));
        }

        let s = self.device.current_track().await?;
        let pos = format_duration(s.position_secs);
        let dur = format_duration(s.duration_secs);
        let (artist, title) = (&s.artist, &s.title);

        Ok(match command {
            Transport::Play => format!("Started playing: *{artist}* - *{title}* ({dur})"),
            Transport::Resume => {
                format!("Resumed playing: *{artist}* - *{title}* ({pos} / {dur})")
            }
            Transport::Stop => format!("Stopped playing: *{artist}* - *{title}*"),
            Transport::Pause => format!("Paused playing: *{artist}* - *{title}* ({pos} / {dur})"),
            Transport::Next => {
                format!("Now playing next song in playlist: *{artist}* - *{title}* ({dur})")
            }
            Transport::Previous => {
                format!("Now playing previous song in playlist: *{artist}* - *{title}* ({dur})")
            }
        })
    }

    pub(super) async fn current(&self) -> Result<String, CommandError> {
        let s = self.device.current_track().await?;
        Ok(format!(
            ":notes: Current song playing: *{}* - *{}* ({} / {}) :notes:",
            s.artist,
            s.title,
            format_duration(s.position_secs),
            format_duration(s.duration_secs)
        ))
    }
}
