//! Play mode and volume.

use super::{CommandError, Orchestrator, PlayModeChange, VolumeChange};

impl Orchestrator {
    pub(super) async fn play_mode(
        &self,
        change: Option<PlayModeChange>,
    ) -> Result<String, CommandError> {
        let current = self.device.play_mode().await?;

        let Some(change) = change else {
            return Ok(format!("Current playmode is set to: *{current}*"));
        };

        if change.mode == current {
            return Err(CommandError::Unchanged(
                "The playmode is already set to that!".into(),
            ));
        }

        self.device.set_play_mode(change.mode).await?;
        Ok(format!("Playmode is now set to: {}", change.input))
    }

    /// `up`/`down` move by the configured step and are rejected, never
    /// clamped, when they would leave `0..=volume_max`.
    pub(super) async fn volume(&self, change: Option<VolumeChange>) -> Result<String, CommandError> {
        let max = self.limits.volume_max;
        let step = self.limits.volume_step;

        let level = match change {
            None => {
                let current = self.device.volume().await?;
                return Ok(format!("Current volume is set to: *{current}%*"));
            }
            Some(VolumeChange::Set(level)) => level,
            Some(VolumeChange::Up) => {
                let current = self.device.volume().await?;
                match current.checked_add(step) {
                    Some(level) if level <= max => level,
                    _ => {
                        return Err(CommandError::Range(format!(
                            "The volume is at *{current}%*, it can't go higher than *{max}%*!"
                        )))
                    }
                }
            }
            Some(VolumeChange::Down) => {
                let current = self.device.volume().await?;
                let level = current.checked_sub(step).ok_or_else(|| {
                    CommandError::Range(format!(
                        "The volume is at *{current}%*, it can't go lower than *0%*!"
                    ))
                })?;
                if level > max {
                    return Err(CommandError::Range(format!(
                        "The volume is at *{current}%*, one step down is still above *{max}%*! \
                         Set it directly with a level between 0 and {max}."
                    )));
                }
                level
            }
        };

        self.device.set_volume(level).await?;
        Ok(format!("Volume is now set to: *{level}%*"))
    }
}
