use serde::{Deserialize, Serialize};

use crate::bot::BotConfig;
use crate::bounds::BOUNDS_MAX;
use crate::error::DuelError;

const MAX_BOUNDS_RADIUS: i32 = BOUNDS_MAX * 8;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub gravity_frames: u32,
    pub bounds_radius: i32,
    pub angry_chunks: bool,
    pub bot: BotConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            gravity_frames: 10,
            bounds_radius: BOUNDS_MAX,
            angry_chunks: true,
            bot: BotConfig::default(),
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), DuelError> {
        if self.gravity_frames == 0 {
            return Err(DuelError::InvalidSettings(
                "gravity_frames must be at least 1".into(),
            ));
        }
        if self.bounds_radius <= 0 || self.bounds_radius > MAX_BOUNDS_RADIUS {
            return Err(DuelError::InvalidSettings(format!(
                "bounds_radius must be in 1..={}, got {}",
                MAX_BOUNDS_RADIUS, self.bounds_radius
            )));
        }
        // no board can be wider than the scanned square
        let widest = 2 * self.bounds_radius;
        if self.bot.search_shift < 0 || self.bot.search_shift > widest {
            return Err(DuelError::InvalidSettings(format!(
                "search_shift must be in 0..={}, got {}",
                widest, self.bot.search_shift
            )));
        }
        if self.bot.weights.max_chained_clears == 0 {
            return Err(DuelError::InvalidSettings(
                "max_chained_clears must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
