//! Host configuration
//!
//! Loaded once at startup from JSON; every field has a default so partial
//! files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_MAX_LIVES;
use crate::sim::WeaponKind;

/// How the fire key is read for a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TriggerMode {
    /// Fires whenever the key is down and the cooldown allows (auto-fire)
    #[default]
    Held,
    /// Fires only on the frame the key goes down (single shot)
    Pressed,
}

impl TriggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Held => "held",
            TriggerMode::Pressed => "pressed",
        }
    }
}

/// Fire trigger mode per weapon kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireTriggers {
    pub ball: TriggerMode,
    pub lightning: TriggerMode,
    pub star: TriggerMode,
    pub slow: TriggerMode,
    pub heart: TriggerMode,
}

impl Default for FireTriggers {
    fn default() -> Self {
        Self {
            ball: TriggerMode::Held,
            lightning: TriggerMode::Held,
            star: TriggerMode::Held,
            slow: TriggerMode::Held,
            heart: TriggerMode::Held,
        }
    }
}

impl FireTriggers {
    pub fn for_kind(&self, kind: WeaponKind) -> TriggerMode {
        match kind {
            WeaponKind::Ball => self.ball,
            WeaponKind::Lightning => self.lightning,
            WeaponKind::Star => self.star,
            WeaponKind::Slow => self.slow,
            WeaponKind::Heart => self.heart,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for the shared RNG
    pub seed: u64,
    /// Player maximum (and starting) lives
    pub player_max_lives: i32,
    /// Fire trigger per weapon; movement keys are always held
    pub fire: FireTriggers,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            player_max_lives: PLAYER_MAX_LIVES,
            fire: FireTriggers::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "fire": { "star": "Pressed" } }"#).unwrap();
        assert_eq!(settings.player_max_lives, PLAYER_MAX_LIVES);
        assert_eq!(settings.fire.for_kind(WeaponKind::Star), TriggerMode::Pressed);
        assert_eq!(settings.fire.for_kind(WeaponKind::Ball), TriggerMode::Held);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_or_default("/nonexistent/invaderers.json");
        assert_eq!(settings, Settings::default());
    }
}
