//! Player preferences
//!
//! Persisted as JSON next to the highscore file. A missing or corrupt
//! file falls back to defaults with a warning; preferences are not worth
//! refusing to start over.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Gameplay and UI sound effects
    pub sfx_on: bool,
    /// Soundtrack playback (owned by the screen layer)
    pub music_on: bool,
    /// Camera shake on impacts
    pub screen_shake_on: bool,
    /// Cosmetic particles (explosion debris, thrust trail)
    pub particles_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_on: true,
            music_on: true,
            screen_shake_on: true,
            particles_on: true,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults on any read/parse failure
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("settings file unreadable ({err}), using defaults");
                    Self::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                log::warn!("could not read settings ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
