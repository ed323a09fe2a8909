//! Difficulty presets
//!
//! Balance knobs are fixed at session start and read-only afterwards.
//! An unknown difficulty key is fatal before a session begins - silently
//! defaulting would desync every balance expectation downstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown difficulty '{0}' (expected easy, medium or nightmare)")]
    UnknownDifficulty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Nightmare,
}

impl Difficulty {
    /// Parse a difficulty key; unknown keys are an error, never a default
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        match key.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "nightmare" => Ok(Difficulty::Nightmare),
            other => Err(ConfigError::UnknownDifficulty(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Nightmare => "nightmare",
        }
    }

    /// The balance record for this preset
    pub fn settings(self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                start_lives: 5,
                points_multiplier: 0.5,
                initial_asteroids: 4,
                max_asteroids: 8,
                ufo_spawn_rate_ms: 17_000.0,
                ufo_shot_cooldown_ms: 2500.0,
                ufo_speed: 4.0,
                num_ufos: 1,
            },
            Difficulty::Medium => DifficultySettings {
                start_lives: 3,
                points_multiplier: 1.0,
                initial_asteroids: 6,
                max_asteroids: 12,
                ufo_spawn_rate_ms: 12_000.0,
                ufo_shot_cooldown_ms: 1800.0,
                ufo_speed: 6.0,
                num_ufos: 1,
            },
            Difficulty::Nightmare => DifficultySettings {
                start_lives: 1,
                points_multiplier: 2.0,
                initial_asteroids: 10,
                max_asteroids: 20,
                ufo_spawn_rate_ms: 3000.0,
                ufo_shot_cooldown_ms: 1000.0,
                ufo_speed: 8.0,
                num_ufos: 2,
            },
        }
    }
}

/// Immutable balance configuration for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub start_lives: u32,
    pub points_multiplier: f32,
    pub initial_asteroids: u32,
    /// Starting population cap; grows over the session
    pub max_asteroids: u32,
    pub ufo_spawn_rate_ms: f32,
    pub ufo_shot_cooldown_ms: f32,
    pub ufo_speed: f32,
    /// UFOs per wave (1 = horizontal only, 2 = horizontal + vertical)
    pub num_ufos: u32,
}
