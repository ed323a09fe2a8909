//! Astro Belt - an Asteroids-style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, VFX)
//! - `assets`: Opaque sprite/sound handles and pixel-mask data
//! - `audio`: Fire-and-forget sound sink, gated by the sfx toggle
//! - `difficulty`: Session balance presets
//! - `settings`: Player preferences, JSON persisted
//! - `highscores`: Highscore file read/write

pub mod assets;
pub mod audio;
pub mod difficulty;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use difficulty::{Difficulty, DifficultySettings};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions in pixels
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Nominal frame rate the entity speeds are tuned against
    pub const FPS: f32 = 60.0;
    /// Nominal frame interval in milliseconds; `update(dt)` scales motion
    /// by `dt / FRAME_INTERVAL_MS` so speed is independent of the real rate
    pub const FRAME_INTERVAL_MS: f32 = 1000.0 / FPS;
    /// Frame deltas above this are clamped before countdown arithmetic
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Ship handling
    pub const SHIP_ACCELERATION: f32 = 0.2;
    pub const SHIP_FRICTION: f32 = 0.02;
    pub const SHIP_ROTATION_STEP: f32 = 4.0; // degrees per frame
    pub const SHIP_MAX_SPEED: f32 = 7.0;
    /// Invulnerability window granted on respawn
    pub const INVULNERABILITY_MS: f32 = 2000.0;
    /// Visibility toggle interval while invulnerable
    pub const BLINK_INTERVAL_MS: f32 = 100.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFETIME_MS: f32 = 1200.0;
    pub const PLAYER_SHOT_COOLDOWN_MS: f32 = 250.0;
    pub const ENEMY_BULLET_SPEED: f32 = 8.0;

    /// Asteroids
    pub const ASTEROID_MIN_SPEED: f32 = 1.0;
    pub const ASTEROID_MAX_SPEED: f32 = 3.0;
    pub const ASTEROID_MAX_SPIN: f32 = 2.0; // degrees per frame, either way

    /// Non-wrapping entities self-remove this far outside the playfield
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
    /// Edge-spawned asteroids start this far outside the playfield
    pub const EDGE_SPAWN_OFFSET: f32 = 50.0;
    /// Initial asteroid spawns are rerolled inside this radius of the ship
    pub const SAFE_SPAWN_DISTANCE: f32 = 150.0;

    /// Spawn pacing
    pub const ASTEROID_SPAWN_MIN_MS: f32 = 2000.0;
    pub const ASTEROID_SPAWN_MAX_MS: f32 = 4000.0;
    pub const CAP_GROWTH_INTERVAL_MS: f32 = 30_000.0;
    pub const ASTEROID_CAP_LIMIT: u32 = 20;

    /// Base points before the difficulty multiplier
    pub const POINTS_ASTEROID_LARGE: u32 = 250;
    pub const POINTS_ASTEROID_MEDIUM: u32 = 150;
    pub const POINTS_ASTEROID_SMALL: u32 = 50;
    pub const POINTS_UFO: u32 = 1000;

    /// Explosion animation frame duration
    pub const EXPLOSION_FRAME_MS: f32 = 75.0;

    /// Impact feedback tuning
    pub const SHAKE_ASTEROID: f32 = 8.0;
    pub const SHAKE_UFO: f32 = 15.0;
    pub const SHAKE_PLAYER_HIT: f32 = 25.0;
    pub const SHAKE_DEFAULT_DURATION: u32 = 10; // frames
    pub const BURST_ASTEROID: usize = 15;
    pub const BURST_UFO: usize = 25;
    pub const BURST_PLAYER_HIT: usize = 30;
    pub const THRUST_PARTICLES_PER_FRAME: usize = 4;
    /// Particle pool cap; bursts past this are dropped
    pub const MAX_PARTICLES: usize = 256;
}

/// Unit vector the ship's nose points along at the given facing angle.
///
/// Angle is in degrees, increasing counterclockwise on screen; 0 points
/// straight up (screen y grows downward).
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(-rad.sin(), -rad.cos())
}

/// Unit vector out of the ship's tail (opposite of `heading`)
#[inline]
pub fn tail(angle_deg: f32) -> Vec2 {
    -heading(angle_deg)
}

/// Wrap an angle into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
