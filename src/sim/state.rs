//! Session state container
//!
//! Everything that makes up one run lives here: the typed entity
//! collections, score/lives/wave, and the seeded RNG. Systems receive a
//! mutable reference and touch only the collections they own - the spawn
//! director adds asteroids and UFOs, the collision engine removes and
//! splits, the orchestrator adds bullets, the VFX director adds
//! particles.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Asteroid, Bullet, Explosion, Ship, Ufo};
use super::vfx::Particle;
use crate::assets::AssetCatalog;
use crate::difficulty::DifficultySettings;

/// All state of a single game session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Balance preset, immutable for the session's duration
    pub difficulty: DifficultySettings,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG; all sampling goes through here
    pub rng: Pcg32,

    /// Score, monotonically non-decreasing via collision rewards
    pub score: u64,
    /// Session ends when this reaches 0
    pub lives: u32,
    /// Escalation counter; steps with the asteroid-cap growth
    pub wave: u32,

    pub ship: Ship,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub ufos: Vec<Ufo>,
    /// Cosmetic only, never collide
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
}

impl SessionState {
    pub fn new(difficulty: DifficultySettings, assets: &AssetCatalog, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: difficulty.start_lives,
            wave: 1,
            ship: Ship::new(&assets.ship),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            asteroids: Vec::new(),
            ufos: Vec::new(),
            particles: Vec::new(),
            explosions: Vec::new(),
            difficulty,
        }
    }

    /// Points for a destruction reward: base points scaled by the
    /// difficulty multiplier, truncated to an integer
    pub fn award(&mut self, base_points: u32) {
        self.score +=
            (f64::from(base_points) * f64::from(self.difficulty.points_multiplier)).trunc() as u64;
    }
}
