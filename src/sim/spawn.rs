//! Spawn director: asteroid population and UFO waves
//!
//! Owns the pacing timers and the population cap; adds asteroids and
//! UFOs to the session and nothing else. Rendering never enters here.

use glam::Vec2;
use rand::Rng;

use super::entity::{Asteroid, AsteroidSize, Ufo, UfoPattern};
use super::state::SessionState;
use crate::assets::AssetCatalog;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct SpawnDirector {
    /// Counts down to the next edge-spawn attempt
    asteroid_timer: f32,
    /// Current population cap; grows over the session
    max_asteroids: u32,
    /// Accumulates toward the next cap-growth step
    cap_timer: f32,
    /// Counts down only while no UFO is alive
    ufo_countdown: f32,
}

impl SpawnDirector {
    /// Create the director and place the initial asteroid field
    pub fn new(state: &mut SessionState, assets: &AssetCatalog) -> Self {
        let difficulty = state.difficulty;
        let mut director = Self {
            asteroid_timer: 0.0,
            max_asteroids: difficulty.max_asteroids,
            cap_timer: 0.0,
            ufo_countdown: difficulty.ufo_spawn_rate_ms,
        };
        director.spawn_initial(difficulty.initial_asteroids, state, assets);
        director
    }

    pub fn max_asteroids(&self) -> u32 {
        self.max_asteroids
    }

    pub fn update(&mut self, dt: f32, state: &mut SessionState, assets: &AssetCatalog) {
        // Asteroid trickle: the timer resets whether or not the cap
        // allowed a spawn, so pacing stays irregular
        self.asteroid_timer -= dt;
        if self.asteroid_timer <= 0.0 {
            self.asteroid_timer = state
                .rng
                .random_range(ASTEROID_SPAWN_MIN_MS..=ASTEROID_SPAWN_MAX_MS);
            if (state.asteroids.len() as u32) < self.max_asteroids {
                self.spawn_at_edge(state, assets);
            }
        }

        // Escalation: every 30 seconds the cap grows by one (saturating)
        // and the wave counter steps
        self.cap_timer += dt;
        while self.cap_timer >= CAP_GROWTH_INTERVAL_MS {
            self.cap_timer -= CAP_GROWTH_INTERVAL_MS;
            self.max_asteroids = (self.max_asteroids + 1).min(ASTEROID_CAP_LIMIT);
            state.wave += 1;
            log::info!(
                "wave {} reached, asteroid cap now {}",
                state.wave,
                self.max_asteroids
            );
        }

        // UFO waves: the countdown runs only while the sky is clear
        if state.ufos.is_empty() {
            self.ufo_countdown -= dt;
            if self.ufo_countdown <= 0.0 {
                self.spawn_ufo_wave(state, assets);
                self.ufo_countdown = state.difficulty.ufo_spawn_rate_ms;
            }
        }
    }

    /// Initial field: uniformly random positions, rerolled until outside
    /// the safe-distance radius of the ship's spawn point
    fn spawn_initial(&mut self, count: u32, state: &mut SessionState, assets: &AssetCatalog) {
        for _ in 0..count {
            let pos = loop {
                let candidate = Vec2::new(
                    state.rng.random_range(0.0..SCREEN_WIDTH),
                    state.rng.random_range(0.0..SCREEN_HEIGHT),
                );
                if candidate.distance(state.ship.pos) > SAFE_SPAWN_DISTANCE {
                    break candidate;
                }
            };
            self.spawn_asteroid(pos, state, assets);
        }
        log::info!("initial field: {count} asteroids");
    }

    /// One large asteroid just outside a uniformly chosen screen edge
    fn spawn_at_edge(&mut self, state: &mut SessionState, assets: &AssetCatalog) {
        let pos = match state.rng.random_range(0..4) {
            0 => Vec2::new(
                state.rng.random_range(0.0..SCREEN_WIDTH),
                -EDGE_SPAWN_OFFSET,
            ),
            1 => Vec2::new(
                state.rng.random_range(0.0..SCREEN_WIDTH),
                SCREEN_HEIGHT + EDGE_SPAWN_OFFSET,
            ),
            2 => Vec2::new(
                -EDGE_SPAWN_OFFSET,
                state.rng.random_range(0.0..SCREEN_HEIGHT),
            ),
            _ => Vec2::new(
                SCREEN_WIDTH + EDGE_SPAWN_OFFSET,
                state.rng.random_range(0.0..SCREEN_HEIGHT),
            ),
        };
        self.spawn_asteroid(pos, state, assets);
    }

    fn spawn_asteroid(&mut self, pos: Vec2, state: &mut SessionState, assets: &AssetCatalog) {
        let size = AsteroidSize::Large;
        let asteroid = Asteroid::new(size, pos, assets.asteroid(size), &mut state.rng);
        state.asteroids.push(asteroid);
    }

    /// One UFO per configured pattern: a single UFO flies the horizontal
    /// pattern; two or more add the vertical one, capped at the
    /// configured count
    fn spawn_ufo_wave(&mut self, state: &mut SessionState, assets: &AssetCatalog) {
        let patterns: &[UfoPattern] = match state.difficulty.num_ufos {
            0 => &[],
            1 => &[UfoPattern::Horizontal],
            _ => &[UfoPattern::Horizontal, UfoPattern::Vertical],
        };
        let count = patterns.len().min(state.difficulty.num_ufos as usize);
        for &pattern in &patterns[..count] {
            let sprite = match pattern {
                UfoPattern::Horizontal => &assets.ufo_horizontal,
                UfoPattern::Vertical => &assets.ufo_vertical,
            };
            let ufo = Ufo::spawn(
                pattern,
                state.difficulty.ufo_speed,
                state.difficulty.ufo_shot_cooldown_ms,
                sprite,
                &mut state.rng,
            );
            state.ufos.push(ufo);
        }
        log::info!("UFO wave: {count} inbound");
    }
}
