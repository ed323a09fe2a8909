//! Game session orchestrator
//!
//! Owns the per-frame update order, which is an invariant of the whole
//! simulation: input, then spawn timers, then VFX bookkeeping, then
//! collision processing, then entity motion, then the dead-entity sweep.
//! A child asteroid produced by this frame's collision pass is updated in
//! this frame's motion pass, not deferred to the next.

use glam::Vec2;

use super::collision::CollisionEngine;
use super::entity::{Bullet, UpdateCtx};
use super::spawn::SpawnDirector;
use super::state::SessionState;
use super::vfx::VfxDirector;
use crate::assets::AssetCatalog;
use crate::audio::{AudioRouter, AudioSink};
use crate::consts::*;
use crate::difficulty::Difficulty;
use crate::settings::Settings;

/// One frame of player input
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

/// Session lifecycle as seen by the screen layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// Lives hit zero; the final score is the only thing the caller needs
    Ended { score: u64 },
}

/// A running game session: state plus the systems that drive it
pub struct GameSession {
    pub state: SessionState,
    pub vfx: VfxDirector,
    spawn: SpawnDirector,
    collision: CollisionEngine,
    assets: AssetCatalog,
    audio: AudioRouter,
    shot_countdown: f32,
    ended: bool,
}

impl GameSession {
    pub fn new(
        difficulty: Difficulty,
        settings: &Settings,
        assets: AssetCatalog,
        sink: Box<dyn AudioSink>,
        seed: u64,
    ) -> Self {
        log::info!("starting {difficulty:?} session, seed {seed}");
        let mut state = SessionState::new(difficulty.settings(), &assets, seed);
        let spawn = SpawnDirector::new(&mut state, &assets);
        Self {
            state,
            vfx: VfxDirector::new(settings),
            spawn,
            collision: CollisionEngine::new(),
            assets,
            audio: AudioRouter::new(settings.sfx_on, sink),
            shot_countdown: 0.0,
            ended: false,
        }
    }

    /// Advance the session by one frame. `dt` is the elapsed real time
    /// in milliseconds since the previous frame.
    pub fn update(&mut self, input: &SessionInput, dt: f32) -> SessionStatus {
        if self.ended {
            return SessionStatus::Ended {
                score: self.state.score,
            };
        }
        // A spiking frame delta must not fast-forward the countdowns
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA_MS);

        // Input
        self.state
            .ship
            .steer(input.rotate_left, input.rotate_right, input.thrust);
        if self.shot_countdown > 0.0 {
            self.shot_countdown -= dt;
        }
        if input.fire && self.shot_countdown <= 0.0 {
            self.shot_countdown = PLAYER_SHOT_COOLDOWN_MS;
            self.fire_player_bullet();
        }
        if self.state.ship.accelerating {
            self.vfx.emit_thrust(&mut self.state);
        }

        // Systems, in their fixed order
        self.spawn.update(dt, &mut self.state, &self.assets);
        self.vfx.update();
        self.collision
            .process(&mut self.state, &mut self.vfx, &self.assets, &mut self.audio);

        // Entity motion, including anything the collision pass spawned
        let ctx = UpdateCtx {
            ship_pos: self.state.ship.pos,
        };
        self.state.ship.update(dt, &ctx);
        for asteroid in &mut self.state.asteroids {
            asteroid.update(dt, &ctx);
        }
        for bullet in &mut self.state.bullets {
            bullet.update(dt, &ctx);
        }
        for bullet in &mut self.state.enemy_bullets {
            bullet.update(dt, &ctx);
        }
        let mut ufo_shots: Vec<(Vec2, Vec2)> = Vec::new();
        for ufo in &mut self.state.ufos {
            if let Some(dir) = ufo.update(dt, &ctx) {
                ufo_shots.push((ufo.pos, dir));
            }
        }
        for (pos, dir) in ufo_shots {
            self.state
                .enemy_bullets
                .push(Bullet::enemy(pos, dir, &self.assets.enemy_shot));
            self.audio.play(self.assets.sounds.enemy_shot);
        }
        for particle in &mut self.state.particles {
            particle.update(dt, &ctx);
        }
        for explosion in &mut self.state.explosions {
            explosion.update(dt, &ctx);
        }

        // Sweep: anything not live leaves before the next frame
        self.state.bullets.retain(|b| !b.expired());
        self.state.enemy_bullets.retain(|b| !b.expired());
        self.state.ufos.retain(|u| !u.offscreen());
        self.state.particles.retain(|p| p.alive());
        self.state.explosions.retain(|e| !e.finished());

        if self.state.lives == 0 {
            self.ended = true;
            log::info!("session over, final score {}", self.state.score);
            return SessionStatus::Ended {
                score: self.state.score,
            };
        }
        SessionStatus::Running
    }

    fn fire_player_bullet(&mut self) {
        let (pos, dir) = self.state.ship.muzzle();
        self.state
            .bullets
            .push(Bullet::player(pos, dir, &self.assets.player_shot));
        self.audio.play(self.assets.sounds.player_shot);
    }

    /// Advisory scene draw offset for the current shake state
    pub fn render_offset(&mut self) -> Vec2 {
        self.vfx.render_offset(&mut self.state.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSink;
    use crate::sim::entity::AsteroidSize;

    fn session(difficulty: Difficulty) -> GameSession {
        GameSession::new(
            difficulty,
            &Settings::default(),
            AssetCatalog::procedural(),
            Box::new(NullSink),
            2024,
        )
    }

    fn idle() -> SessionInput {
        SessionInput::default()
    }

    #[test]
    fn test_session_starts_running() {
        let mut s = session(Difficulty::Medium);
        assert_eq!(s.update(&idle(), FRAME_INTERVAL_MS), SessionStatus::Running);
        assert_eq!(s.state.lives, 3);
        // The initial field, plus possibly the first edge spawn (the
        // trickle timer starts hot)
        assert!(s.state.asteroids.len() >= 6);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut s = session(Difficulty::Medium);
        // Clear the field so bullets survive
        s.state.asteroids.clear();
        let fire = SessionInput {
            fire: true,
            ..SessionInput::default()
        };

        s.update(&fire, FRAME_INTERVAL_MS);
        assert_eq!(s.state.bullets.len(), 1);

        // Held fire within the cooldown adds nothing
        s.update(&fire, FRAME_INTERVAL_MS);
        assert_eq!(s.state.bullets.len(), 1);

        // After the cooldown elapses a second shot goes out
        let frames = (PLAYER_SHOT_COOLDOWN_MS / FRAME_INTERVAL_MS).ceil() as usize + 1;
        for _ in 0..frames {
            s.update(&fire, FRAME_INTERVAL_MS);
        }
        assert_eq!(s.state.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_gone_by_lifetime_deadline() {
        let mut s = session(Difficulty::Medium);
        s.state.asteroids.clear();
        let fire = SessionInput {
            fire: true,
            ..SessionInput::default()
        };
        s.update(&fire, FRAME_INTERVAL_MS);
        assert_eq!(s.state.bullets.len(), 1);

        // Re-center the bullet each frame so only the lifetime can kill
        // it, and keep the field clear so nothing eats it early
        let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        let mut age = FRAME_INTERVAL_MS;
        while age + 2.0 * FRAME_INTERVAL_MS < BULLET_LIFETIME_MS {
            s.state.bullets[0].pos = center + Vec2::new(100.0, 0.0);
            s.update(&idle(), FRAME_INTERVAL_MS);
            age += FRAME_INTERVAL_MS;
            s.state.asteroids.clear();
            assert_eq!(s.state.bullets.len(), 1, "bullet vanished early at {age}ms");
        }

        // Past the deadline it must be gone
        for _ in 0..3 {
            if let Some(b) = s.state.bullets.first_mut() {
                b.pos = center + Vec2::new(100.0, 0.0);
            }
            s.update(&idle(), FRAME_INTERVAL_MS);
            s.state.asteroids.clear();
        }
        assert!(s.state.bullets.is_empty(), "bullet outlived its lifetime");
    }

    #[test]
    fn test_thrust_emits_trail_particles() {
        let mut s = session(Difficulty::Medium);
        s.state.asteroids.clear();
        let thrust = SessionInput {
            thrust: true,
            ..SessionInput::default()
        };
        s.update(&thrust, FRAME_INTERVAL_MS);
        assert!(s.state.particles.len() >= THRUST_PARTICLES_PER_FRAME);
        assert!(s.state.ship.vel.length() > 0.0);
    }

    #[test]
    fn test_session_ends_after_losing_all_lives() {
        let mut s = session(Difficulty::Medium); // 3 lives
        s.state.asteroids.clear();
        s.state.ufos.clear();

        let mut total_hits = 0;
        let mut status = SessionStatus::Running;
        // Repeatedly park a rock on the ship; wait out invulnerability
        // between hits
        for _ in 0..200 {
            if !s.state.ship.invulnerable {
                let pos = s.state.ship.pos;
                let sprite = s.assets.asteroid(AsteroidSize::Small);
                let mut rock = crate::sim::entity::Asteroid::new(
                    AsteroidSize::Small,
                    pos,
                    sprite,
                    &mut s.state.rng,
                );
                rock.vel = Vec2::ZERO;
                s.state.asteroids.push(rock);
                total_hits += 1;
            }
            status = s.update(&idle(), MAX_FRAME_DELTA_MS);
            // Drop split children and edge spawns between staged hits
            s.state.asteroids.clear();
            if status != SessionStatus::Running {
                break;
            }
        }

        assert_eq!(total_hits, 3);
        assert_eq!(s.state.lives, 0);
        assert_eq!(status, SessionStatus::Ended { score: 0 });
        // Status stays terminal on further updates
        assert_eq!(
            s.update(&idle(), FRAME_INTERVAL_MS),
            SessionStatus::Ended { score: 0 }
        );
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let run = || {
            let mut s = session(Difficulty::Medium);
            let fire = SessionInput {
                fire: true,
                thrust: true,
                rotate_left: true,
                ..SessionInput::default()
            };
            for _ in 0..600 {
                s.update(&fire, FRAME_INTERVAL_MS);
            }
            (
                s.state.score,
                s.state.lives,
                s.state.asteroids.len(),
                s.state.ship.pos,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_frame_delta_spike_is_clamped() {
        let mut s = session(Difficulty::Medium);
        s.state.asteroids.clear();
        s.state.ship.respawn();
        // A one-second spike must not burn more than the clamp's worth
        // of invulnerability
        s.update(&idle(), 1000.0);
        assert!(s.state.ship.invulnerable);
        assert!(s.state.ship.invulnerable_countdown >= INVULNERABILITY_MS - MAX_FRAME_DELTA_MS);
    }
}
