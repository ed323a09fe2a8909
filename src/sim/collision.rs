//! Collision detection and response
//!
//! The single authority for entity destruction and score changes. All
//! pairings in a frame are resolved against the state observed when
//! processing starts: anything destroyed by the bullet passes is removed
//! before the ship checks run, so a dead asteroid can never also hit the
//! ship in the same frame.
//!
//! Overlap tests are pixel-exact (see `mask`), not bounding shapes, so a
//! near miss that looks like a near miss stays a near miss.

use glam::Vec2;
use rand::Rng;

use super::entity::{Asteroid, AsteroidSize, Explosion};
use super::mask::masks_collide;
use super::state::SessionState;
use super::vfx::{ParticleKind, VfxDirector};
use crate::assets::AssetCatalog;
use crate::audio::AudioRouter;
use crate::consts::*;

/// What the ship ran into, in check-priority order
enum ShipHit {
    Asteroid(usize),
    Ufo(usize),
    EnemyBullet(usize),
}

#[derive(Debug, Clone)]
pub struct CollisionEngine;

impl CollisionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the full detection-and-response pass for one frame
    pub fn process(
        &self,
        state: &mut SessionState,
        vfx: &mut VfxDirector,
        assets: &AssetCatalog,
        audio: &mut AudioRouter,
    ) {
        let destroyed_asteroids = Self::bullet_asteroid_pass(state);
        let destroyed_ufos = Self::bullet_ufo_pass(state);

        for (pos, size) in destroyed_asteroids {
            self.asteroid_destroyed(state, vfx, assets, audio, pos, size);
        }
        for pos in destroyed_ufos {
            self.ufo_destroyed(state, vfx, assets, audio, pos);
        }

        // Ship checks run last, against survivors plus any children the
        // splits just produced. Only a vulnerable ship participates.
        if !state.ship.invulnerable {
            if let Some(hit) = Self::find_ship_hit(state) {
                self.player_hit(state, vfx, assets, audio, hit);
            }
        }
    }

    /// Player bullets vs asteroids. Walks asteroids in order and
    /// consumes at most one bullet per asteroid; a consumed bullet
    /// cannot destroy a second target in the same frame. Returns the
    /// destroyed asteroids' positions and sizes; the pairs are removed
    /// before anything else runs.
    fn bullet_asteroid_pass(state: &mut SessionState) -> Vec<(Vec2, AsteroidSize)> {
        let SessionState {
            bullets, asteroids, ..
        } = state;

        let mut dead_bullets = vec![false; bullets.len()];
        let mut dead_asteroids = vec![false; asteroids.len()];
        for (ai, asteroid) in asteroids.iter_mut().enumerate() {
            let pos = asteroid.pos;
            let mask = asteroid.collision_mask();
            for (bi, bullet) in bullets.iter().enumerate() {
                if dead_bullets[bi] {
                    continue;
                }
                if masks_collide(mask, pos, bullet.mask(), bullet.pos) {
                    dead_bullets[bi] = true;
                    dead_asteroids[ai] = true;
                    break;
                }
            }
        }

        let destroyed = asteroids
            .iter()
            .enumerate()
            .filter(|(i, _)| dead_asteroids[*i])
            .map(|(_, a)| (a.pos, a.size))
            .collect();
        retain_by_flags(asteroids, &dead_asteroids);
        retain_by_flags(bullets, &dead_bullets);
        destroyed
    }

    /// Player bullets vs UFOs, over the bullets that survived the
    /// asteroid pass. Same one-bullet-per-target rule.
    fn bullet_ufo_pass(state: &mut SessionState) -> Vec<Vec2> {
        let SessionState { bullets, ufos, .. } = state;

        let mut dead_bullets = vec![false; bullets.len()];
        let mut dead_ufos = vec![false; ufos.len()];
        for (ui, ufo) in ufos.iter().enumerate() {
            for (bi, bullet) in bullets.iter().enumerate() {
                if dead_bullets[bi] {
                    continue;
                }
                if masks_collide(ufo.collision_mask(), ufo.pos, bullet.mask(), bullet.pos) {
                    dead_bullets[bi] = true;
                    dead_ufos[ui] = true;
                    break;
                }
            }
        }

        let destroyed = ufos
            .iter()
            .enumerate()
            .filter(|(i, _)| dead_ufos[*i])
            .map(|(_, u)| u.pos)
            .collect();
        retain_by_flags(ufos, &dead_ufos);
        retain_by_flags(bullets, &dead_bullets);
        destroyed
    }

    /// Award, split, and play out the feedback for one downed asteroid
    fn asteroid_destroyed(
        &self,
        state: &mut SessionState,
        vfx: &mut VfxDirector,
        assets: &AssetCatalog,
        audio: &mut AudioRouter,
        pos: Vec2,
        size: AsteroidSize,
    ) {
        state.award(size.base_points());
        log::debug!("asteroid {size:?} down at {pos}, score {}", state.score);

        // Larger rocks break into two of the next tier down, each with a
        // fresh random velocity and spin
        if let Some(child_size) = size.split() {
            for _ in 0..2 {
                let child =
                    Asteroid::new(child_size, pos, assets.asteroid(child_size), &mut state.rng);
                state.asteroids.push(child);
            }
        }

        vfx.burst(state, pos, BURST_ASTEROID, ParticleKind::Explosion);
        vfx.trigger_shake(SHAKE_ASTEROID, SHAKE_DEFAULT_DURATION);
        self.explosion_at(state, assets, pos);
        // Rare scream instead of the stock explosion
        if state.rng.random_bool(0.05) {
            audio.play(assets.sounds.scream);
        } else {
            audio.play(assets.sounds.explosion);
        }
    }

    fn ufo_destroyed(
        &self,
        state: &mut SessionState,
        vfx: &mut VfxDirector,
        assets: &AssetCatalog,
        audio: &mut AudioRouter,
        pos: Vec2,
    ) {
        state.award(POINTS_UFO);
        log::debug!("UFO down at {pos}, score {}", state.score);

        vfx.burst(state, pos, BURST_UFO, ParticleKind::UfoExplosion);
        vfx.trigger_shake(SHAKE_UFO, SHAKE_DEFAULT_DURATION);
        self.explosion_at(state, assets, pos);
        audio.play(assets.sounds.explosion);
    }

    /// First collision against the vulnerable ship, in fixed priority
    /// order: asteroids, then UFOs, then enemy bullets. The first
    /// matching category short-circuits.
    fn find_ship_hit(state: &mut SessionState) -> Option<ShipHit> {
        let SessionState {
            ship,
            asteroids,
            ufos,
            enemy_bullets,
            ..
        } = state;
        let ship_pos = ship.pos;
        let ship_mask = ship.collision_mask();

        for (i, asteroid) in asteroids.iter_mut().enumerate() {
            let pos = asteroid.pos;
            if masks_collide(ship_mask, ship_pos, asteroid.collision_mask(), pos) {
                return Some(ShipHit::Asteroid(i));
            }
        }
        for (i, ufo) in ufos.iter().enumerate() {
            if masks_collide(ship_mask, ship_pos, ufo.collision_mask(), ufo.pos) {
                return Some(ShipHit::Ufo(i));
            }
        }
        for (i, bullet) in enemy_bullets.iter().enumerate() {
            if masks_collide(ship_mask, ship_pos, bullet.mask(), bullet.pos) {
                return Some(ShipHit::EnemyBullet(i));
            }
        }
        None
    }

    /// Lose a life, remove the colliding object, and either respawn
    /// invulnerable or leave lives at zero for the orchestrator to end
    /// the session
    fn player_hit(
        &self,
        state: &mut SessionState,
        vfx: &mut VfxDirector,
        assets: &AssetCatalog,
        audio: &mut AudioRouter,
        hit: ShipHit,
    ) {
        match hit {
            ShipHit::Asteroid(i) => {
                state.asteroids.remove(i);
            }
            ShipHit::Ufo(i) => {
                state.ufos.remove(i);
            }
            ShipHit::EnemyBullet(i) => {
                state.enemy_bullets.remove(i);
            }
        }

        state.lives = state.lives.saturating_sub(1);
        log::info!("ship hit, {} lives left", state.lives);

        let pos = state.ship.pos;
        vfx.burst(state, pos, BURST_PLAYER_HIT, ParticleKind::Explosion);
        vfx.trigger_shake(SHAKE_PLAYER_HIT, SHAKE_DEFAULT_DURATION);
        self.explosion_at(state, assets, pos);
        audio.play(assets.sounds.explosion);

        if state.lives > 0 {
            state.ship.respawn();
        }
    }

    /// Play the explosion animation, or skip it silently when the
    /// frames never loaded
    fn explosion_at(&self, state: &mut SessionState, assets: &AssetCatalog, pos: Vec2) {
        match &assets.explosion_frames {
            Some(frames) => state.explosions.push(Explosion::new(pos, frames.clone())),
            None => log::debug!("explosion frames missing, skipping animation"),
        }
    }
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the elements whose flag is unset, preserving order
fn retain_by_flags<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let keep = !dead[i];
        i += 1;
        keep
    });
}
