//! Visual feedback: particles and camera shake
//!
//! The director decouples trigger points (collision responses, thrust
//! input) from the particle and shake bookkeeping. Particles are pure
//! cosmetics - they never participate in collision and the simulation
//! result is identical with them disabled.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{UpdateCtx, advance};
use super::state::SessionState;
use crate::consts::*;
use crate::settings::Settings;
use crate::tail;

/// Particle flavors, each with its own sampling and decay rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Grey/white debris burst
    Explosion,
    /// Green burst for downed UFOs
    UfoExplosion,
    /// Engine trail; shrinks and shifts from warm white to red
    Thrust,
    /// Soft yellow glow
    PowerupGlow,
}

type Rgb = [u8; 3];

const EXPLOSION_COLORS: [Rgb; 3] = [[180, 180, 180], [255, 255, 255], [200, 200, 200]];
const UFO_EXPLOSION_COLORS: [Rgb; 3] = [[0, 255, 0], [100, 255, 100], [150, 255, 150]];
const THRUST_START_COLORS: [Rgb; 3] = [[255, 255, 220], [255, 250, 200], [255, 200, 150]];
const THRUST_END_COLORS: [Rgb; 3] = [[255, 60, 0], [200, 20, 0], [240, 90, 40]];
const GLOW_COLORS: [Rgb; 3] = [[255, 255, 0], [255, 220, 50], [255, 255, 100]];

fn pick(palette: &[Rgb; 3], rng: &mut impl Rng) -> Rgb {
    palette[rng.random_range(0..palette.len())]
}

fn random_unit(rng: &mut impl Rng) -> Vec2 {
    Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU))
}

/// A single cosmetic particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgb,
    /// Render opacity, 1.0 at birth
    pub alpha: f32,
    start_radius: f32,
    start_color: Rgb,
    end_color: Rgb,
    lifetime: f32,
    start_lifetime: f32,
}

impl Particle {
    /// Sample a burst particle of the given kind at a position
    pub fn burst(kind: ParticleKind, pos: Vec2, rng: &mut Pcg32) -> Self {
        let (radius, color, vel, lifetime) = match kind {
            ParticleKind::Explosion => (
                rng.random_range(2..=5) as f32,
                pick(&EXPLOSION_COLORS, rng),
                random_unit(rng) * rng.random_range(1.0..4.0),
                rng.random_range(300.0..800.0),
            ),
            ParticleKind::UfoExplosion => (
                rng.random_range(2..=5) as f32,
                pick(&UFO_EXPLOSION_COLORS, rng),
                random_unit(rng) * rng.random_range(1.0..5.0),
                rng.random_range(400.0..900.0),
            ),
            ParticleKind::PowerupGlow => (
                rng.random_range(8..=12) as f32,
                pick(&GLOW_COLORS, rng),
                Vec2::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                ) * 0.5,
                rng.random_range(300.0..500.0),
            ),
            // Thrust particles carry ship momentum; use `thrust()` instead
            ParticleKind::Thrust => (
                rng.random_range(3..=6) as f32,
                pick(&THRUST_START_COLORS, rng),
                Vec2::ZERO,
                rng.random_range(400.0..700.0),
            ),
        };
        Self {
            kind,
            pos,
            vel,
            radius,
            color,
            alpha: 1.0,
            start_radius: radius,
            start_color: color,
            end_color: if kind == ParticleKind::Thrust {
                pick(&THRUST_END_COLORS, rng)
            } else {
                color
            },
            lifetime,
            start_lifetime: lifetime,
        }
    }

    /// Sample a thrust-trail particle: ship momentum plus a randomized
    /// rearward push within a narrow cone around the tail direction
    pub fn thrust(pos: Vec2, ship_vel: Vec2, tail_dir: Vec2, rng: &mut Pcg32) -> Self {
        let mut particle = Self::burst(ParticleKind::Thrust, pos, rng);
        let cone: f32 = rng.random_range(-10.0..10.0);
        let push_speed = rng.random_range(1.5..4.0);
        let push = Vec2::from_angle(cone.to_radians()).rotate(tail_dir) * push_speed;
        particle.vel = ship_vel + push;
        particle
    }

    pub fn update(&mut self, dt: f32, _ctx: &UpdateCtx) {
        let life_percent = (self.lifetime / self.start_lifetime).max(0.0);
        match self.kind {
            ParticleKind::Thrust => {
                // Shrink and slide from warm white toward red
                self.radius = self.start_radius * life_percent;
                for i in 0..3 {
                    let (start, end) = (self.start_color[i] as f32, self.end_color[i] as f32);
                    self.color[i] = (start + (end - start) * (1.0 - life_percent)) as u8;
                }
            }
            _ => {
                self.alpha = life_percent;
            }
        }
        advance(&mut self.pos, self.vel, dt);
        self.lifetime -= dt;
    }

    pub fn alive(&self) -> bool {
        if self.lifetime <= 0.0 {
            return false;
        }
        // Thrust particles die once shrunk below a visible pixel
        self.kind != ParticleKind::Thrust || self.radius >= 1.0
    }
}

/// Camera shake and particle emission bookkeeping
#[derive(Debug, Clone)]
pub struct VfxDirector {
    shake_magnitude: f32,
    /// Remaining shake duration in frames, not milliseconds
    shake_duration: u32,
    shake_enabled: bool,
    particles_enabled: bool,
}

impl VfxDirector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            shake_magnitude: 0.0,
            shake_duration: 0,
            shake_enabled: settings.screen_shake_on,
            particles_enabled: settings.particles_on,
        }
    }

    /// Request a shake pulse. Overlapping triggers keep the larger of
    /// the current and requested magnitude and duration independently;
    /// they never stack additively.
    pub fn trigger_shake(&mut self, magnitude: f32, duration: u32) {
        if !self.shake_enabled {
            return;
        }
        self.shake_magnitude = self.shake_magnitude.max(magnitude);
        self.shake_duration = self.shake_duration.max(duration);
    }

    /// Per-frame decay: duration counts down one frame at a time and the
    /// magnitude drops to zero exactly when the duration runs out
    pub fn update(&mut self) {
        if !self.shake_enabled {
            self.shake_magnitude = 0.0;
            self.shake_duration = 0;
            return;
        }
        if self.shake_duration > 0 {
            self.shake_duration -= 1;
            if self.shake_duration == 0 {
                self.shake_magnitude = 0.0;
            }
        }
    }

    /// Advisory jitter for the scene's draw position; entity logical
    /// positions are never shaken
    pub fn render_offset(&self, rng: &mut Pcg32) -> Vec2 {
        if self.shake_magnitude <= 0.0 {
            return Vec2::ZERO;
        }
        let m = self.shake_magnitude;
        Vec2::new(rng.random_range(-m..=m), rng.random_range(-m..=m))
    }

    pub fn shake_magnitude(&self) -> f32 {
        self.shake_magnitude
    }

    pub fn shake_duration(&self) -> u32 {
        self.shake_duration
    }

    /// Emit `count` independent particles of one kind at a position
    pub fn burst(&self, state: &mut SessionState, pos: Vec2, count: usize, kind: ParticleKind) {
        if !self.particles_enabled {
            return;
        }
        for _ in 0..count {
            if state.particles.len() >= MAX_PARTICLES {
                break;
            }
            let particle = Particle::burst(kind, pos, &mut state.rng);
            state.particles.push(particle);
        }
    }

    /// Emit the engine trail for one accelerating frame
    pub fn emit_thrust(&self, state: &mut SessionState) {
        if !self.particles_enabled {
            return;
        }
        let ship = &state.ship;
        let tail_dir = tail(ship.angle);
        let pos = ship.pos + tail_dir * ship.radius();
        let vel = ship.vel;
        for _ in 0..THRUST_PARTICLES_PER_FRAME {
            if state.particles.len() >= MAX_PARTICLES {
                break;
            }
            let particle = Particle::thrust(pos, vel, tail_dir, &mut state.rng);
            state.particles.push(particle);
        }
    }
}
