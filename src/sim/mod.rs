//! Deterministic gameplay simulation
//!
//! All gameplay logic lives here. The module must stay pure with respect
//! to platform concerns:
//! - Seeded RNG only, owned by the session state
//! - Fixed per-frame system order (spawn, vfx, collision, motion)
//! - No rendering or file IO; assets are opaque handles

pub mod collision;
pub mod entity;
pub mod mask;
pub mod session;
pub mod spawn;
pub mod state;
pub mod vfx;

pub use collision::CollisionEngine;
pub use entity::{
    Asteroid, AsteroidSize, Bullet, BulletOwner, Explosion, Ship, Ufo, UfoPattern, UpdateCtx,
};
pub use mask::{PixelMask, masks_collide};
pub use session::{GameSession, SessionInput, SessionStatus};
pub use spawn::SpawnDirector;
pub use state::SessionState;
pub use vfx::{Particle, ParticleKind, VfxDirector};
