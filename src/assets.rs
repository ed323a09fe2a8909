//! Opaque asset handles and collision-mask data
//!
//! The core never loads files. An asset provider hands it this catalog:
//! sprite and sound handles by logical name, each sprite paired with the
//! opacity-derived pixel mask the collision engine needs. Optional
//! entries (the explosion animation, every sound) may simply be absent -
//! the affected effect is skipped, never an error.

use std::sync::Arc;

use crate::sim::entity::AsteroidSize;
use crate::sim::mask::PixelMask;

/// Opaque reference to a loaded sprite or animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

/// Opaque reference to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// A sprite handle bundled with its collision silhouette
#[derive(Debug, Clone)]
pub struct SpriteData {
    pub handle: SpriteHandle,
    pub mask: Arc<PixelMask>,
}

impl SpriteData {
    pub fn new(handle: SpriteHandle, mask: PixelMask) -> Self {
        Self {
            handle,
            mask: Arc::new(mask),
        }
    }
}

/// Sound handles by logical name; `None` = failed to load, skip it
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundBank {
    pub explosion: Option<SoundHandle>,
    /// Rare easter-egg variant of the explosion
    pub scream: Option<SoundHandle>,
    pub player_shot: Option<SoundHandle>,
    pub enemy_shot: Option<SoundHandle>,
}

/// Everything the simulation references by name
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    pub ship: SpriteData,
    /// Pre-scaled per size tier, indexed smallest first
    asteroids: [SpriteData; 3],
    pub ufo_horizontal: SpriteData,
    pub ufo_vertical: SpriteData,
    pub player_shot: SpriteData,
    pub enemy_shot: SpriteData,
    /// Animation frames, in playback order; `None` when loading failed
    pub explosion_frames: Option<Arc<Vec<SpriteHandle>>>,
    pub sounds: SoundBank,
}

impl AssetCatalog {
    /// Asteroid sprite for a size tier
    pub fn asteroid(&self, size: AsteroidSize) -> &SpriteData {
        match size {
            AsteroidSize::Small => &self.asteroids[0],
            AsteroidSize::Medium => &self.asteroids[1],
            AsteroidSize::Large => &self.asteroids[2],
        }
    }

    /// Catalog backed by procedural silhouettes instead of image files.
    /// Drives tests and headless runs; shapes approximate the real
    /// sprites (triangular ship, round rocks, saucer-shaped UFOs).
    pub fn procedural() -> Self {
        let mut next = 0u32;
        let mut handle = || {
            next += 1;
            SpriteHandle(next)
        };

        let asteroids = [
            SpriteData::new(handle(), PixelMask::disc(15)),
            SpriteData::new(handle(), PixelMask::disc(25)),
            SpriteData::new(handle(), PixelMask::disc(45)),
        ];
        let explosion_frames: Vec<SpriteHandle> = (0..6).map(|_| handle()).collect();

        Self {
            ship: SpriteData::new(handle(), PixelMask::triangle(16, 16)),
            asteroids,
            ufo_horizontal: SpriteData::new(handle(), PixelMask::ellipse(36, 18)),
            ufo_vertical: SpriteData::new(handle(), PixelMask::ellipse(18, 36)),
            player_shot: SpriteData::new(handle(), PixelMask::disc(2)),
            enemy_shot: SpriteData::new(handle(), PixelMask::disc(2)),
            explosion_frames: Some(Arc::new(explosion_frames)),
            sounds: SoundBank {
                explosion: Some(SoundHandle(1)),
                scream: Some(SoundHandle(2)),
                player_shot: Some(SoundHandle(3)),
                enemy_shot: Some(SoundHandle(4)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asteroid_masks_match_tier_radii() {
        let catalog = AssetCatalog::procedural();
        for size in [AsteroidSize::Small, AsteroidSize::Medium, AsteroidSize::Large] {
            let mask = &catalog.asteroid(size).mask;
            assert_eq!(mask.width() as f32, size.radius() * 2.0);
        }
    }

    #[test]
    fn test_handles_are_distinct() {
        let catalog = AssetCatalog::procedural();
        let mut seen = std::collections::HashSet::new();
        assert!(seen.insert(catalog.ship.handle));
        assert!(seen.insert(catalog.ufo_horizontal.handle));
        assert!(seen.insert(catalog.ufo_vertical.handle));
        assert!(seen.insert(catalog.player_shot.handle));
        assert!(seen.insert(catalog.enemy_shot.handle));
        for frame in catalog.explosion_frames.as_deref().unwrap() {
            assert!(seen.insert(*frame));
        }
    }
}
