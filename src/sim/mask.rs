//! Pixel masks for collision detection
//!
//! A mask is an opacity-derived bit grid: bit set = opaque pixel. Overlap
//! tests are exact per-pixel, so collisions match what the player sees
//! instead of a bounding shape. Rotating a sprite changes its silhouette,
//! so rotated masks are rebuilt from the base mask (see the lazy
//! `collision_mask()` accessors on the entities).

use glam::Vec2;

/// Bit grid over a sprite's pixels, LSB-first within each 64-bit word
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl PixelMask {
    /// Empty (fully transparent) mask
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Build a mask by sampling a predicate at every pixel center
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..mask.height {
            for x in 0..mask.width {
                if f(x, y) {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    /// Filled disc of the given radius (dimensions 2r x 2r)
    pub fn disc(radius: u32) -> Self {
        let d = (radius * 2).max(1);
        let r = radius as f32;
        Self::from_fn(d, d, |x, y| {
            let dx = x as f32 + 0.5 - r;
            let dy = y as f32 + 0.5 - r;
            dx * dx + dy * dy <= r * r
        })
    }

    /// Filled axis-aligned ellipse
    pub fn ellipse(width: u32, height: u32) -> Self {
        let (rx, ry) = (width as f32 / 2.0, height as f32 / 2.0);
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    /// Filled isosceles triangle pointing up (apex at the top edge)
    pub fn triangle(width: u32, height: u32) -> Self {
        let half = width as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let spread = half * (y as f32 + 0.5) / height as f32;
            (x as f32 + 0.5 - half).abs() <= spread
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Half of the larger dimension; a cheap stand-in radius
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.width.max(self.height) as f32 / 2.0
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = y as usize * self.words_per_row + x as usize / 64;
        self.bits[word] >> (x % 64) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32) {
        debug_assert!(x < self.width && y < self.height);
        let word = y as usize * self.words_per_row + x as usize / 64;
        self.bits[word] |= 1 << (x % 64);
    }

    /// Number of set pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Mask of this silhouette rotated by `angle_deg` about its center.
    ///
    /// The result grows to the rotated bounding box, like rotating a
    /// sprite surface does. Nearest-neighbor sampling; good enough for
    /// collision silhouettes.
    pub fn rotated(&self, angle_deg: f32) -> PixelMask {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let new_w = (w * cos.abs() + h * sin.abs()).round().max(1.0) as u32;
        let new_h = (w * sin.abs() + h * cos.abs()).round().max(1.0) as u32;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let (ncx, ncy) = (new_w as f32 / 2.0, new_h as f32 / 2.0);

        let mut out = PixelMask::new(new_w, new_h);
        for y in 0..new_h {
            for x in 0..new_w {
                // Inverse-map the destination pixel back into source space
                let dx = x as f32 + 0.5 - ncx;
                let dy = y as f32 + 0.5 - ncy;
                let sx = cos * dx + sin * dy + cx;
                let sy = -sin * dx + cos * dy + cy;
                if sx >= 0.0 && sy >= 0.0 && self.get(sx as u32, sy as u32) {
                    out.set(x, y);
                }
            }
        }
        out
    }

    /// 64 bits of row `y` starting at column `x0` (which may be negative
    /// or run past the edge; out-of-range bits read as 0)
    fn row_window(&self, y: u32, x0: i64) -> u64 {
        let row = &self.bits[y as usize * self.words_per_row..][..self.words_per_row];
        let word_at = |idx: i64| -> u64 {
            if idx >= 0 && (idx as usize) < self.words_per_row {
                row[idx as usize]
            } else {
                0
            }
        };
        let first = x0.div_euclid(64);
        let shift = x0.rem_euclid(64) as u32;
        let mut out = word_at(first) >> shift;
        if shift > 0 {
            out |= word_at(first + 1) << (64 - shift);
        }
        out
    }

    /// True if any opaque pixel of `other` lands on an opaque pixel of
    /// `self`, with `other`'s top-left corner at `offset` relative to
    /// `self`'s top-left corner.
    pub fn overlaps(&self, other: &PixelMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = (offset.0 as i64, offset.1 as i64);
        let x0 = ox.max(0);
        let x1 = (ox + other.width as i64).min(self.width as i64);
        let y0 = oy.max(0);
        let y1 = (oy + other.height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            let mut x = x0;
            while x < x1 {
                let span = (x1 - x).min(64) as u32;
                let keep = if span == 64 { u64::MAX } else { (1 << span) - 1 };
                let a = self.row_window(y as u32, x);
                let b = other.row_window((y - oy) as u32, x - ox);
                if a & b & keep != 0 {
                    return true;
                }
                x += 64;
            }
        }
        false
    }
}

/// Pixel-exact overlap test between two masks positioned by their centers
pub fn masks_collide(a: &PixelMask, a_center: Vec2, b: &PixelMask, b_center: Vec2) -> bool {
    let a_left = (a_center.x - a.width() as f32 / 2.0).round() as i32;
    let a_top = (a_center.y - a.height() as f32 / 2.0).round() as i32;
    let b_left = (b_center.x - b.width() as f32 / 2.0).round() as i32;
    let b_top = (b_center.y - b.height() as f32 / 2.0).round() as i32;
    a.overlaps(b, (b_left - a_left, b_top - a_top))
}
