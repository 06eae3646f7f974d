use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// Open-interval overlap test; touching edges do not intersect.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.right() || r.x >= self.right() || self.y >= r.bottom() || r.y >= self.bottom())
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// A sprite to place: identifier plus unrotated size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSpec<K = String> {
    pub key: K,
    pub width: u32,
    pub height: u32,
}

impl<K> SpriteSpec<K> {
    pub fn new(key: K, width: u32, height: u32) -> Self {
        Self { key, width, height }
    }
}

/// A placed sprite within the atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// User-specified key (e.g., file stem).
    pub key: K,
    /// Placed rectangle within the atlas (post-rotation width/height).
    pub frame: Rect,
    /// True if the sprite was rotated 90° when placed.
    pub rotated: bool,
    /// Original (unrotated) sprite size.
    pub source_size: (u32, u32),
}

/// Outcome of a packing run: placements in packing order and the tight atlas size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingResult<K = String> {
    pub placements: Vec<Placement<K>>,
    pub width: u32,
    pub height: u32,
}

impl<K: PartialEq<str>> PackingResult<K> {
    /// Looks up a placement by key.
    pub fn get(&self, key: &str) -> Option<&Placement<K>> {
        self.placements.iter().find(|p| p.key == *key)
    }
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of sprites placed.
    pub num_sprites: usize,
    /// Number of rotated sprites.
    pub num_rotated: usize,
    /// Atlas area (width * height).
    pub atlas_area: u64,
    /// Area covered by sprites.
    pub used_area: u64,
    /// used_area / atlas_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
}

impl<K> PackingResult<K> {
    /// Computes packing statistics for this result.
    pub fn stats(&self) -> PackStats {
        let atlas_area = (self.width as u64) * (self.height as u64);
        let mut used_area = 0u64;
        let mut num_rotated = 0;
        for p in &self.placements {
            used_area += (p.frame.w as u64) * (p.frame.h as u64);
            if p.rotated {
                num_rotated += 1;
            }
        }
        let occupancy = if atlas_area > 0 {
            used_area as f64 / atlas_area as f64
        } else {
            0.0
        };
        PackStats {
            num_sprites: self.placements.len(),
            num_rotated,
            atlas_area,
            used_area,
            occupancy,
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sprites: {}, Occupancy: {:.2}%, Atlas Area: {} px², Used Area: {} px², Rotated: {}",
            self.num_sprites,
            self.occupancy * 100.0,
            self.atlas_area,
            self.used_area,
            self.num_rotated,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.atlas_area.saturating_sub(self.used_area)
    }
}
