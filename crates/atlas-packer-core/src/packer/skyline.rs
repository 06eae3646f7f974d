use super::Packer;
use crate::config::PackerConfig;
use crate::model::{Placement, Rect};

/// One band of the skyline: `[x, x + width)` is used up to height `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkylineSegment {
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

impl SkylineSegment {
    #[inline]
    fn right(&self) -> u32 {
        self.x + self.width
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    index: usize,
    x: u32,
    y: u32,
}

/// Skyline packer over a fixed `width x height` bin, bottom-left heuristic.
///
/// The segment list always covers `[0, width)` in ascending `x` with no gaps,
/// and after every insertion no two neighbours share a height.
pub struct SkylinePacker {
    width: u32,
    height: u32,
    padding: u32,
    allow_rotation: bool,
    skyline: Vec<SkylineSegment>,
}

impl SkylinePacker {
    pub fn new(config: &PackerConfig, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: config.padding,
            allow_rotation: config.allow_rotation,
            skyline: vec![SkylineSegment { x: 0, y: 0, width }],
        }
    }

    pub fn bin_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn segments(&self) -> &[SkylineSegment] {
        &self.skyline
    }

    /// Inserts a `w x h` footprint. On success returns the footprint rect (offset
    /// by `padding` on both axes, swapped if rotated) and the rotation flag.
    /// On failure the skyline is left untouched. Empty footprints are rejected.
    pub fn insert(&mut self, w: u32, h: u32) -> Option<(Rect, bool)> {
        let (c, fw, fh, rotated) = self.find(w, h)?;
        self.split(c.index, &Rect::new(c.x, c.y, fw, fh));
        self.merge();
        Some((
            Rect::new(c.x + self.padding, c.y + self.padding, fw, fh),
            rotated,
        ))
    }

    fn find(&self, w: u32, h: u32) -> Option<(Candidate, u32, u32, bool)> {
        // a zero-width segment would break the profile
        if w == 0 || h == 0 {
            return None;
        }
        let mut best = self.find_best_position(w, h).map(|c| (c, w, h, false));
        if self.allow_rotation {
            if let Some(c) = self.find_best_position(h, w) {
                // upright wins ties
                let better = match &best {
                    None => true,
                    Some((b, ..)) => c.y < b.y || (c.y == b.y && c.x < b.x),
                };
                if better {
                    best = Some((c, h, w, true));
                }
            }
        }
        best
    }

    fn find_best_position(&self, w: u32, h: u32) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (i, seg) in self.skyline.iter().enumerate() {
            let end = match seg.x.checked_add(w) {
                Some(end) if end <= self.width => end,
                // segments are sorted by x, nothing further right fits either
                _ => break,
            };
            let y = self.skyline[i..]
                .iter()
                .take_while(|s| s.x < end)
                .map(|s| s.y)
                .max()
                .unwrap_or(seg.y);
            if y.saturating_add(h) > self.height {
                continue;
            }
            if best.is_none_or(|b| y < b.y) {
                best = Some(Candidate { index: i, x: seg.x, y });
            }
        }
        best
    }

    fn split(&mut self, index: usize, rect: &Rect) {
        let segment = SkylineSegment {
            x: rect.x,
            y: rect.bottom(),
            width: rect.w,
        };
        debug_assert!(segment.right() <= self.width);
        debug_assert!(segment.y <= self.height);

        self.skyline.insert(index, segment);

        // trim the segments now covered by the new one
        let i = index + 1;
        while i < self.skyline.len() {
            let covered_to = self.skyline[i - 1].right();
            if self.skyline[i].x >= covered_to {
                break;
            }
            let shrink = covered_to - self.skyline[i].x;
            if self.skyline[i].width <= shrink {
                self.skyline.remove(i);
            } else {
                self.skyline[i].x += shrink;
                self.skyline[i].width -= shrink;
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skyline.len() {
            if self.skyline[i - 1].y == self.skyline[i].y {
                let w = self.skyline[i].width;
                self.skyline[i - 1].width = self.skyline[i - 1].width.saturating_add(w);
                self.skyline.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// The footprint is inflated by `padding` and offset by it, so a sprite never
/// touches the bin edges. Unlike [`super::shelf::ShelfPacker`], a sprite exactly
/// as wide (or tall) as the bin does not fit unless `padding` is zero.
impl<K> Packer<K> for SkylinePacker {
    fn can_pack(&self, rect: &Rect) -> bool {
        let w = rect.w.saturating_add(self.padding);
        let h = rect.h.saturating_add(self.padding);
        self.find(w, h).is_some()
    }

    fn pack(&mut self, key: K, rect: &Rect) -> Option<Placement<K>> {
        // reserve the padding with the sprite so neighbours never touch
        let w = rect.w.saturating_add(self.padding);
        let h = rect.h.saturating_add(self.padding);
        let (slot, rotated) = self.insert(w, h)?;
        let (fw, fh) = if rotated {
            (rect.h, rect.w)
        } else {
            (rect.w, rect.h)
        };
        Some(Placement {
            key,
            frame: Rect::new(slot.x, slot.y, fw, fh),
            rotated,
            source_size: (rect.w, rect.h),
        })
    }
}
