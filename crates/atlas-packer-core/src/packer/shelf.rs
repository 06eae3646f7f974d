use super::Packer;
use crate::config::PackerConfig;
use crate::model::{Placement, Rect};

/// Row ("shelf") packer: sprites go left to right, wrapping to a new row once
/// the row width is exceeded. Rows grow downward until `max_height`.
///
/// Feed it sprites sorted by descending height; shorter sprites later in a row
/// leave vertical slack under the row's tallest sprite.
pub struct ShelfPacker {
    bin_width: u32,
    max_width: u32,
    max_height: u32,
    padding: u32,
    allow_rotation: bool,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    max_right: u32,
    max_bottom: u32,
}

#[derive(Clone, Copy, Debug)]
struct Spot {
    rect: Rect,
    rotated: bool,
    new_row: bool,
}

impl ShelfPacker {
    /// `bin_width` is the row wrap width (usually the estimated target width).
    pub fn new(config: &PackerConfig, bin_width: u32) -> Self {
        Self {
            bin_width: bin_width.min(config.max_width),
            max_width: config.max_width,
            max_height: config.max_height,
            padding: config.padding,
            allow_rotation: config.allow_rotation,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
            max_right: 0,
            max_bottom: 0,
        }
    }

    /// Row wrap width in effect.
    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    /// Running tight bound `(max x + w, max y + h)` over everything placed so far.
    pub fn used(&self) -> (u32, u32) {
        (self.max_right, self.max_bottom)
    }

    /// Places a `w x h` sprite. Returns the placed rect (post-rotation size) and
    /// whether it was rotated, or `None` if it would exceed the maximum atlas
    /// or has an empty side.
    pub fn insert(&mut self, w: u32, h: u32) -> Option<(Rect, bool)> {
        let spot = self.locate(w, h)?;
        if spot.new_row {
            self.cursor_y = spot.rect.y;
            self.row_height = 0;
        }
        self.cursor_x = spot.rect.right().saturating_add(self.padding);
        self.row_height = self.row_height.max(spot.rect.h);
        self.max_right = self.max_right.max(spot.rect.right());
        self.max_bottom = self.max_bottom.max(spot.rect.bottom());
        Some((spot.rect, spot.rotated))
    }

    fn orient(&self, w: u32, h: u32) -> (u32, u32, bool) {
        if !self.allow_rotation {
            return (w, h, false);
        }
        // tall sprites lie flat
        let (fw, fh, rotated) = if w < h { (h, w, true) } else { (w, h, false) };
        if fw > self.bin_width && fh <= self.bin_width {
            (fh, fw, !rotated)
        } else {
            (fw, fh, rotated)
        }
    }

    fn locate(&self, w: u32, h: u32) -> Option<Spot> {
        if w == 0 || h == 0 {
            return None;
        }
        let (fw, fh, rotated) = self.orient(w, h);
        let mut x = self.cursor_x;
        let mut y = self.cursor_y;
        let mut new_row = false;
        if x > 0 && x.saturating_add(fw) > self.bin_width {
            x = 0;
            y = y
                .saturating_add(self.row_height)
                .saturating_add(self.padding);
            new_row = true;
        }
        if x.saturating_add(fw) > self.max_width || y.saturating_add(fh) > self.max_height {
            return None;
        }
        Some(Spot {
            rect: Rect::new(x, y, fw, fh),
            rotated,
            new_row,
        })
    }
}

impl<K> Packer<K> for ShelfPacker {
    fn can_pack(&self, rect: &Rect) -> bool {
        self.locate(rect.w, rect.h).is_some()
    }

    fn pack(&mut self, key: K, rect: &Rect) -> Option<Placement<K>> {
        let (frame, rotated) = self.insert(rect.w, rect.h)?;
        Some(Placement {
            key,
            frame,
            rotated,
            source_size: (rect.w, rect.h),
        })
    }
}
