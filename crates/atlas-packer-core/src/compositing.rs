use crate::model::PackingResult;
use image::RgbaImage;
use std::collections::HashMap;

/// Blit `src` into `canvas` with its top-left at (dx, dy), optionally rotated
/// 90° clockwise. Pixels falling outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, rotated: bool) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    // destination (rendered) size differs when rotated
    let (rw, rh) = if rotated { (sh, sw) } else { (sw, sh) };

    for yy in 0..rh {
        for xx in 0..rw {
            let (ix, iy) = if rotated {
                (yy, sh - 1 - xx)
            } else {
                (xx, yy)
            };
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(ix, iy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}

/// Draws every placed sprite into a transparent canvas of the result's tight size.
/// Placements whose key has no entry in `sprites` are left blank.
pub fn compose_atlas<K: AsRef<str>>(
    result: &PackingResult<K>,
    sprites: &HashMap<String, RgbaImage>,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(result.width, result.height);
    for p in &result.placements {
        if let Some(src) = sprites.get(p.key.as_ref()) {
            blit_rgba(src, &mut canvas, p.frame.x, p.frame.y, p.rotated);
        }
    }
    canvas
}
