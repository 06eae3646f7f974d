use crate::config::PackerConfig;
use crate::model::SpriteSpec;
use tracing::debug;

/// Initial square target size from the total padded sprite area, clamped to the
/// configured maxima. A starting point only; the packers may still run out of room.
pub fn estimate_size<K>(sprites: &[SpriteSpec<K>], cfg: &PackerConfig) -> (u32, u32) {
    let pad = cfg.padding as u64;
    let total_area: u64 = sprites
        .iter()
        .map(|s| {
            let (w, h) = (s.width as u64, s.height as u64);
            if cfg.allow_rotation && w < h {
                // laid flat by the shelf packer
                (h + pad).saturating_mul(w + pad)
            } else {
                (w + pad).saturating_mul(h + pad)
            }
        })
        .fold(0u64, u64::saturating_add);
    let side = ceil_sqrt(total_area);
    debug!(total_area, side, "estimated atlas size from area");
    let side = u32::try_from(side).unwrap_or(u32::MAX);
    (side.min(cfg.max_width), side.min(cfg.max_height))
}

/// Smallest `s` with `s * s >= v`.
pub fn ceil_sqrt(v: u64) -> u64 {
    if v == 0 {
        return 0;
    }
    let mut s = (v as f64).sqrt() as u64;
    // float rounding can land one off either way
    while s.saturating_mul(s) < v {
        s += 1;
    }
    while s > 0 && (s - 1).saturating_mul(s - 1) >= v {
        s -= 1;
    }
    s
}
