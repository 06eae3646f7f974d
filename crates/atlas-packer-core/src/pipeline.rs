use crate::config::{PackerConfig, Strategy};
use crate::error::{AtlasPackerError, Result};
use crate::estimate::estimate_size;
use crate::model::{PackStats, PackingResult, Placement, Rect, SpriteSpec};
use crate::packer::{Packer, shelf::ShelfPacker, skyline::SkylinePacker};
use image::{DynamicImage, RgbaImage};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Upper bound on the width ladder walked by the optimal-size search.
const OPTIMAL_SIZE_STEPS: u32 = 64;

/// In-memory image to pack (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Output of a packing run: placements and the composited RGBA atlas.
#[derive(Debug)]
pub struct PackOutput {
    pub result: PackingResult,
    pub rgba: RgbaImage,
}

impl PackOutput {
    /// Computes packing statistics for this output.
    /// This is a convenience method that delegates to `result.stats()`.
    pub fn stats(&self) -> PackStats {
        self.result.stats()
    }
}

#[instrument(skip_all)]
/// Packs `inputs` into one atlas using configuration `cfg` and returns the placements
/// together with the composited RGBA image (tight size, transparent background).
pub fn pack_images(inputs: Vec<InputImage>, cfg: PackerConfig) -> Result<PackOutput> {
    let decoded: Vec<(String, RgbaImage)> = inputs
        .into_iter()
        .map(|inp| (inp.key, inp.image.to_rgba8()))
        .collect();
    let specs: Vec<SpriteSpec> = decoded
        .iter()
        .map(|(key, rgba)| SpriteSpec::new(key.clone(), rgba.width(), rgba.height()))
        .collect();

    // Layout first so duplicate keys are rejected before the lookup map collapses them
    let result = pack_sprites(specs, cfg)?;

    let sprites: HashMap<String, RgbaImage> = decoded.into_iter().collect();
    let rgba = crate::compositing::compose_atlas(&result, &sprites);
    Ok(PackOutput { result, rgba })
}

/// Packs sizes into one atlas without compositing pixel data.
/// Inputs are (key, width, height).
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: PackerConfig,
) -> Result<PackingResult> {
    let sprites = inputs
        .into_iter()
        .map(|(k, w, h)| SpriteSpec::new(k.into(), w, h))
        .collect();
    pack_sprites(sprites, cfg)
}

#[instrument(skip_all, fields(count = sprites.len()))]
/// Packs sprite specs into one atlas.
///
/// Notes:
/// - Sprites are sorted by descending height, ties by key, so results do not depend on input order.
/// - The final size is the tight bounding box of the placements, not the estimate.
/// - Either every sprite is placed or the run fails with `PlacementFailure`.
pub fn pack_sprites(sprites: Vec<SpriteSpec>, cfg: PackerConfig) -> Result<PackingResult> {
    cfg.validate()?;

    if sprites.is_empty() {
        return Err(AtlasPackerError::InputMissing("no sprites to pack".into()));
    }
    if let Some(s) = sprites.iter().find(|s| s.width == 0 || s.height == 0) {
        return Err(AtlasPackerError::InvalidDimensions {
            width: s.width,
            height: s.height,
        });
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(sprites.len());
    for s in &sprites {
        if !seen.insert(s.key.as_str()) {
            return Err(AtlasPackerError::DuplicateIdentifier(s.key.clone()));
        }
    }

    let sorted = sort_sprites(sprites);
    let target = estimate_size(&sorted, &cfg);
    debug!(
        width = target.0,
        height = target.1,
        "initial target size"
    );

    let result = if cfg.find_optimal_size {
        pack_optimal(&sorted, &cfg, target)?
    } else {
        pack_with_strategy(&sorted, &cfg, target)?
    };
    info!(
        width = result.width,
        height = result.height,
        sprites = result.placements.len(),
        "final atlas size (tight)"
    );
    Ok(result)
}

fn sort_sprites(mut sprites: Vec<SpriteSpec>) -> Vec<SpriteSpec> {
    sprites.sort_by(|a, b| b.height.cmp(&a.height).then_with(|| a.key.cmp(&b.key)));
    sprites
}

fn new_packer(cfg: &PackerConfig, bin: (u32, u32)) -> Box<dyn Packer<String>> {
    match cfg.strategy {
        Strategy::Shelf => Box::new(ShelfPacker::new(cfg, bin.0)),
        Strategy::Skyline => Box::new(SkylinePacker::new(cfg, bin.0, bin.1)),
    }
}

fn pack_with_strategy(
    sorted: &[SpriteSpec],
    cfg: &PackerConfig,
    target: (u32, u32),
) -> Result<PackingResult> {
    let (mut w, mut h) = target;
    loop {
        let mut packer = new_packer(cfg, (w, h));
        match place_all(packer.as_mut(), sorted, cfg) {
            Ok(result) => return Ok(result),
            // Shelf rows only stop at the maxima; a skyline bin can still grow
            Err(AtlasPackerError::PlacementFailure { key, .. })
                if cfg.strategy == Strategy::Skyline
                    && (w < cfg.max_width || h < cfg.max_height) =>
            {
                let next = (grow(w, cfg.max_width), grow(h, cfg.max_height));
                debug!(
                    %key,
                    from = ?(w, h),
                    to = ?next,
                    "skyline bin full, retrying with a larger bin"
                );
                (w, h) = next;
            }
            Err(e) => return Err(e),
        }
    }
}

fn grow(v: u32, max: u32) -> u32 {
    v.saturating_add((v / 4).max(1)).min(max)
}

fn place_all(
    packer: &mut dyn Packer<String>,
    sorted: &[SpriteSpec],
    cfg: &PackerConfig,
) -> Result<PackingResult> {
    let mut placements: Vec<Placement> = Vec::with_capacity(sorted.len());
    for s in sorted {
        let rect = Rect::new(0, 0, s.width, s.height);
        match packer.pack(s.key.clone(), &rect) {
            Some(p) => placements.push(p),
            None => return Err(placement_failure(s, cfg)),
        }
    }

    let (width, height) = tight_bounds(&placements);
    if width > cfg.max_width || height > cfg.max_height {
        let overflow = placements
            .iter()
            .find(|p| p.frame.right() > cfg.max_width || p.frame.bottom() > cfg.max_height);
        if let Some(p) = overflow {
            return Err(AtlasPackerError::PlacementFailure {
                key: p.key.clone(),
                width: p.source_size.0,
                height: p.source_size.1,
                max_width: cfg.max_width,
                max_height: cfg.max_height,
            });
        }
    }
    Ok(PackingResult {
        placements,
        width,
        height,
    })
}

fn placement_failure(s: &SpriteSpec, cfg: &PackerConfig) -> AtlasPackerError {
    AtlasPackerError::PlacementFailure {
        key: s.key.clone(),
        width: s.width,
        height: s.height,
        max_width: cfg.max_width,
        max_height: cfg.max_height,
    }
}

/// Tight atlas size: `(max x + w, max y + h)` over all placements.
pub fn tight_bounds<K>(placements: &[Placement<K>]) -> (u32, u32) {
    placements.iter().fold((0, 0), |(w, h), p| {
        (w.max(p.frame.right()), h.max(p.frame.bottom()))
    })
}

// ---------- optimal-size search ----------

fn pack_optimal(
    sorted: &[SpriteSpec],
    cfg: &PackerConfig,
    target: (u32, u32),
) -> Result<PackingResult> {
    let widths = candidate_widths(sorted, cfg, target.0);
    debug!(candidates = widths.len(), "optimal-size search");

    // Parallel path (optional)
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let best = widths
                .par_iter()
                .enumerate()
                .filter_map(|(idx, &w)| run_candidate(sorted, cfg, w).ok().map(|r| (idx, r)))
                .min_by_key(|(idx, r)| score(*idx, r));
            return match best {
                Some((_, r)) => Ok(r),
                None => pack_with_strategy(sorted, cfg, target),
            };
        }
    }

    // Sequential path with optional time budget
    let start = Instant::now();
    let budget_ms = cfg.time_budget_ms.unwrap_or(0);
    let mut best: Option<(usize, PackingResult)> = None;
    for (idx, &w) in widths.iter().enumerate() {
        if budget_ms > 0 && start.elapsed().as_millis() as u64 > budget_ms {
            debug!(evaluated = idx, "optimal-size time budget exhausted");
            break;
        }
        let Ok(r) = run_candidate(sorted, cfg, w) else {
            continue;
        };
        debug!(
            bin_width = w,
            width = r.width,
            height = r.height,
            "optimal-size candidate"
        );
        let better = match &best {
            None => true,
            Some((bidx, br)) => score(idx, &r) < score(*bidx, br),
        };
        if better {
            best = Some((idx, r));
        }
    }
    match best {
        Some((_, r)) => Ok(r),
        None => pack_with_strategy(sorted, cfg, target),
    }
}

fn run_candidate(sorted: &[SpriteSpec], cfg: &PackerConfig, bin_width: u32) -> Result<PackingResult> {
    let mut packer = new_packer(cfg, (bin_width, cfg.max_height));
    place_all(packer.as_mut(), sorted, cfg)
}

/// Smaller area first, then the smaller longest side, then the earlier candidate.
fn score(idx: usize, r: &PackingResult) -> (u64, u32, usize) {
    (
        (r.width as u64) * (r.height as u64),
        r.width.max(r.height),
        idx,
    )
}

fn candidate_widths(sorted: &[SpriteSpec], cfg: &PackerConfig, estimate: u32) -> Vec<u32> {
    // No layout can be narrower than the widest sprite in its narrowest allowed orientation
    let min_w = sorted
        .iter()
        .map(|s| {
            if cfg.allow_rotation {
                s.width.min(s.height)
            } else {
                s.width
            }
        })
        .max()
        .unwrap_or(1)
        .clamp(1, cfg.max_width);
    let max_w = cfg.max_width;
    let step = ((max_w - min_w) / OPTIMAL_SIZE_STEPS).max(1);

    let mut widths = vec![estimate.clamp(min_w, max_w)];
    let mut w = min_w;
    while w < max_w {
        widths.push(w);
        w = w.saturating_add(step);
    }
    widths.push(max_w);

    let mut seen = HashSet::new();
    widths.retain(|w| seen.insert(*w));
    widths
}
