use crate::error::{AtlasPackerError, Result};
use crate::export_atlas::to_region_atlas;
use crate::export_plist::to_plist;
use crate::model::PackingResult;
use crate::pipeline::tight_bounds;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;

/// Metadata formats the exporters can emit next to the atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Cocos2d property list (`.plist`).
    Plist,
    /// Spine/libGDX region atlas (`.atlas`).
    Atlas,
    /// TexturePacker-style JSON hash (`.json`).
    JsonHash,
}

impl FromStr for ExportFormat {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plist" | "cocos" => Ok(Self::Plist),
            "atlas" | "spine" => Ok(Self::Atlas),
            "json-hash" | "json_hash" | "json" => Ok(Self::JsonHash),
            _ => Err(()),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Plist => "plist",
            ExportFormat::Atlas => "atlas",
            ExportFormat::JsonHash => "json",
        }
    }

    /// Render `result` as this format, referencing the atlas image `texture_file_name`.
    pub fn render<K: ToString>(
        &self,
        result: &PackingResult<K>,
        texture_file_name: &str,
    ) -> Result<String> {
        match self {
            ExportFormat::Plist => Ok(to_plist(result, texture_file_name)),
            ExportFormat::Atlas => Ok(to_region_atlas(result, texture_file_name)),
            ExportFormat::JsonHash => {
                serde_json::to_string_pretty(&to_json_hash(result, texture_file_name))
                    .map_err(|e| AtlasPackerError::Encode(e.to_string()))
            }
        }
    }
}

/// Frames keyed by name plus a `meta` block.
/// Shape: `{ frames: { name: { frame, rotated, trimmed, spriteSourceSize, sourceSize } }, meta }`.
/// `frame` is the placed footprint; `sourceSize` is the sprite's unrotated size.
pub fn to_json_hash<K: ToString>(result: &PackingResult<K>, texture_file_name: &str) -> Value {
    let mut frames = serde_json::Map::new();
    for p in &result.placements {
        let (sw, sh) = p.source_size;
        frames.insert(
            p.key.to_string(),
            json!({
                "frame": {"x": p.frame.x, "y": p.frame.y, "w": p.frame.w, "h": p.frame.h},
                "rotated": p.rotated,
                "trimmed": false,
                "spriteSourceSize": {"x": 0, "y": 0, "w": sw, "h": sh},
                "sourceSize": {"w": sw, "h": sh},
            }),
        );
    }
    let (w, h) = tight_bounds(&result.placements);
    json!({
        "frames": frames,
        "meta": {
            "app": "atlas-packer",
            "version": env!("CARGO_PKG_VERSION"),
            "image": texture_file_name,
            "format": "RGBA8888",
            "size": {"w": w, "h": h},
            "scale": "1",
        }
    })
}
