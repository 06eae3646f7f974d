//! Core library for packing sprite images into a single texture atlas.
//!
//! - Strategies: Shelf (row by row, default) and Skyline (bottom-left), both behind [`Packer`]
//! - Pipeline: `pack_images` takes in-memory images and returns placements + the composited atlas;
//!   `pack_layout` does the same from sizes alone
//! - Exporters: Cocos2d plist, Spine/libGDX region atlas, JSON hash
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use atlas_packer_core::{InputImage, PackerConfig, pack_images, to_plist};
//! # fn main() -> anyhow::Result<()> {
//! let img1 = ImageReader::open("a.png")?.decode()?;
//! let img2 = ImageReader::open("b.png")?.decode()?;
//! let inputs = vec![
//!   InputImage { key: "a".into(), image: img1 },
//!   InputImage { key: "b".into(), image: img2 },
//! ];
//! let cfg = PackerConfig { max_width: 1024, max_height: 1024, ..Default::default() };
//! let out = pack_images(inputs, cfg)?;
//! out.rgba.save("atlas.png")?;
//! std::fs::write("atlas.plist", to_plist(&out.result, "atlas.png"))?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod estimate;
pub mod export;
pub mod export_atlas;
pub mod export_plist;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use estimate::*;
pub use export::*;
pub use export_atlas::*;
pub use export_plist::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder, Strategy};
    pub use crate::export::ExportFormat;
    pub use crate::model::{PackStats, PackingResult, Placement, Rect, SpriteSpec};
    pub use crate::packer::{Packer, shelf::ShelfPacker, skyline::SkylinePacker};
    pub use crate::{InputImage, PackOutput, pack_images, pack_layout, pack_sprites};
}
