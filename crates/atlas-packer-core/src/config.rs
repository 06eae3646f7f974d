use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placement strategies. Both implement [`crate::packer::Packer`], so the
/// pipeline can swap them without touching callers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Row-by-row shelves (fast, the default path).
    Shelf,
    /// Skyline profile with bottom-left placement (denser, bounded bin).
    Skyline,
}

impl FromStr for Strategy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelf" | "row" => Ok(Self::Shelf),
            "skyline" | "sl" => Ok(Self::Skyline),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Maximum atlas width in pixels.
    pub max_width: u32,
    /// Maximum atlas height in pixels.
    pub max_height: u32,
    /// Pixels between sprites.
    pub padding: u32,
    /// Allow 90° rotations.
    pub allow_rotation: bool,

    #[serde(default = "default_strategy")]
    pub strategy: Strategy,
    /// Search a ladder of target widths and keep the smallest tight atlas.
    #[serde(default)]
    pub find_optimal_size: bool,

    /// Optional time budget for the optimal-size search (milliseconds). None or 0 disables.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    /// Evaluate optimal-size candidates in parallel when feature "parallel" is on.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_width: 2048,
            max_height: 2048,
            padding: 2,
            allow_rotation: false,
            strategy: default_strategy(),
            find_optimal_size: false,
            time_budget_ms: None,
            parallel: default_parallel(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - a maximum dimension is zero
    /// - the padding alone would fill the maximum atlas
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasPackerError;

        if self.max_width == 0 || self.max_height == 0 {
            return Err(AtlasPackerError::InvalidDimensions {
                width: self.max_width,
                height: self.max_height,
            });
        }

        if self.padding >= self.max_width || self.padding >= self.max_height {
            return Err(AtlasPackerError::InvalidConfig(format!(
                "padding ({}) leaves no usable space in a {}x{} atlas",
                self.padding, self.max_width, self.max_height
            )));
        }

        Ok(())
    }
}

fn default_strategy() -> Strategy {
    Strategy::Shelf
}
fn default_parallel() -> bool {
    false
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn strategy(mut self, v: Strategy) -> Self {
        self.cfg.strategy = v;
        self
    }
    pub fn find_optimal_size(mut self, v: bool) -> Self {
        self.cfg.find_optimal_size = v;
        self
    }
    pub fn time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.cfg.time_budget_ms = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
