//! Cascaded Shadow Settings
//!
//! Static configuration of one directional light's cascades. It is consumed
//! once by [`CascadedShadowMap::new`](super::CascadedShadowMap::new), which
//! validates it and builds the partition and atlas layout; nothing here is
//! re-read per frame.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use umbra::shadow::{CascadeShadowSettings, CascadedShadowMap};
//!
//! // Reference setup: 3 cascades at 3% / 6% / 15% of the view range
//! let shadows = CascadedShadowMap::new(CascadeShadowSettings::default())?;
//!
//! // Four evenly spread cascades with wider PCF
//! let settings = CascadeShadowSettings {
//!     cascade_splits: vec![25.0, 50.0, 75.0, 100.0],
//!     pcf_half_width: 2.0,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file; missing fields take their defaults
//! let settings = CascadeShadowSettings::from_json_file("shadows.json")?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UmbraError};

use super::atlas::ShadowAtlasLayout;
use super::fitter::DEFAULT_LIGHT_DISTANCE;
use super::partition::CascadePartition;

/// Cascade, atlas and filtering configuration.
///
/// # Fields
///
/// | Field            | Description                                         | Default           |
/// |------------------|-----------------------------------------------------|-------------------|
/// | `cascade_splits` | Cumulative split values, strictly ascending         | `[3, 6, 15]`      |
/// | `partition_max`  | Split value that stands for the far clip            | `100`             |
/// | `tile_dimension` | Per-cascade shadow map resolution (texels)          | `2048`            |
/// | `pcf_half_width` | PCF kernel half-width (texels), drives tile padding | `1`               |
/// | `light_distance` | Light eye distance behind the camera (world units)  | `100`             |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeShadowSettings {
    /// One entry per cascade; the cascade count is `cascade_splits.len()`.
    pub cascade_splits: Vec<f32>,

    /// The value of `cascade_splits` that maps to the camera's far clip.
    ///
    /// With the default of `100`, splits read as percentages of `far - near`.
    pub partition_max: f32,

    /// Width and height of each cascade's tile in the shared atlas.
    pub tile_dimension: u32,

    /// Half-width of the PCF kernel used when sampling the atlas.
    ///
    /// Each cascade's box is widened by this many texels on every side so the
    /// filter never reads a neighbouring cascade's tile.
    pub pcf_half_width: f32,

    /// How far behind the camera the virtual light eye is placed.
    ///
    /// Only needs to be large enough to sit behind every cascade; near/far
    /// come from the scene bounds.
    pub light_distance: f32,
}

impl Default for CascadeShadowSettings {
    fn default() -> Self {
        Self {
            cascade_splits: vec![3.0, 6.0, 15.0],
            partition_max: 100.0,
            tile_dimension: 2048,
            pcf_half_width: 1.0,
            light_distance: DEFAULT_LIGHT_DISTANCE,
        }
    }
}

impl CascadeShadowSettings {
    #[inline]
    #[must_use]
    pub fn cascade_count(&self) -> usize {
        self.cascade_splits.len()
    }

    /// Checks every field; the first problem found is returned.
    pub fn validate(&self) -> Result<()> {
        self.partition()?;
        self.atlas_layout()?;

        if !self.pcf_half_width.is_finite() || self.pcf_half_width < 0.0 {
            return Err(UmbraError::InvalidPcfKernel(self.pcf_half_width));
        }
        if !self.light_distance.is_finite() || self.light_distance <= 0.0 {
            return Err(UmbraError::InvalidLightDistance(self.light_distance));
        }
        Ok(())
    }

    /// The validated cascade partition.
    pub fn partition(&self) -> Result<CascadePartition> {
        CascadePartition::new(&self.cascade_splits, self.partition_max)
    }

    /// The validated atlas layout.
    pub fn atlas_layout(&self) -> Result<ShadowAtlasLayout> {
        ShadowAtlasLayout::new(self.cascade_count(), self.tile_dimension)
    }

    /// Parses and validates settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
