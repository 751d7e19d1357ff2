//! Shadow Atlas Layout
//!
//! All cascades of a light share one depth texture. Each cascade owns a
//! square `tile_dimension` tile; tiles are laid out left to right:
//!
//! ```text
//! ┌──────────┬──────────┬──────────┐
//! │ cascade 0│ cascade 1│ cascade 2│  height = tile
//! └──────────┴──────────┴──────────┘
//!   width = tile * cascade_count
//! ```
//!
//! The layout is fixed at construction. Besides the render viewports it
//! provides the scale/offset that maps a cascade's clip-space XY into its
//! sub-rectangle of the atlas, for the shading pass.

use glam::{Mat4, UVec2, Vec2, Vec4};
use smallvec::SmallVec;

use crate::errors::{Result, UmbraError};

use super::partition::MAX_CASCADES;

/// A render viewport inside the atlas, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShadowViewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ShadowViewport {
    pub const MIN_DEPTH: f32 = 0.0;
    pub const MAX_DEPTH: f32 = 1.0;

    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// `true` if the two rectangles share at least one texel.
    #[must_use]
    pub fn overlaps(&self, other: &ShadowViewport) -> bool {
        let x_overlap = u64::from(self.x) < u64::from(other.x) + u64::from(other.width)
            && u64::from(other.x) < u64::from(self.x) + u64::from(self.width);
        let y_overlap = u64::from(self.y) < u64::from(other.y) + u64::from(other.height)
            && u64::from(other.y) < u64::from(self.y) + u64::from(self.height);
        x_overlap && y_overlap
    }

    #[must_use]
    pub fn contains_texel(&self, texel: UVec2) -> bool {
        texel.x >= self.x
            && texel.y >= self.y
            && u64::from(texel.x) < u64::from(self.x) + u64::from(self.width)
            && u64::from(texel.y) < u64::from(self.y) + u64::from(self.height)
    }
}

/// Maps cascade clip-space XY (`[-1, 1]`, `+Y` up) to atlas UV (`v` down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeTextureTransform {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl CascadeTextureTransform {
    #[must_use]
    pub fn apply(&self, clip_xy: Vec2) -> Vec2 {
        clip_xy * self.scale + self.offset
    }

    /// The same mapping as a matrix; depth passes through unchanged.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(self.scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, self.scale.y, 0.0, 0.0),
            Vec4::Z,
            Vec4::new(self.offset.x, self.offset.y, 0.0, 1.0),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowAtlasLayout {
    tile_dimension: u32,
    viewports: SmallVec<[ShadowViewport; 4]>,
    transforms: SmallVec<[CascadeTextureTransform; 4]>,
}

impl ShadowAtlasLayout {
    pub fn new(cascade_count: usize, tile_dimension: u32) -> Result<Self> {
        if cascade_count == 0 || cascade_count > MAX_CASCADES {
            return Err(UmbraError::InvalidCascadeCount {
                count: cascade_count,
                max: MAX_CASCADES,
            });
        }
        if tile_dimension == 0 {
            return Err(UmbraError::InvalidTileDimension(tile_dimension));
        }
        if tile_dimension.checked_mul(cascade_count as u32).is_none() {
            return Err(UmbraError::AtlasTooWide {
                tile_dimension,
                cascade_count,
            });
        }

        let n = cascade_count as f32;
        let viewports = (0..cascade_count as u32)
            .map(|i| ShadowViewport {
                x: tile_dimension * i,
                y: 0,
                width: tile_dimension,
                height: tile_dimension,
            })
            .collect();
        let transforms = (0..cascade_count)
            .map(|i| CascadeTextureTransform {
                scale: Vec2::new(0.5 / n, -0.5),
                offset: Vec2::new((i as f32 + 0.5) / n, 0.5),
            })
            .collect();

        Ok(Self {
            tile_dimension,
            viewports,
            transforms,
        })
    }

    #[must_use]
    pub fn cascade_count(&self) -> usize {
        self.viewports.len()
    }

    #[must_use]
    pub fn tile_dimension(&self) -> u32 {
        self.tile_dimension
    }

    /// Full atlas size in texels.
    #[must_use]
    pub fn dimensions(&self) -> UVec2 {
        UVec2::new(self.tile_dimension * self.cascade_count() as u32, self.tile_dimension)
    }

    /// Size of one texel in atlas UV.
    #[must_use]
    pub fn texel_size(&self) -> Vec2 {
        Vec2::ONE / self.dimensions().as_vec2()
    }

    #[must_use]
    pub fn viewport(&self, index: usize) -> Option<ShadowViewport> {
        self.viewports.get(index).copied()
    }

    #[must_use]
    pub fn viewports(&self) -> &[ShadowViewport] {
        &self.viewports
    }

    #[must_use]
    pub fn texture_transforms(&self) -> &[CascadeTextureTransform] {
        &self.transforms
    }

    #[must_use]
    pub fn texture_transform(&self, index: usize) -> Option<CascadeTextureTransform> {
        self.transforms.get(index).copied()
    }

    #[must_use]
    pub fn texture_matrix(&self, index: usize) -> Option<Mat4> {
        self.texture_transform(index).map(|t| t.to_mat4())
    }
}
