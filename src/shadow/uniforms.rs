//! Shading-Pass Uniforms
//!
//! Everything the main shading pass needs to sample the cascade atlas, packed
//! into one `Pod` block, plus the per-frame debug/feature toggles that used to
//! be global flags.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

use super::partition::MAX_CASCADES;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ShadowFlags: u32 {
        const VISUALIZE_CASCADES = 1 << 0;
        const USE_NORMAL_MAPS    = 1 << 1;
        const BLEND_CASCADES     = 1 << 2;
    }
}

/// Per-frame render toggles handed to the shading pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRenderConfig {
    /// Tint each pixel by the cascade it sampled.
    pub visualize_cascades: bool,
    pub use_normal_maps: bool,
    /// Cross-fade between neighbouring cascades near their boundary.
    pub blend_cascades: bool,
    /// Fraction of each cascade (from its far end) used for the cross-fade.
    pub blend_band: f32,
}

impl Default for FrameRenderConfig {
    fn default() -> Self {
        Self {
            visualize_cascades: false,
            use_normal_maps: true,
            blend_cascades: true,
            blend_band: 0.1,
        }
    }
}

impl FrameRenderConfig {
    #[must_use]
    pub fn flags(&self) -> ShadowFlags {
        let mut flags = ShadowFlags::empty();
        flags.set(ShadowFlags::VISUALIZE_CASCADES, self.visualize_cascades);
        flags.set(ShadowFlags::USE_NORMAL_MAPS, self.use_normal_maps);
        flags.set(ShadowFlags::BLEND_CASCADES, self.blend_cascades);
        flags
    }

    /// The blend band actually applied: `0` when blending is off.
    #[must_use]
    pub fn effective_blend_band(&self) -> f32 {
        if self.blend_cascades {
            self.blend_band.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Cascade data for the shading pass.
///
/// Matrices are column-major. Unused cascade slots are zeroed. Per cascade,
/// the atlas UV is `clip.xy * cascade_scale.xy + cascade_offset.xy` with
/// `clip = cascade_projections[i] * light_view * world_position`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShadowUniforms {
    pub light_view: [[f32; 4]; 4],
    pub cascade_projections: [[[f32; 4]; 4]; MAX_CASCADES],
    pub cascade_scale: [[f32; 4]; MAX_CASCADES],
    pub cascade_offset: [[f32; 4]; MAX_CASCADES],
    /// Camera view-space depth at which each cascade ends.
    pub cascade_far_depth: [f32; MAX_CASCADES],
    pub cascade_count: u32,
    pub pcf_half_width: f32,
    pub atlas_texel_size: [f32; 2],
    pub blend_band: f32,
    pub flags: u32,
    pub _padding: [u32; 2],
}

const _: () = assert!(std::mem::size_of::<ShadowUniforms>() % 16 == 0);

impl Default for ShadowUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl ShadowUniforms {
    #[must_use]
    pub fn flags(&self) -> ShadowFlags {
        ShadowFlags::from_bits_truncate(self.flags)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
