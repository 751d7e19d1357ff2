use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::errors::{Result, UmbraError};

/// The single shadow-casting sun of the scene.
///
/// Only `direction` feeds the cascade fitter; the rest is carried for the
/// shading pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub ambient: Vec3,
}

impl DirectionalLight {
    /// Fails if `direction` is zero-length or not finite.
    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Result<Self> {
        Ok(Self {
            direction: validate_direction(direction)?,
            color,
            intensity,
            ambient: Vec3::splat(0.1),
        })
    }

    /// Unit vector the light travels along.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) -> Result<()> {
        self.direction = validate_direction(direction)?;
        Ok(())
    }
}

fn validate_direction(direction: Vec3) -> Result<Vec3> {
    direction
        .try_normalize()
        .ok_or_else(|| UmbraError::InvalidLightDirection(direction.to_array()))
}

// High-level abstraction: any light in the scene. Only directional lights
// receive shadow cascades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional { direction: Vec3 },
    Point { position: Vec3, range: f32 },
    Spot { position: Vec3, direction: Vec3, range: f32, spot_falloff: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    pub fn new_directional(color: Vec3, direction: Vec3, intensity: f32) -> Result<Self> {
        Ok(Self {
            color,
            intensity,
            kind: LightKind::Directional {
                direction: validate_direction(direction)?,
            },
        })
    }

    #[must_use]
    pub fn new_point(color: Vec3, position: Vec3, range: f32, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Point { position, range },
        }
    }

    pub fn new_spot(
        color: Vec3,
        position: Vec3,
        direction: Vec3,
        spot_falloff: f32,
        intensity: f32,
    ) -> Result<Self> {
        Ok(Self {
            color,
            intensity,
            kind: LightKind::Spot {
                position,
                direction: validate_direction(direction)?,
                range: 0.0,
                spot_falloff,
            },
        })
    }

    #[must_use]
    pub fn to_gpu(&self) -> GpuLight {
        GpuLight::from(self)
    }
}

impl From<&DirectionalLight> for Light {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            color: light.color,
            intensity: light.intensity,
            kind: LightKind::Directional {
                direction: light.direction,
            },
        }
    }
}

// ============================================================================
// GPU Layout
// ============================================================================

pub const LIGHT_TYPE_DIRECTIONAL: i32 = 0;
pub const LIGHT_TYPE_POINT: i32 = 1;
pub const LIGHT_TYPE_SPOT: i32 = 2;

/// One light in the shading pass' light buffer: four 16-byte rows.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub kind: i32,
    pub direction: [f32; 3],
    pub range: f32,
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub spot_falloff: f32,
    pub _padding: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<GpuLight>() == 64);

impl From<&Light> for GpuLight {
    fn from(light: &Light) -> Self {
        let mut gpu = GpuLight {
            intensity: light.intensity,
            color: light.color.to_array(),
            ..GpuLight::zeroed()
        };
        match light.kind {
            LightKind::Directional { direction } => {
                gpu.kind = LIGHT_TYPE_DIRECTIONAL;
                gpu.direction = direction.to_array();
            }
            LightKind::Point { position, range } => {
                gpu.kind = LIGHT_TYPE_POINT;
                gpu.position = position.to_array();
                gpu.range = range;
            }
            LightKind::Spot {
                position,
                direction,
                range,
                spot_falloff,
            } => {
                gpu.kind = LIGHT_TYPE_SPOT;
                gpu.position = position.to_array();
                gpu.direction = direction.to_array();
                gpu.range = range;
                gpu.spot_falloff = spot_falloff;
            }
        }
        gpu
    }
}
