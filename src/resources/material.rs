use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

// ============================================================================
// Parameter Blocks
// ============================================================================

/// Blinn-Phong lighting parameters, laid out as a 16-byte aligned constant block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BlinnPhongParams {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub emission: [f32; 4],
    pub shininess: f32,
    pub _padding: [f32; 3],
}

impl Default for BlinnPhongParams {
    fn default() -> Self {
        Self {
            ambient: Vec4::ONE.to_array(),
            diffuse: Vec4::W.to_array(),
            specular: Vec4::W.to_array(),
            emission: Vec4::W.to_array(),
            shininess: 0.0,
            _padding: [0.0; 3],
        }
    }
}

/// Microfacet BRDF parameters. `reflectance` is F0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BrdfParams {
    pub reflectance: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub _padding: [f32; 3],
}

impl Default for BrdfParams {
    fn default() -> Self {
        Self {
            reflectance: Vec3::ONE.to_array(),
            roughness: 0.5,
            metalness: 0.5,
            _padding: [0.0; 3],
        }
    }
}

const _: () = assert!(std::mem::size_of::<BlinnPhongParams>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<BrdfParams>() % 16 == 0);

// ============================================================================
// Material
// ============================================================================

/// Anything that can hand the shading pass a raw constant block.
pub trait ShaderParameterBlock {
    /// The bytes to upload, already in GPU layout.
    fn parameter_block(&self) -> &[u8];
}

impl ShaderParameterBlock for BlinnPhongParams {
    fn parameter_block(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl ShaderParameterBlock for BrdfParams {
    fn parameter_block(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Surface material, dispatched by variant rather than by downcast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    BlinnPhong(BlinnPhongParams),
    Brdf(BrdfParams),
}

impl Default for Material {
    fn default() -> Self {
        Self::BlinnPhong(BlinnPhongParams::default())
    }
}

impl Material {
    #[must_use]
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::BlinnPhong(_) => "blinn_phong",
            Self::Brdf(_) => "brdf",
        }
    }

    #[must_use]
    pub fn as_blinn_phong(&self) -> Option<&BlinnPhongParams> {
        match self {
            Self::BlinnPhong(params) => Some(params),
            Self::Brdf(_) => None,
        }
    }

    #[must_use]
    pub fn as_brdf(&self) -> Option<&BrdfParams> {
        match self {
            Self::Brdf(params) => Some(params),
            Self::BlinnPhong(_) => None,
        }
    }
}

impl ShaderParameterBlock for Material {
    fn parameter_block(&self) -> &[u8] {
        match self {
            Self::BlinnPhong(params) => params.parameter_block(),
            Self::Brdf(params) => params.parameter_block(),
        }
    }
}

impl From<BlinnPhongParams> for Material {
    fn from(params: BlinnPhongParams) -> Self {
        Self::BlinnPhong(params)
    }
}

impl From<BrdfParams> for Material {
    fn from(params: BrdfParams) -> Self {
        Self::Brdf(params)
    }
}
