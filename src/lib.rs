#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Cascaded shadow map fitting for a single directional light.
//!
//! Once per frame, [`CascadedShadowMap::update`] splits the camera's view
//! range into cascades, fits a texel-snapped orthographic projection around
//! each slice in light space, and pairs it with a fixed tile of a shared
//! shadow atlas. The crate owns no GPU resources.

pub mod errors;
pub mod resources;
pub mod scene;
pub mod shadow;

pub use errors::{Result, UmbraError};
pub use resources::{Material, ShaderParameterBlock};
pub use scene::{
    BoundingBox, CameraFrame, CameraProvider, DirectionalLight, FirstPersonCamera, Light,
    SceneBounds, SceneBoundsProvider,
};
pub use shadow::{
    CascadeResult, CascadeShadowSettings, CascadedShadowMap, FrameRenderConfig, ShadowAtlasLayout,
    ShadowUniforms, ShadowViewport,
};
