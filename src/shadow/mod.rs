//! Cascaded Shadow Maps
//!
//! Geometry-only cascade fitting for a single directional light. Nothing in
//! this module touches the GPU: it produces matrices, viewports and a uniform
//! block that the render loop hands to its shadow and shading passes.
//!
//! # Modules
//!
//! - [`settings`]: validated configuration ([`CascadeShadowSettings`])
//! - [`partition`]: depth-range splitting ([`CascadePartition`])
//! - [`frustum`]: frustum-slice corner reconstruction
//! - [`fitter`]: light view, light-space boxes, PCF padding, texel snapping
//! - [`atlas`]: per-cascade viewports and texture-space transforms
//! - [`uniforms`]: the shading pass' uniform block and render toggles
//! - [`cascades`]: the per-frame driver ([`CascadedShadowMap`])

pub mod atlas;
pub mod cascades;
pub mod fitter;
pub mod frustum;
pub mod partition;
pub mod settings;
pub mod uniforms;

pub use atlas::{CascadeTextureTransform, ShadowAtlasLayout, ShadowViewport};
pub use cascades::{CascadeResult, CascadeSelection, CascadedShadowMap};
pub use fitter::{
    CascadeFit, DEFAULT_LIGHT_DISTANCE, DepthRange, LightSpaceBox, LightSpaceFitter, MIN_EXTENT,
    light_view_matrix,
};
pub use frustum::{FrustumSlopes, frustum_corners_view, frustum_corners_world};
pub use partition::{CascadeInterval, CascadePartition, MAX_CASCADES};
pub use settings::CascadeShadowSettings;
pub use uniforms::{FrameRenderConfig, ShadowFlags, ShadowUniforms};
