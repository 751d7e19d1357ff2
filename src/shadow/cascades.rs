//! Cascaded Shadow Map
//!
//! [`CascadedShadowMap`] composes the partitioner, corner extractor,
//! light-space fitter and atlas layout for one directional light. Call
//! [`update`](CascadedShadowMap::update) once per frame before the shadow
//! pass, then read the results from both the shadow pass and the shading pass.
//!
//! ```rust,ignore
//! let mut shadows = CascadedShadowMap::new(CascadeShadowSettings::default())?;
//!
//! // Every frame:
//! shadows.update(&camera, &scene_bounds, &sun);
//! for i in 0..shadows.cascade_count() {
//!     let viewport = shadows.shadow_viewport_at(i)?;
//!     let view_proj = shadows.projection_matrix_at(i)? * shadows.light_view_matrix();
//!     // record the depth pass for cascade `i` into `viewport` ...
//! }
//! let uniforms = shadows.shadow_uniforms(&FrameRenderConfig::default());
//! ```

use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

use crate::errors::{Result, UmbraError};
use crate::scene::bounds::{BoundingBox, SceneBoundsProvider};
use crate::scene::camera::{CameraFrame, CameraProvider};
use crate::scene::light::DirectionalLight;

use super::atlas::{CascadeTextureTransform, ShadowAtlasLayout, ShadowViewport};
use super::fitter::{LightSpaceBox, LightSpaceFitter};
use super::partition::{CascadeInterval, CascadePartition};
use super::settings::CascadeShadowSettings;
use super::uniforms::{FrameRenderConfig, ShadowUniforms};

/// Everything known about one cascade for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeResult {
    pub interval: CascadeInterval,
    /// Camera view-space depth where this cascade ends.
    pub far_depth: f32,
    /// Light clip ← light view.
    pub projection_matrix: Mat4,
    pub viewport: ShadowViewport,
    pub texture_transform: CascadeTextureTransform,
    /// Final padded and snapped box; Z holds near/far.
    pub light_box: LightSpaceBox,
    pub world_units_per_texel: Vec2,
}

impl CascadeResult {
    /// Light clip ← world.
    #[must_use]
    pub fn view_projection(&self, light_view: &Mat4) -> Mat4 {
        self.projection_matrix * *light_view
    }

    /// Atlas texture space ← world, for sampling in the shading pass.
    #[must_use]
    pub fn shadow_texture_matrix(&self, light_view: &Mat4) -> Mat4 {
        self.texture_transform.to_mat4() * self.view_projection(light_view)
    }
}

/// Which cascade a shaded pixel samples, and how far to fade into the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeSelection {
    pub cascade: usize,
    /// `0` samples `cascade` only, `1` samples `cascade + 1` only.
    pub blend_weight: f32,
}

/// Cascaded shadow state for one directional light.
#[derive(Debug, Clone)]
pub struct CascadedShadowMap {
    settings: CascadeShadowSettings,
    partition: CascadePartition,
    atlas: ShadowAtlasLayout,

    light_view_matrix: Mat4,
    cascades: SmallVec<[CascadeResult; 4]>,
    frame_count: u64,
}

impl CascadedShadowMap {
    /// Validates `settings` and builds the static partition and atlas layout.
    ///
    /// Cascades hold identity projections until the first [`update`](Self::update).
    pub fn new(settings: CascadeShadowSettings) -> Result<Self> {
        settings.validate()?;
        let partition = settings.partition()?;
        let atlas = settings.atlas_layout()?;

        let cascades = atlas
            .viewports()
            .iter()
            .zip(atlas.texture_transforms())
            .map(|(viewport, transform)| CascadeResult {
                interval: CascadeInterval::default(),
                far_depth: 0.0,
                projection_matrix: Mat4::IDENTITY,
                viewport: *viewport,
                texture_transform: *transform,
                light_box: LightSpaceBox {
                    min: Vec3::ZERO,
                    max: Vec3::ZERO,
                },
                world_units_per_texel: Vec2::ZERO,
            })
            .collect();

        let size = atlas.dimensions();
        log::info!(
            "CascadedShadowMap: {} cascades, {}px tiles, atlas {}x{}",
            atlas.cascade_count(),
            atlas.tile_dimension(),
            size.x,
            size.y
        );

        Ok(Self {
            settings,
            partition,
            atlas,
            light_view_matrix: Mat4::IDENTITY,
            cascades,
            frame_count: 0,
        })
    }

    /// Recomputes the light view and every cascade projection.
    pub fn update<C, S>(&mut self, camera: &C, scene: &S, light: &DirectionalLight)
    where
        C: CameraProvider + ?Sized,
        S: SceneBoundsProvider + ?Sized,
    {
        let frame = CameraFrame::capture(camera);
        let bounds = scene.world_bounds();
        self.update_frame(&frame, bounds.as_ref(), light.direction());
    }

    /// [`update`](Self::update) with the collaborators already polled.
    pub fn update_frame(
        &mut self,
        camera: &CameraFrame,
        scene: Option<&BoundingBox>,
        light_direction: Vec3,
    ) {
        if camera.near_clip >= camera.far_clip {
            log::debug!(
                "CascadedShadowMap: degenerate clip range [{}, {}]",
                camera.near_clip,
                camera.far_clip
            );
        }

        let fitter = LightSpaceFitter::new(
            camera,
            light_direction,
            self.settings.light_distance,
            scene,
            self.atlas.tile_dimension(),
            self.settings.pcf_half_width,
        );
        self.light_view_matrix = fitter.light_view();

        let intervals = self.partition.intervals(camera.near_clip, camera.far_clip);
        for (cascade, interval) in self.cascades.iter_mut().zip(intervals) {
            let fit = fitter.fit(interval);
            cascade.interval = interval;
            cascade.far_depth = interval.end;
            cascade.projection_matrix = fit.projection;
            cascade.light_box = fit.light_box;
            cascade.world_units_per_texel = fit.world_units_per_texel;
        }

        self.frame_count += 1;
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    #[must_use]
    pub fn light_view_matrix(&self) -> Mat4 {
        self.light_view_matrix
    }

    #[must_use]
    pub fn cascade_count(&self) -> usize {
        self.cascades.len()
    }

    pub fn cascade(&self, index: usize) -> Result<&CascadeResult> {
        self.cascades
            .get(index)
            .ok_or_else(|| UmbraError::CascadeIndexOutOfBounds {
                index,
                count: self.cascades.len(),
            })
    }

    #[must_use]
    pub fn cascades(&self) -> &[CascadeResult] {
        &self.cascades
    }

    pub fn projection_matrix_at(&self, index: usize) -> Result<Mat4> {
        self.cascade(index).map(|c| c.projection_matrix)
    }

    pub fn shadow_viewport_at(&self, index: usize) -> Result<ShadowViewport> {
        self.cascade(index).map(|c| c.viewport)
    }

    #[must_use]
    pub fn atlas(&self) -> &ShadowAtlasLayout {
        &self.atlas
    }

    #[must_use]
    pub fn partition(&self) -> &CascadePartition {
        &self.partition
    }

    #[must_use]
    pub fn settings(&self) -> &CascadeShadowSettings {
        &self.settings
    }

    /// Number of completed updates.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Packs the current frame's cascades for the shading pass.
    #[must_use]
    pub fn shadow_uniforms(&self, config: &FrameRenderConfig) -> ShadowUniforms {
        let mut uniforms = ShadowUniforms {
            light_view: self.light_view_matrix.to_cols_array_2d(),
            cascade_count: self.cascades.len() as u32,
            pcf_half_width: self.settings.pcf_half_width,
            atlas_texel_size: self.atlas.texel_size().to_array(),
            blend_band: config.effective_blend_band(),
            flags: config.flags().bits(),
            ..ShadowUniforms::default()
        };

        for (i, cascade) in self.cascades.iter().enumerate() {
            let t = cascade.texture_transform;
            uniforms.cascade_projections[i] = cascade.projection_matrix.to_cols_array_2d();
            uniforms.cascade_scale[i] = [t.scale.x, t.scale.y, 0.0, 0.0];
            uniforms.cascade_offset[i] = [t.offset.x, t.offset.y, 0.0, 0.0];
            uniforms.cascade_far_depth[i] = cascade.far_depth;
        }

        uniforms
    }

    /// CPU reference of the shading pass' cascade lookup.
    ///
    /// `view_depth` is camera view-space Z. Returns the first cascade whose
    /// far depth reaches it, or `None` beyond the last cascade. Inside the last
    /// `blend_band` fraction of a cascade (not the last one) the weight ramps
    /// from `0` to `1` toward the next cascade.
    #[must_use]
    pub fn select_cascade(&self, view_depth: f32, blend_band: f32) -> Option<CascadeSelection> {
        if view_depth.is_nan() {
            return None;
        }

        let index = self
            .cascades
            .iter()
            .position(|c| view_depth <= c.far_depth)?;
        let cascade = &self.cascades[index];

        let band = blend_band.clamp(0.0, 1.0) * cascade.interval.length();
        let band_start = cascade.far_depth - band;
        let has_next = index + 1 < self.cascades.len();

        let blend_weight = if has_next && band > 0.0 && view_depth > band_start {
            ((view_depth - band_start) / band).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(CascadeSelection {
            cascade: index,
            blend_weight,
        })
    }
}
