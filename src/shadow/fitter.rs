//! Light-Space Fitting
//!
//! Turns a cascade's frustum slice into a tight, texel-snapped orthographic
//! projection in light space.
//!
//! # Pipeline (per cascade)
//!
//! 1. Light view matrix, shared by all cascades ([`light_view_matrix`])
//! 2. Slice corners: camera view → world → light space
//! 3. Light-space AABB of the corners ([`LightSpaceBox::from_points`])
//! 4. Outward padding so PCF taps stay inside the tile ([`LightSpaceBox::pad_for_pcf`])
//! 5. Snapping to whole shadow-map texels ([`LightSpaceBox::snap_to_texels`])
//! 6. Near/far from the *scene* bounds in light space ([`DepthRange::from_scene`])
//! 7. Off-center orthographic projection
//!
//! Snapping makes the box move in whole-texel steps as the camera translates,
//! which removes sub-texel shimmer on shadow edges. It does not remove shimmer
//! caused by the box changing size under camera rotation.

use glam::{Mat4, Vec2, Vec3};

use crate::scene::bounds::BoundingBox;
use crate::scene::camera::{CameraFrame, up_for};

use super::frustum::frustum_corners_view;
use super::partition::CascadeInterval;

/// Smallest extent (world units) a light-space box or depth range may have.
pub const MIN_EXTENT: f32 = 1.0;

/// Default distance of the virtual light eye behind the camera.
pub const DEFAULT_LIGHT_DISTANCE: f32 = 100.0;

/// Light view matrix: the eye sits `distance` units behind the camera along
/// `direction`, looking along `direction`.
///
/// World `+Y` is the up reference; a (nearly) vertical light uses `+Z`
/// instead so the basis stays well defined.
#[must_use]
pub fn light_view_matrix(camera_position: Vec3, direction: Vec3, distance: f32) -> Mat4 {
    let direction = direction.normalize_or(Vec3::NEG_Y);
    let eye = camera_position - direction * distance;
    Mat4::look_to_lh(eye, direction, up_for(direction))
}

// ============================================================================
// Light-Space Box
// ============================================================================

/// Axis-aligned box in light view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpaceBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl LightSpaceBox {
    /// Bounds of `points` after transforming them by `to_light`.
    #[must_use]
    pub fn from_points(points: &[Vec3], to_light: &Mat4) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in points {
            let ls = to_light.transform_point3(*p);
            min = min.min(ls);
            max = max.max(ls);
        }
        Self { min, max }
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// XY-only containment with a small tolerance.
    #[must_use]
    pub fn contains_xy(&self, point: Vec3, tolerance: f32) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }

    /// `true` when `other`'s XY footprint lies inside this box's.
    #[must_use]
    pub fn contains_box_xy(&self, other: &LightSpaceBox) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Grows any XY axis thinner than [`MIN_EXTENT`] symmetrically about its center.
    #[must_use]
    pub fn clamp_min_extent(self) -> Self {
        let center = self.center();
        let half = (self.size().max(Vec3::splat(MIN_EXTENT)) * 0.5).truncate();
        let keep = self.size().truncate().cmpge(Vec2::splat(MIN_EXTENT));

        let min = Vec2::select(keep, self.min.truncate(), center.truncate() - half);
        let max = Vec2::select(keep, self.max.truncate(), center.truncate() + half);

        Self {
            min: min.extend(self.min.z),
            max: max.extend(self.max.z),
        }
    }

    /// Inflates XY outward by `pcf_half_width / tile_dimension` of the box's size.
    #[must_use]
    pub fn pad_for_pcf(self, pcf_half_width: f32, tile_dimension: u32) -> Self {
        let border = self.size().truncate() * (pcf_half_width / tile_dimension.max(1) as f32);
        Self {
            min: self.min - border.extend(0.0),
            max: self.max + border.extend(0.0),
        }
    }

    /// World-space size of one shadow-map texel across this box.
    #[must_use]
    pub fn world_units_per_texel(&self, tile_dimension: u32) -> Vec2 {
        self.size().truncate() / tile_dimension.max(1) as f32
    }

    /// Moves `min` and `max` (XY) down onto the texel grid.
    ///
    /// Idempotent for a fixed `units_per_texel`.
    #[must_use]
    pub fn snap_to_texels(self, units_per_texel: Vec2) -> Self {
        Self {
            min: Vec3::new(
                snap_down(self.min.x, units_per_texel.x),
                snap_down(self.min.y, units_per_texel.y),
                self.min.z,
            ),
            max: Vec3::new(
                snap_down(self.max.x, units_per_texel.x),
                snap_down(self.max.y, units_per_texel.y),
                self.max.z,
            ),
        }
    }
}

/// `floor(value / step) * step`, treating values within a few ulps of a grid
/// line as lying on it so that a snapped value snaps to itself.
fn snap_down(value: f32, step: f32) -> f32 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    let texels = value / step;
    let nearest = texels.round();
    let tolerance = 4.0 * f32::EPSILON * nearest.abs().max(1.0);
    let texels = if (texels - nearest).abs() <= tolerance {
        nearest
    } else {
        texels.floor()
    };
    texels * step
}

// ============================================================================
// Depth Range
// ============================================================================

/// Orthographic near/far planes in light view space. Always `near <= far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    /// Light-space Z extent of the scene bounds' 8 corners.
    ///
    /// `None` for an invalid (empty or non-finite) box.
    #[must_use]
    pub fn from_scene(scene: &BoundingBox, light_view: &Mat4) -> Option<Self> {
        if !scene.is_valid() {
            return None;
        }
        let ls = LightSpaceBox::from_points(&scene.corners(), light_view);
        Some(
            Self {
                near: ls.min.z,
                far: ls.max.z,
            }
            .clamp_min_extent(),
        )
    }

    /// Z extent of an already fitted box.
    #[must_use]
    pub fn from_box(light_box: &LightSpaceBox) -> Self {
        Self {
            near: light_box.min.z,
            far: light_box.max.z,
        }
        .clamp_min_extent()
    }

    #[must_use]
    pub fn clamp_min_extent(self) -> Self {
        let (near, far) = (self.near.min(self.far), self.near.max(self.far));
        if far - near >= MIN_EXTENT {
            return Self { near, far };
        }
        let center = (near + far) * 0.5;
        Self {
            near: center - MIN_EXTENT * 0.5,
            far: center + MIN_EXTENT * 0.5,
        }
    }

    #[must_use]
    pub fn length(&self) -> f32 {
        self.far - self.near
    }
}

// ============================================================================
// Fitter
// ============================================================================

/// Result of fitting one cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeFit {
    /// Corner bounds before padding and snapping (step 3).
    pub tight_box: LightSpaceBox,
    /// After the minimum-extent clamp and PCF padding, before snapping (step 4).
    pub padded_box: LightSpaceBox,
    /// Final box: padded and snapped XY, near/far as Z.
    pub light_box: LightSpaceBox,
    pub world_units_per_texel: Vec2,
    pub depth: DepthRange,
    /// Light clip ← light view.
    pub projection: Mat4,
}

/// Per-frame fitting state shared by every cascade of one light.
#[derive(Debug, Clone)]
pub struct LightSpaceFitter {
    light_view: Mat4,
    light_from_camera: Mat4,
    projection: Mat4,
    scene_depth: Option<DepthRange>,
    tile_dimension: u32,
    pcf_half_width: f32,
}

impl LightSpaceFitter {
    /// Builds the light view and the camera → light transform for this frame.
    ///
    /// `scene` is `None` (or invalid) until the scene has geometry; cascades
    /// then use their own light-space depth range.
    #[must_use]
    pub fn new(
        camera: &CameraFrame,
        light_direction: Vec3,
        light_distance: f32,
        scene: Option<&BoundingBox>,
        tile_dimension: u32,
        pcf_half_width: f32,
    ) -> Self {
        let light_view = light_view_matrix(camera.position, light_direction, light_distance);
        let light_from_camera = light_view * camera.view_matrix.inverse();
        let scene_depth = scene.and_then(|s| DepthRange::from_scene(s, &light_view));

        if light_direction.normalize_or(Vec3::NEG_Y).y.abs() > 0.99 {
            log::debug!("LightSpaceFitter: near-vertical light {light_direction:?}, using +Z as up");
        }
        if scene_depth.is_none() {
            log::debug!("LightSpaceFitter: no valid scene bounds, using per-cascade depth ranges");
        }

        Self {
            light_view,
            light_from_camera,
            projection: camera.projection_matrix,
            scene_depth,
            tile_dimension,
            pcf_half_width,
        }
    }

    #[must_use]
    pub fn light_view(&self) -> Mat4 {
        self.light_view
    }

    #[must_use]
    pub fn scene_depth(&self) -> Option<DepthRange> {
        self.scene_depth
    }

    /// Camera view-space points moved into light space.
    #[must_use]
    pub fn to_light_space(&self, view_points: &[Vec3; 8]) -> [Vec3; 8] {
        view_points.map(|p| self.light_from_camera.transform_point3(p))
    }

    /// Fits one cascade interval.
    #[must_use]
    pub fn fit(&self, interval: CascadeInterval) -> CascadeFit {
        let corners = frustum_corners_view(interval, &self.projection);
        let tight_box = LightSpaceBox::from_points(&corners, &self.light_from_camera);

        let padded = tight_box
            .clamp_min_extent()
            .pad_for_pcf(self.pcf_half_width, self.tile_dimension);
        let world_units_per_texel = padded.world_units_per_texel(self.tile_dimension);
        let snapped = padded.snap_to_texels(world_units_per_texel);

        let depth = self
            .scene_depth
            .unwrap_or_else(|| DepthRange::from_box(&tight_box));

        let light_box = LightSpaceBox {
            min: snapped.min.truncate().extend(depth.near),
            max: snapped.max.truncate().extend(depth.far),
        };

        let projection = Mat4::orthographic_lh(
            light_box.min.x,
            light_box.max.x,
            light_box.min.y,
            light_box.max.y,
            depth.near,
            depth.far,
        );

        log::trace!(
            "Cascade fit [{:.3}, {:.3}]: xy {:?}..{:?}, depth {:.3}..{:.3}",
            interval.begin,
            interval.end,
            light_box.min.truncate(),
            light_box.max.truncate(),
            depth.near,
            depth.far
        );

        CascadeFit {
            tight_box,
            padded_box: padded,
            light_box,
            world_units_per_texel,
            depth,
            projection,
        }
    }
}
