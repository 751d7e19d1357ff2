//! Frustum Corner Extraction
//!
//! Rebuilds the 8 corners of a camera frustum slice from the camera's
//! projection matrix alone, so the fitter works with any (possibly off-center)
//! left-handed perspective projection.

use glam::{Mat4, Vec3};

use super::partition::CascadeInterval;

/// Side-plane slopes of a perspective frustum: `x / z` and `y / z` on each
/// side plane, in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumSlopes {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl FrustumSlopes {
    /// Reads the slopes from a left-handed perspective projection (`w = z`).
    ///
    /// NDC x is `m00 * (x / z) + m20`, so the right plane (`ndc = 1`) sits at
    /// `x / z = (1 - m20) / m00`; likewise for the others.
    #[must_use]
    pub fn from_projection(projection: &Mat4) -> Self {
        let (sx, cx) = (projection.x_axis.x, projection.z_axis.x);
        let (sy, cy) = (projection.y_axis.y, projection.z_axis.y);

        Self {
            left: (-1.0 - cx) / sx,
            right: (1.0 - cx) / sx,
            bottom: (-1.0 - cy) / sy,
            top: (1.0 - cy) / sy,
        }
    }

    /// The 4 corners of the plane `z = depth`, in the order
    /// right-top, left-top, left-bottom, right-bottom.
    #[must_use]
    pub fn plane_corners(&self, depth: f32) -> [Vec3; 4] {
        [
            Vec3::new(self.right, self.top, 1.0) * depth,
            Vec3::new(self.left, self.top, 1.0) * depth,
            Vec3::new(self.left, self.bottom, 1.0) * depth,
            Vec3::new(self.right, self.bottom, 1.0) * depth,
        ]
    }
}

/// View-space corners of the frustum slice `[interval.begin, interval.end]`.
///
/// Order: right-top-near, left-top-near, left-bottom-near, right-bottom-near,
/// then the same four on the far plane.
#[must_use]
pub fn frustum_corners_view(interval: CascadeInterval, projection: &Mat4) -> [Vec3; 8] {
    let slopes = FrustumSlopes::from_projection(projection);
    let near = slopes.plane_corners(interval.begin);
    let far = slopes.plane_corners(interval.end);

    [
        near[0], near[1], near[2], near[3], far[0], far[1], far[2], far[3],
    ]
}

/// World-space corners of the frustum slice, via the inverse camera view.
#[must_use]
pub fn frustum_corners_world(
    interval: CascadeInterval,
    projection: &Mat4,
    view: &Mat4,
) -> [Vec3; 8] {
    let inv_view = view.inverse();
    frustum_corners_view(interval, projection).map(|c| inv_view.transform_point3(c))
}
