//! Camera State
//!
//! The cascade fitter reads the camera through the [`CameraProvider`] trait and
//! snapshots it into a [`CameraFrame`] once per frame. [`FirstPersonCamera`] is
//! a ready-made provider with yaw/pitch mouse-look.
//!
//! All matrices are left-handed: view space looks down `+Z` with `+Y` up, and
//! projections map depth to `[0, 1]`.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Read-only camera state polled once per frame.
pub trait CameraProvider {
    /// World-space eye position.
    fn position(&self) -> Vec3;
    /// Normalized world-space view direction.
    fn forward(&self) -> Vec3;
    /// View ← world.
    fn view_matrix(&self) -> Mat4;
    /// Clip ← view.
    fn projection_matrix(&self) -> Mat4;
    fn near_clip(&self) -> f32;
    fn far_clip(&self) -> f32;
}

/// A snapshot of the camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub forward: Vec3,
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl CameraFrame {
    /// Copies the provider's current state.
    #[must_use]
    pub fn capture<C: CameraProvider + ?Sized>(camera: &C) -> Self {
        Self {
            position: camera.position(),
            forward: camera.forward(),
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(),
            near_clip: camera.near_clip(),
            far_clip: camera.far_clip(),
        }
    }

    /// A perspective camera at `position` looking along `forward`.
    ///
    /// `fov_y` is in radians.
    #[must_use]
    pub fn look_to(position: Vec3, forward: Vec3, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let forward = forward.normalize_or(Vec3::Z);
        Self {
            position,
            forward,
            view_matrix: Mat4::look_to_lh(position, forward, up_for(forward)),
            projection_matrix: Mat4::perspective_lh(fov_y, aspect, near, far),
            near_clip: near,
            far_clip: far,
        }
    }

    /// Distance covered by the cascades, `far - near`.
    #[must_use]
    pub fn depth_range(&self) -> f32 {
        self.far_clip - self.near_clip
    }
}

impl CameraProvider for CameraFrame {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    fn near_clip(&self) -> f32 {
        self.near_clip
    }

    fn far_clip(&self) -> f32 {
        self.far_clip
    }
}

/// `+Y`, unless `forward` is (nearly) vertical.
pub(crate) fn up_for(forward: Vec3) -> Vec3 {
    if forward.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y }
}

// ============================================================================
// First Person Camera
// ============================================================================

const MAX_PITCH: f32 = 80.0 * std::f32::consts::PI / 180.0;

/// Free-fly camera driven by yaw/pitch deltas and world-space translation.
///
/// Yaw rotates about world `+Y`, pitch about the camera's local `+X` and is
/// clamped to ±80° so the view never flips over the pole.
///
/// ```rust,ignore
/// let mut camera = FirstPersonCamera::new(1280.0, 720.0);
/// camera.update(camera.forward() * speed * dt, mouse_dx * 0.001, mouse_dy * 0.001);
/// ```
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    position: Vec3,
    direction: Vec3,

    yaw: f32,
    pitch: f32,

    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,

    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl FirstPersonCamera {
    pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 100.0;

    /// Camera at the origin looking down `+Z`.
    #[must_use]
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: Self::DEFAULT_FOV_Y,
            aspect: 1.0,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_view_matrix();
        camera.resize(screen_width, screen_height);
        camera
    }

    #[must_use]
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
        self
    }

    #[must_use]
    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self.update_projection_matrix();
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self.update_view_matrix();
        self
    }

    /// Accumulates rotation, then translates by `translation` (world space).
    pub fn update(&mut self, translation: Vec3, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);

        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        self.direction = rotation * Vec3::Z;
        self.position += translation;

        self.update_view_matrix();
    }

    /// Rebuilds the projection for a new viewport size.
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.aspect = screen_width / screen_height.max(1.0);
        self.update_projection_matrix();
    }

    /// Horizontal right vector, `normalize(up × forward)`.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        Vec3::Y.cross(self.direction).normalize_or(Vec3::X)
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    fn update_view_matrix(&mut self) {
        self.view_matrix = Mat4::look_to_lh(self.position, self.direction, Vec3::Y);
    }

    fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far);
    }
}

impl CameraProvider for FirstPersonCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.direction.normalize_or(Vec3::Z)
    }

    fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    fn near_clip(&self) -> f32 {
        self.near
    }

    fn far_clip(&self) -> f32 {
        self.far
    }
}
