//! Scene Bounds
//!
//! World-space axis-aligned bounds of all shadow-relevant geometry.
//!
//! The cascade fitter only needs one box for the whole scene: its light-space
//! depth range becomes the near/far planes of every cascade. [`SceneBounds`]
//! accumulates that box from per-entity local bounds and world transforms, and
//! anything implementing [`SceneBoundsProvider`] can feed the fitter directly.

use glam::{Affine3A, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// A box is *valid* when every component is finite and `min <= max`
/// componentwise. [`BoundingBox::EMPTY`] is the identity for [`union`](Self::union)
/// and stands for "no geometry yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// An inverted box that contains nothing.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point; [`EMPTY`](Self::EMPTY) for no points.
    #[must_use]
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        points.into_iter().fold(Self::EMPTY, |bounds, p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        })
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// The 8 corners, ordered by (x, y, z) bits with z varying fastest.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounds of this box after an affine transform (e.g. an entity's world matrix).
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        if !self.is_valid() {
            return Self::EMPTY;
        }
        Self::from_points(self.corners().map(|c| matrix.transform_point3(c)))
    }

    /// Bounds of this box after a projective-free 4x4 transform (e.g. a view matrix).
    #[must_use]
    pub fn transform_mat4(&self, matrix: &Mat4) -> Self {
        if !self.is_valid() {
            return Self::EMPTY;
        }
        Self::from_points(self.corners().map(|c| matrix.transform_point3(c)))
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Supplies the world-space bounds of all shadow-relevant geometry.
///
/// Returning `None` (or an invalid box) means the scene has not produced any
/// geometry yet; the fitter then falls back to the cascade's own depth range.
pub trait SceneBoundsProvider {
    fn world_bounds(&self) -> Option<BoundingBox>;
}

impl SceneBoundsProvider for BoundingBox {
    fn world_bounds(&self) -> Option<BoundingBox> {
        self.is_valid().then_some(*self)
    }
}

impl SceneBoundsProvider for Option<BoundingBox> {
    fn world_bounds(&self) -> Option<BoundingBox> {
        self.and_then(|b| b.world_bounds())
    }
}

/// Accumulates the scene box from entity bounds.
///
/// ```rust,ignore
/// let mut scene = SceneBounds::new();
/// let cube = BoundingBox::from_points(mesh.positions().iter().copied());
/// scene.insert(&cube, &entity.world_matrix());
/// shadows.update(&camera, &scene, &sun);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SceneBounds {
    bounds: BoundingBox,
    entity_count: usize,
}

impl SceneBounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity given its local-space bounds and world transform.
    ///
    /// Invalid local bounds are ignored.
    pub fn insert(&mut self, local_bounds: &BoundingBox, world: &Affine3A) {
        if !local_bounds.is_valid() {
            log::warn!("SceneBounds: ignoring invalid local bounds {local_bounds:?}");
            return;
        }
        self.bounds = self.bounds.union(&local_bounds.transform(world));
        self.entity_count += 1;
    }

    /// Forgets all geometry; the provider reports `None` until the next insert.
    pub fn clear(&mut self) {
        self.bounds = BoundingBox::EMPTY;
        self.entity_count = 0;
    }

    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_count == 0
    }
}

impl SceneBoundsProvider for SceneBounds {
    fn world_bounds(&self) -> Option<BoundingBox> {
        self.bounds.world_bounds()
    }
}
