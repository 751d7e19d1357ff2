//! Scene-side collaborators of the shadow system:
//! - Camera: camera state providers and per-frame snapshots
//! - Light: light data and its GPU layout
//! - Bounds: world-space bounds of shadow-relevant geometry

pub mod bounds;
pub mod camera;
pub mod light;

pub use bounds::{BoundingBox, SceneBounds, SceneBoundsProvider};
pub use camera::{CameraFrame, CameraProvider, FirstPersonCamera};
pub use light::{DirectionalLight, GpuLight, Light, LightKind};
