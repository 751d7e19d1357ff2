//! Cascade Report
//!
//! Headless walk-through of the cascade fitter: a first-person camera strafes
//! and turns through a small grid of boxes while the sun stays fixed, and the
//! fitted cascades are logged per frame.
//!
//! ```text
//! RUST_LOG=info cargo run -p cascade_report -- [settings.json] [frames]
//! ```

use anyhow::Context;
use glam::{Affine3A, Vec3};

use umbra::scene::{BoundingBox, CameraProvider, DirectionalLight, FirstPersonCamera, SceneBounds};
use umbra::shadow::{CascadeShadowSettings, CascadedShadowMap, FrameRenderConfig};

const DEFAULT_FRAMES: u32 = 8;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => CascadeShadowSettings::from_json_file(&path)
            .with_context(|| format!("loading shadow settings from {path}"))?,
        None => CascadeShadowSettings::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse().context("frame count must be a positive integer")?,
        None => DEFAULT_FRAMES,
    };

    let mut shadows = CascadedShadowMap::new(settings)?;
    let sun = DirectionalLight::new(Vec3::new(-0.4, -1.0, 0.3), Vec3::ONE, 3.0)?;
    let scene = build_scene();
    let mut camera =
        FirstPersonCamera::new(1280.0, 720.0).with_position(Vec3::new(0.0, 2.0, -20.0));

    let config = FrameRenderConfig::default();

    for frame in 0..frames {
        camera.update(camera.right() * 0.37, 0.05, 0.0);
        shadows.update(&camera, &scene, &sun);

        log::info!(
            "frame {frame}: camera {:.2?} forward {:.2?}",
            camera.position(),
            camera.forward()
        );
        for (i, cascade) in shadows.cascades().iter().enumerate() {
            let size = cascade.light_box.size();
            log::info!(
                "  cascade {i}: depth [{:7.3}, {:7.3}]  box {:7.3} x {:7.3}  texel {:.5}  near/far [{:.2}, {:.2}]  viewport x={}",
                cascade.interval.begin,
                cascade.interval.end,
                size.x,
                size.y,
                cascade.world_units_per_texel.x,
                cascade.light_box.min.z,
                cascade.light_box.max.z,
                cascade.viewport.x,
            );
        }

        let probe = camera.forward() * 10.0;
        let depth = camera.view_matrix().transform_point3(camera.position() + probe).z;
        match shadows.select_cascade(depth, config.effective_blend_band()) {
            Some(sel) => log::debug!(
                "  depth {depth:.2} samples cascade {} (blend {:.2})",
                sel.cascade,
                sel.blend_weight
            ),
            None => log::debug!("  depth {depth:.2} is beyond the last cascade"),
        }
    }

    let uniforms = shadows.shadow_uniforms(&config);
    log::info!(
        "shadow uniforms: {} bytes, {} cascades, flags {:?}",
        uniforms.as_bytes().len(),
        uniforms.cascade_count,
        uniforms.flags()
    );
    Ok(())
}

/// A 5x5 grid of unit boxes on a ground slab.
fn build_scene() -> SceneBounds {
    let mut scene = SceneBounds::new();
    let ground = BoundingBox::new(Vec3::new(-30.0, -0.5, -30.0), Vec3::new(30.0, 0.0, 30.0));
    scene.insert(&ground, &Affine3A::IDENTITY);

    let cube = BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5));
    for x in -2..=2 {
        for z in -2..=2 {
            let height = 1.0 + ((x + z) as f32).abs();
            let world = Affine3A::from_scale_rotation_translation(
                Vec3::new(1.0, height, 1.0),
                glam::Quat::IDENTITY,
                Vec3::new(x as f32 * 6.0, height * 0.5, z as f32 * 6.0),
            );
            scene.insert(&cube, &world);
        }
    }
    scene
}
