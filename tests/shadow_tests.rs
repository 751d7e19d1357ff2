//! Cascaded Shadow Map Tests
//!
//! Tests for:
//! - Cascade partitioning (explicit splits, uniform and Practical Split Scheme)
//! - Frustum corner reconstruction from a projection matrix
//! - Light-space fitting: containment, padding, texel snapping, near/far
//! - The reference scenario (3 cascades, 3% / 6% / 15%)
//! - Degenerate inputs (vertical light, missing scene bounds, empty clip range)
//! - Cascade selection and shading-pass uniforms

use std::f32::consts::FRAC_PI_3;

use glam::{Mat4, Vec3};

use umbra::scene::{BoundingBox, CameraFrame, DirectionalLight, SceneBounds};
use umbra::shadow::*;

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Camera at the origin looking down +Z, near 0.1, far 100.
fn reference_camera() -> CameraFrame {
    CameraFrame::look_to(Vec3::ZERO, Vec3::Z, FRAC_PI_3, 1.0, 0.1, 100.0)
}

fn reference_scene() -> BoundingBox {
    BoundingBox::new(Vec3::splat(-10.0), Vec3::splat(10.0))
}

fn reference_light_direction() -> Vec3 {
    Vec3::new(-1.0, 1.0, 0.0).normalize()
}

fn reference_shadows() -> CascadedShadowMap {
    let mut shadows = CascadedShadowMap::new(CascadeShadowSettings::default()).unwrap();
    shadows.update_frame(
        &reference_camera(),
        Some(&reference_scene()),
        reference_light_direction(),
    );
    shadows
}

fn reference_fitter(scene: Option<&BoundingBox>) -> LightSpaceFitter {
    LightSpaceFitter::new(
        &reference_camera(),
        reference_light_direction(),
        DEFAULT_LIGHT_DISTANCE,
        scene,
        2048,
        1.0,
    )
}

// ============================================================================
// Partition Tests
// ============================================================================

#[test]
fn partition_first_interval_starts_at_eye() {
    let partition = CascadePartition::new(&[10.0, 40.0, 100.0], 100.0).unwrap();
    let intervals = partition.intervals(0.5, 200.0);
    assert_eq!(intervals[0].begin, 0.0);
}

#[test]
fn partition_intervals_are_contiguous() {
    let partition = CascadePartition::new(&[5.0, 12.5, 30.0, 64.0, 100.0], 100.0).unwrap();
    let intervals = partition.intervals(0.1, 500.0);

    for i in 1..intervals.len() {
        assert_eq!(
            intervals[i].begin,
            intervals[i - 1].end,
            "Gap or overlap between cascades {} and {}",
            i - 1,
            i
        );
        assert!(intervals[i].length() > 0.0);
    }
}

#[test]
fn partition_covers_full_range_when_last_split_is_max() {
    for (splits, max) in [
        (vec![100.0], 100.0),
        (vec![1.0, 2.0], 2.0),
        (vec![3.0, 6.0, 15.0, 100.0], 100.0),
        (vec![0.25, 0.5, 0.75, 1.0], 1.0),
    ] {
        let partition = CascadePartition::new(&splits, max).unwrap();
        let intervals = partition.intervals(0.1, 100.0);
        let covered: f32 = intervals.iter().map(CascadeInterval::length).sum();

        assert_eq!(intervals[0].begin, 0.0);
        assert!(
            approx(intervals.last().unwrap().end, 99.9),
            "Last cascade should end at far - near for {splits:?}"
        );
        assert!(approx(covered, 99.9), "Covered {covered} for {splits:?}");
    }
}

#[test]
fn partition_uniform_spreads_evenly() {
    let partition = CascadePartition::uniform(4).unwrap();
    assert_eq!(partition.splits(), &[25.0, 50.0, 75.0, 100.0]);
    assert_eq!(partition.fraction(1), Some(0.5));
    assert_eq!(partition.fraction(4), None);
}

#[test]
fn partition_practical_lambda_0_is_uniform() {
    let partition = CascadePartition::practical(4, 1.0, 100.0, 0.0).unwrap();
    let expected = [25.0, 50.0, 75.0, 100.0];
    for (i, split) in partition.splits().iter().enumerate() {
        assert!(
            (split - expected[i]).abs() < 1e-3,
            "splits[{i}]: expected {}, got {split}",
            expected[i]
        );
    }
}

#[test]
fn partition_practical_log_front_loads_cascades() {
    let uniform = CascadePartition::practical(4, 0.1, 100.0, 0.0).unwrap();
    let practical = CascadePartition::practical(4, 0.1, 100.0, 0.75).unwrap();

    assert_eq!(practical.splits()[3], 100.0);
    for i in 0..3 {
        assert!(
            practical.splits()[i] < uniform.splits()[i],
            "Log-weighted split {i} should come before the uniform one"
        );
    }
}

#[test]
fn partition_rejects_bad_configurations() {
    assert!(matches!(
        CascadePartition::new(&[6.0, 3.0], 100.0),
        Err(umbra::UmbraError::NonAscendingSplits { index: 1, .. })
    ));
    assert!(matches!(
        CascadePartition::new(&[3.0, 3.0], 100.0),
        Err(umbra::UmbraError::NonAscendingSplits { index: 1, .. })
    ));
    assert!(matches!(
        CascadePartition::new(&[], 100.0),
        Err(umbra::UmbraError::InvalidCascadeCount { count: 0, .. })
    ));
    assert!(matches!(
        CascadePartition::new(&[50.0, 120.0], 100.0),
        Err(umbra::UmbraError::SplitOutOfRange { index: 1, .. })
    ));
    assert!(matches!(
        CascadePartition::new(&[0.0, 10.0], 100.0),
        Err(umbra::UmbraError::SplitOutOfRange { index: 0, .. })
    ));
    assert!(matches!(
        CascadePartition::new(&[10.0], 0.0),
        Err(umbra::UmbraError::InvalidPartitionMax(_))
    ));
}

// ============================================================================
// Frustum Corner Tests
// ============================================================================

#[test]
fn frustum_slopes_symmetric_projection() {
    let proj = Mat4::perspective_lh(std::f32::consts::FRAC_PI_2, 2.0, 0.1, 100.0);
    let slopes = FrustumSlopes::from_projection(&proj);

    assert!(approx(slopes.top, 1.0), "top = {}", slopes.top);
    assert!(approx(slopes.bottom, -1.0), "bottom = {}", slopes.bottom);
    assert!(approx(slopes.right, 2.0), "right = {}", slopes.right);
    assert!(approx(slopes.left, -2.0), "left = {}", slopes.left);
}

#[test]
fn frustum_corners_lie_on_slice_planes() {
    let proj = Mat4::perspective_lh(FRAC_PI_3, 1.5, 0.1, 100.0);
    let interval = CascadeInterval {
        begin: 4.0,
        end: 9.0,
    };
    let corners = frustum_corners_view(interval, &proj);

    for c in &corners[..4] {
        assert!(approx(c.z, 4.0));
    }
    for c in &corners[4..] {
        assert!(approx(c.z, 9.0));
    }

    // Far corners project onto the NDC rectangle edges.
    for c in &corners[4..] {
        let ndc = proj.project_point3(*c);
        assert!(approx(ndc.x.abs(), 1.0), "ndc.x = {}", ndc.x);
        assert!(approx(ndc.y.abs(), 1.0), "ndc.y = {}", ndc.y);
    }
}

#[test]
fn frustum_corners_world_follow_camera() {
    let camera = CameraFrame::look_to(
        Vec3::new(5.0, 2.0, -3.0),
        Vec3::X,
        FRAC_PI_3,
        1.0,
        0.1,
        100.0,
    );
    let interval = CascadeInterval {
        begin: 0.0,
        end: 10.0,
    };
    let corners =
        frustum_corners_world(interval, &camera.projection_matrix, &camera.view_matrix);

    for c in &corners[..4] {
        assert!((*c - camera.position).length() < EPSILON);
    }
    for c in &corners[4..] {
        let along = (*c - camera.position).dot(Vec3::X);
        assert!(approx(along, 10.0), "Far corner {c:?} at depth {along}");
    }
}

// ============================================================================
// Light-Space Fitter Tests
// ============================================================================

#[test]
fn light_view_looks_along_direction() {
    let dir = reference_light_direction();
    let view = light_view_matrix(Vec3::new(1.0, 2.0, 3.0), dir, 100.0);

    let eye = Vec3::new(1.0, 2.0, 3.0) - dir * 100.0;
    assert!(view.transform_point3(eye).length() < EPSILON);

    let ahead = view.transform_vector3(dir);
    assert!((ahead - Vec3::Z).length() < EPSILON, "Got {ahead:?}");
}

#[test]
fn fit_contains_every_corner_before_and_after_padding() {
    let camera = reference_camera();
    let scene = reference_scene();
    let fitter = reference_fitter(Some(&scene));
    let partition = CascadePartition::new(&[3.0, 6.0, 15.0], 100.0).unwrap();

    for interval in partition.intervals(camera.near_clip, camera.far_clip) {
        let fit = fitter.fit(interval);
        let world = frustum_corners_world(interval, &camera.projection_matrix, &camera.view_matrix);

        for corner in world {
            let ls = fitter.light_view().transform_point3(corner);
            assert!(
                fit.tight_box.contains_xy(ls, EPSILON),
                "Corner {ls:?} outside tight box {:?}",
                fit.tight_box
            );
        }
        assert!(fit.padded_box.contains_box_xy(&fit.tight_box));
        assert!(fit.padded_box.size().x > fit.tight_box.size().x);
    }
}

#[test]
fn fit_pads_by_kernel_fraction() {
    let tight = LightSpaceBox {
        min: Vec3::new(0.0, 0.0, 0.0),
        max: Vec3::new(2048.0, 1024.0, 5.0),
    };
    let padded = tight.pad_for_pcf(2.0, 2048);

    assert!(approx(padded.min.x, -2.0));
    assert!(approx(padded.max.x, 2050.0));
    assert!(approx(padded.min.y, -1.0));
    assert!(approx(padded.max.y, 1025.0));
    assert_eq!(padded.min.z, 0.0);
    assert_eq!(padded.max.z, 5.0);
}

#[test]
fn texel_snapping_is_idempotent() {
    let boxed = LightSpaceBox {
        min: Vec3::new(-3.217, 11.003, -1.0),
        max: Vec3::new(14.9, 27.61, 1.0),
    };
    let step = boxed.world_units_per_texel(2048);

    let once = boxed.snap_to_texels(step);
    let twice = once.snap_to_texels(step);
    assert_eq!(once, twice);

    assert!(once.min.x <= boxed.min.x && once.min.y <= boxed.min.y);
}

#[test]
fn fitted_box_sits_on_texel_grid() {
    let fit = reference_fitter(Some(&reference_scene())).fit(CascadeInterval {
        begin: 0.0,
        end: 10.0,
    });
    let step = fit.world_units_per_texel;

    for (value, step) in [
        (fit.light_box.min.x, step.x),
        (fit.light_box.min.y, step.y),
        (fit.light_box.max.x, step.x),
        (fit.light_box.max.y, step.y),
    ] {
        let texels = value / step;
        assert!(
            (texels - texels.round()).abs() < 1e-3,
            "{value} is {texels} texels, not a whole number"
        );
    }

    // Texel size comes from the padded box.
    assert!((fit.padded_box.world_units_per_texel(2048) - step).length() < 1e-7);
}

#[test]
fn near_far_ordered_for_any_scene() {
    let scenes = [
        Some(reference_scene()),
        Some(BoundingBox::new(Vec3::splat(2.0), Vec3::splat(2.0))),
        Some(BoundingBox::new(Vec3::new(-500.0, 0.0, 3.0), Vec3::new(7.0, 0.0, 900.0))),
        Some(BoundingBox::EMPTY),
        Some(BoundingBox::new(Vec3::splat(f32::NAN), Vec3::ONE)),
        None,
    ];
    let interval = CascadeInterval {
        begin: 2.0,
        end: 8.0,
    };

    for scene in &scenes {
        let fit = reference_fitter(scene.as_ref()).fit(interval);
        assert!(
            fit.depth.near <= fit.depth.far,
            "near {} > far {} for {scene:?}",
            fit.depth.near,
            fit.depth.far
        );
        assert!(fit.depth.length() >= MIN_EXTENT - EPSILON);
        assert!(fit.projection.is_finite());
    }
}

#[test]
fn near_far_spans_whole_scene() {
    let fitter = reference_fitter(Some(&reference_scene()));
    let depth = fitter.scene_depth().unwrap();

    // Eye 100 units back along the light; the cube's extent along the light is ±10√2.
    let half = 10.0 * std::f32::consts::SQRT_2;
    assert!((depth.near - (100.0 - half)).abs() < 1e-3, "near = {}", depth.near);
    assert!((depth.far - (100.0 + half)).abs() < 1e-3, "far = {}", depth.far);
}

#[test]
fn missing_scene_falls_back_to_cascade_depth() {
    let fitter = reference_fitter(None);
    assert!(fitter.scene_depth().is_none());

    let fit = fitter.fit(CascadeInterval {
        begin: 0.0,
        end: 10.0,
    });
    assert!(fit.depth.near <= fit.tight_box.min.z + EPSILON);
    assert!(fit.depth.far >= fit.tight_box.max.z - EPSILON);
}

#[test]
fn empty_slice_clamps_to_min_extent() {
    let fit = reference_fitter(None).fit(CascadeInterval {
        begin: 0.0,
        end: 0.0,
    });

    assert!(fit.light_box.size().x >= MIN_EXTENT - EPSILON);
    assert!(fit.light_box.size().y >= MIN_EXTENT - EPSILON);
    assert!(fit.world_units_per_texel.x > 0.0);
    assert!(fit.world_units_per_texel.y > 0.0);
    assert!(fit.projection.is_finite());
}

// ============================================================================
// Reference Scenario Tests
// ============================================================================

#[test]
fn scenario_intervals() {
    let shadows = reference_shadows();
    let expected = [(0.0, 2.997), (2.997, 5.994), (5.994, 14.985)];

    assert_eq!(shadows.cascade_count(), 3);
    for (i, (begin, end)) in expected.iter().enumerate() {
        let cascade = shadows.cascade(i).unwrap();
        assert!(
            approx(cascade.interval.begin, *begin) && approx(cascade.interval.end, *end),
            "Cascade {i}: expected [{begin}, {end}], got {:?}",
            cascade.interval
        );
        assert_eq!(cascade.far_depth, cascade.interval.end);
    }
}

#[test]
fn scenario_boxes_grow_with_cascade_index() {
    let shadows = reference_shadows();
    let boxes: Vec<_> = shadows.cascades().iter().map(|c| c.light_box).collect();

    for i in 1..boxes.len() {
        let texel = shadows.cascade(i).unwrap().world_units_per_texel;
        let (prev, next) = (boxes[i - 1].size(), boxes[i].size());
        assert!(next.x >= prev.x - texel.x, "Cascade {i} narrower in X");
        assert!(next.y > prev.y, "Cascade {i} not taller in Y");
        assert!(next.x * next.y > prev.x * prev.y);
    }
}

#[test]
fn scenario_viewports() {
    let shadows = reference_shadows();
    assert_eq!(
        shadows.shadow_viewport_at(1).unwrap(),
        ShadowViewport {
            x: 2048,
            y: 0,
            width: 2048,
            height: 2048,
        }
    );
    assert_eq!(shadows.shadow_viewport_at(0).unwrap().x, 0);
    assert_eq!(shadows.shadow_viewport_at(2).unwrap().x, 4096);
}

#[test]
fn scenario_scene_lands_in_depth_range() {
    let shadows = reference_shadows();
    let light_view = shadows.light_view_matrix();

    for i in 0..shadows.cascade_count() {
        let view_proj = shadows.projection_matrix_at(i).unwrap() * light_view;
        for corner in reference_scene().corners() {
            let clip = view_proj.project_point3(corner);
            assert!(
                clip.z >= -EPSILON && clip.z <= 1.0 + EPSILON,
                "Cascade {i}: scene corner {corner:?} clipped (z = {})",
                clip.z
            );
        }
    }
}

#[test]
fn scenario_frustum_corners_project_into_tile() {
    let shadows = reference_shadows();
    let camera = reference_camera();

    for (i, cascade) in shadows.cascades().iter().enumerate() {
        let texture = cascade.shadow_texture_matrix(&shadows.light_view_matrix());
        let tile_min = i as f32 / 3.0;
        let tile_max = (i + 1) as f32 / 3.0;
        let slack = 2.0 / (3.0 * 2048.0);

        for corner in
            frustum_corners_world(cascade.interval, &camera.projection_matrix, &camera.view_matrix)
        {
            let uv = texture.project_point3(corner);
            assert!(
                uv.x >= tile_min - slack && uv.x <= tile_max + slack,
                "Cascade {i}: corner u = {} outside tile [{tile_min}, {tile_max}]",
                uv.x
            );
            assert!(uv.y >= -slack && uv.y <= 1.0 + slack);
        }
    }
}

#[test]
fn cascade_index_out_of_bounds() {
    let shadows = reference_shadows();
    assert!(matches!(
        shadows.projection_matrix_at(3),
        Err(umbra::UmbraError::CascadeIndexOutOfBounds { index: 3, count: 3 })
    ));
    assert!(shadows.shadow_viewport_at(42).is_err());
}

// ============================================================================
// Degenerate Input Tests
// ============================================================================

#[test]
fn vertical_light_direction_does_not_crash() {
    for dir in [Vec3::Y, Vec3::NEG_Y, Vec3::new(0.001, -1.0, 0.0)] {
        let mut shadows = CascadedShadowMap::new(CascadeShadowSettings::default()).unwrap();
        shadows.update_frame(&reference_camera(), Some(&reference_scene()), dir);

        assert!(shadows.light_view_matrix().is_finite(), "NaN light view for {dir:?}");
        for i in 0..shadows.cascade_count() {
            assert!(shadows.projection_matrix_at(i).unwrap().is_finite());
        }
    }
}

#[test]
fn update_through_providers() {
    let mut shadows = CascadedShadowMap::new(CascadeShadowSettings::default()).unwrap();
    let sun = DirectionalLight::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::ONE, 1.0).unwrap();

    let mut scene = SceneBounds::new();
    scene.insert(&reference_scene(), &glam::Affine3A::IDENTITY);

    shadows.update(&reference_camera(), &scene, &sun);
    let from_providers = shadows.cascades().to_vec();

    let direct = reference_shadows();
    assert_eq!(from_providers.as_slice(), direct.cascades());
    assert_eq!(shadows.frame_count(), 1);
}

#[test]
fn update_before_scene_has_geometry() {
    let mut shadows = CascadedShadowMap::new(CascadeShadowSettings::default()).unwrap();
    let sun = DirectionalLight::new(Vec3::new(0.3, -1.0, 0.2), Vec3::ONE, 1.0).unwrap();

    shadows.update(&reference_camera(), &SceneBounds::new(), &sun);
    for cascade in shadows.cascades() {
        assert!(cascade.light_box.min.z <= cascade.light_box.max.z);
        assert!(cascade.projection_matrix.is_finite());
    }
}

#[test]
fn empty_clip_range_does_not_crash() {
    let camera = CameraFrame::look_to(Vec3::ZERO, Vec3::Z, FRAC_PI_3, 1.0, 10.0, 10.0);
    let mut shadows = CascadedShadowMap::new(CascadeShadowSettings::default()).unwrap();
    shadows.update_frame(&camera, Some(&reference_scene()), reference_light_direction());

    for cascade in shadows.cascades() {
        assert_eq!(cascade.interval.length(), 0.0);
        assert!(cascade.projection_matrix.is_finite());
        assert!(cascade.light_box.size().x >= MIN_EXTENT - EPSILON);
    }
}

// ============================================================================
// Cascade Selection & Uniform Tests
// ============================================================================

#[test]
fn select_cascade_by_depth() {
    let shadows = reference_shadows();

    assert_eq!(shadows.select_cascade(1.0, 0.0).unwrap().cascade, 0);
    assert_eq!(shadows.select_cascade(4.0, 0.0).unwrap().cascade, 1);
    assert_eq!(shadows.select_cascade(14.0, 0.0).unwrap().cascade, 2);
    assert!(shadows.select_cascade(20.0, 0.0).is_none());
    assert!(shadows.select_cascade(f32::NAN, 0.0).is_none());
}

#[test]
fn select_cascade_blends_near_boundary() {
    let shadows = reference_shadows();

    let inside = shadows.select_cascade(1.0, 0.1).unwrap();
    assert_eq!(inside.blend_weight, 0.0);

    let near_edge = shadows.select_cascade(2.9, 0.1).unwrap();
    assert_eq!(near_edge.cascade, 0);
    assert!(near_edge.blend_weight > 0.0 && near_edge.blend_weight < 1.0);

    // The last cascade has nothing to blend into.
    let last = shadows.select_cascade(14.9, 0.1).unwrap();
    assert_eq!(last.cascade, 2);
    assert_eq!(last.blend_weight, 0.0);
}

#[test]
fn shadow_uniforms_pack_cascades() {
    let shadows = reference_shadows();
    let config = FrameRenderConfig {
        visualize_cascades: true,
        ..Default::default()
    };
    let uniforms = shadows.shadow_uniforms(&config);

    assert_eq!(std::mem::size_of::<ShadowUniforms>(), 896);
    assert_eq!(uniforms.as_bytes().len(), 896);
    assert_eq!(uniforms.cascade_count, 3);
    assert!(approx(uniforms.cascade_far_depth[1], 5.994));
    assert!(approx(uniforms.cascade_scale[0][0], 1.0 / 6.0));
    assert!(approx(uniforms.cascade_scale[0][1], -0.5));
    assert!(approx(uniforms.cascade_offset[2][0], 2.5 / 3.0));
    assert_eq!(uniforms.cascade_projections[3], [[0.0; 4]; 4]);
    assert_eq!(
        uniforms.light_view,
        shadows.light_view_matrix().to_cols_array_2d()
    );
    assert!(uniforms.flags().contains(ShadowFlags::VISUALIZE_CASCADES));
    assert!(uniforms.flags().contains(ShadowFlags::BLEND_CASCADES));
    assert!(approx(uniforms.blend_band, 0.1));
}

#[test]
fn frame_config_disables_blending() {
    let config = FrameRenderConfig {
        blend_cascades: false,
        use_normal_maps: false,
        ..Default::default()
    };
    assert_eq!(config.effective_blend_band(), 0.0);
    assert_eq!(config.flags(), ShadowFlags::empty());
}
