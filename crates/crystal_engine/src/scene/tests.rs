//! Integration tests for a mounted scene driven by a frame loop and a scroll source

use super::*;
use crate::foundation::math::Vec3;
use crate::input::{PointerState, ScrollMetrics};
use crate::render::shader::{shade_fragment, FragmentInput};
use approx::assert_relative_eq;

fn config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.particles.seed = Some(11);
    config.stage.sparkles.seed = Some(5);
    config
}

fn mounted() -> (FrameLoop, ScrollSource, MountedScene) {
    let frames = FrameLoop::new();
    let scroll = ScrollSource::new();
    let scene = CrystalScene::new(&config()).unwrap().mount(&frames, &scroll);
    (frames, scroll, scene)
}

#[test]
fn test_mount_registers_both_callbacks() {
    let (frames, scroll, scene) = mounted();
    assert_eq!(frames.subscriber_count(), 1);
    assert_eq!(scroll.observer_count(), 1);
    assert!(scene.is_mounted());
    assert_eq!(scene.geometry().triangle_count(), 500);
    assert_eq!(scene.particles().len(), 800);
    assert_eq!(scene.stage().sparkles.len(), 100);
}

#[test]
fn test_progress_zero_rests_at_path_start() {
    let (frames, scroll, scene) = mounted();
    scroll.emit_progress(0.0);
    frames.step(1.0 / 60.0);

    let output = scene.snapshot();
    assert_relative_eq!(output.camera_target, Vec3::new(8.0, -2.0, 0.0), epsilon = 1e-6);
    assert_relative_eq!(scene.context().smoothed_camera_position(), Vec3::new(8.0, -2.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_progress_one_reaches_outer_turn() {
    let (_frames, scroll, scene) = mounted();
    scroll.scroll_to(ScrollMetrics { offset: 3100.0, document_height: 4000.0, viewport_height: 900.0 });

    let output = scene.snapshot();
    assert_eq!(output.progress, 1.0);
    assert_relative_eq!(output.camera_target, Vec3::new(20.0, 3.0, 0.0), epsilon = 1e-4);
}

#[test]
fn test_last_write_wins_within_a_frame() {
    let (frames, scroll, scene) = mounted();
    scroll.emit_progress(0.0);
    scroll.emit_progress(1.0);
    scroll.emit_progress(0.0);
    frames.step(1.0 / 60.0);

    // Only the final update is visible: the camera never started toward progress 1
    let output = scene.snapshot();
    assert_eq!(output.progress, 0.0);
    assert_relative_eq!(output.camera_target, Vec3::new(8.0, -2.0, 0.0), epsilon = 1e-6);
    assert_relative_eq!(scene.context().smoothed_camera_position(), Vec3::new(8.0, -2.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_camera_converges_without_overshoot() {
    let (frames, scroll, scene) = mounted();
    scroll.emit_progress(0.6);
    let target = scene.snapshot().camera_target;

    let mut previous = (target - scene.context().smoothed_camera_position()).norm();
    for _ in 0..500 {
        frames.step(1.0 / 60.0);
        let distance = (target - scene.context().smoothed_camera_position()).norm();
        assert!(distance <= previous);
        previous = distance;
    }
    assert!(previous < 1e-3, "still {previous} away");

    let output = scene.snapshot();
    assert!(output.camera.position.iter().all(|c| c.is_finite()));
    assert!((output.camera.position - target).norm() < 0.02);
}

#[test]
fn test_frames_drive_time_and_pointer() {
    let (frames, _scroll, scene) = mounted();
    frames.set_pointer(PointerState::new(1.0, 1.0));
    for _ in 0..30 {
        frames.step(0.1);
    }

    let output = scene.snapshot();
    assert_relative_eq!(output.elapsed, 3.0, epsilon = 1e-4);
    assert_relative_eq!(output.uniforms.time(), output.elapsed);
    assert_relative_eq!(output.camera.target, Vec3::new(0.5, 0.5, 0.0), epsilon = 1e-6);
}

#[test]
fn test_unmount_is_idempotent() {
    let (frames, scroll, mut scene) = mounted();
    frames.step(0.5);

    scene.unmount();
    scene.unmount();

    assert!(!scene.is_mounted());
    assert_eq!(frames.subscriber_count(), 0);
    assert_eq!(scroll.observer_count(), 0);

    let frozen = scene.snapshot();
    frames.step(0.5);
    assert_eq!(scene.snapshot(), frozen);
}

#[test]
fn test_late_scroll_event_is_discarded() {
    let (frames, scroll, mut scene) = mounted();
    scroll.emit_progress(0.2);
    frames.step(1.0 / 60.0);
    scene.unmount();

    let before = scene.snapshot();
    assert_eq!(scroll.emit_progress(0.9), 0);
    assert!(!scene.context().set_scroll_progress(0.9));
    assert_eq!(scene.snapshot(), before);
}

#[test]
fn test_drop_releases_registrations() {
    let frames = FrameLoop::new();
    let scroll = ScrollSource::new();
    {
        let _scene = CrystalScene::new(&config()).unwrap().mount(&frames, &scroll);
        assert_eq!(frames.subscriber_count(), 1);
    }
    assert_eq!(frames.subscriber_count(), 0);
    assert_eq!(scroll.observer_count(), 0);
    assert_eq!(scroll.emit_progress(0.5), 0);
}

#[test]
fn test_mount_picks_up_existing_scroll_position() {
    let frames = FrameLoop::new();
    let scroll = ScrollSource::new();
    scroll.emit_progress(0.25);

    let scene = CrystalScene::new(&config()).unwrap().mount(&frames, &scroll);
    let output = scene.snapshot();
    assert_eq!(output.progress, 0.25);
    assert_relative_eq!(output.camera_target, SpiralPath::default().target_at(0.25), epsilon = 1e-6);
}

#[test]
fn test_morphed_mesh_stays_near_surface() {
    let (frames, _scroll, scene) = mounted();
    for _ in 0..90 {
        frames.step(1.0 / 60.0);
    }

    let morphed = scene.morphed_vertices();
    assert_eq!(morphed.len(), scene.geometry().vertices.len());

    let mut moved = 0;
    for (rest, displaced) in scene.geometry().vertices.iter().zip(&morphed) {
        let radius = displaced.position().norm();
        assert!((radius - 2.0).abs() < 0.25, "radius {radius}");
        assert_eq!(rest.normal, displaced.normal);
        if (displaced.position() - rest.position()).norm() > 1e-4 {
            moved += 1;
        }
    }
    assert!(moved > morphed.len() / 2);
}

#[test]
fn test_shaded_alpha_stays_in_glass_range() {
    let (frames, _scroll, scene) = mounted();
    frames.step(2.0);
    let output = scene.snapshot();
    let block = output.camera_block();
    let camera = Vec3::new(block.camera_position[0], block.camera_position[1], block.camera_position[2]);
    let glassiness = output.uniforms.params().glassiness;

    for vertex in scene.morphed_vertices().iter().step_by(7) {
        let color = shade_fragment(
            &FragmentInput {
                position: vertex.position(),
                normal: vertex.normal(),
                uv: vertex.uv(),
                camera_position: camera,
            },
            &output.uniforms,
        );
        assert!(color.a >= 0.6 * glassiness - 1e-5 && color.a <= 0.9 * glassiness + 1e-5);
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = config();
    config.camera_rig.damping = 0.0;
    assert!(matches!(CrystalScene::new(&config), Err(SceneError::Config(_))));
}

#[test]
fn test_floor_stays_below_crystal_and_camera() {
    let (frames, scroll, scene) = mounted();
    let floor = scene.stage().floor.height;

    for step in 0..=20 {
        scroll.emit_progress(step as f32 / 20.0);
        frames.step(0.25);
        let output = scene.snapshot();
        assert!(output.camera_target.y > floor);
        assert!(output.camera.position.y > floor);

        let lowest = scene
            .morphed_vertices()
            .iter()
            .map(|vertex| output.crystal.transform_point(vertex.position()).y)
            .fold(f32::INFINITY, f32::min);
        assert!(lowest > floor, "crystal reaches {lowest}");
    }
}

#[test]
fn test_invalid_stage_is_rejected() {
    let mut config = config();
    config.stage.floor.width = -1.0;
    assert!(matches!(CrystalScene::new(&config), Err(SceneError::Config(_))));
}
