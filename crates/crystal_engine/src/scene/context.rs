//! Explicit scene state shared by the render loop and the scroll binding
//!
//! One [`SceneContext`] per mounted scene replaces any process-wide clock or
//! camera target. Both the per-frame callback and the scroll observer hold a
//! weak reference to it, so neither keeps a torn-down scene alive.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::engine::FrameState;
use crate::foundation::math::{Transform, Vec3};
use crate::render::camera::{Camera, CameraUniformBlock};
use crate::render::particles::ParticleField;
use crate::render::shader::{CrystalUniformBlock, ShaderUniforms};

use super::camera_path::SpiralPath;
use super::camera_rig::CameraRig;
use super::crystal::CrystalMotion;

/// Everything a host renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// Camera as presented this frame (smoothed position plus shake)
    pub camera: Camera,
    /// Where the camera is heading
    pub camera_target: Vec3,
    /// Crystal material uniforms with the frame time applied
    pub uniforms: ShaderUniforms,
    /// Crystal model transform
    pub crystal: Transform,
    /// Particle field model transform
    pub particles: Transform,
    /// Animation time of the frame
    pub elapsed: f32,
    /// Last accepted scroll progress
    pub progress: f32,
}

impl FrameOutput {
    /// Camera uniforms for the crystal draw
    pub fn camera_block(&self) -> CameraUniformBlock {
        CameraUniformBlock::new(&self.camera, &self.crystal)
    }

    /// Material uniforms for the crystal draw
    pub fn material_block(&self) -> CrystalUniformBlock {
        self.uniforms.to_block()
    }
}

pub(super) struct SceneState {
    path: SpiralPath,
    rig: CameraRig,
    uniforms: ShaderUniforms,
    motion: CrystalMotion,
    crystal: Transform,
    particles: Transform,
    elapsed: f32,
    progress: f32,
    live: bool,
}

impl SceneState {
    fn render_frame(&mut self, frame: &FrameState) {
        if !self.live {
            return;
        }
        self.elapsed = frame.elapsed;
        self.uniforms.set_time(frame.elapsed);
        self.rig.update(frame.elapsed, frame.pointer);
        self.crystal = self.motion.transform_at(frame.elapsed);
        self.particles = ParticleField::transform_at(frame.elapsed);
    }

    fn set_scroll_progress(&mut self, progress: f32) -> bool {
        if !self.live {
            log::debug!("Discarding scroll progress {} for a retired scene", progress);
            return false;
        }
        if !progress.is_finite() {
            log::warn!("Discarding non-finite scroll progress {}", progress);
            return false;
        }
        self.progress = progress.clamp(0.0, 1.0);
        self.rig.set_target(self.path.target_at(self.progress));
        true
    }
}

/// Shared handle to the state of one scene
#[derive(Clone)]
pub struct SceneContext {
    state: Rc<RefCell<SceneState>>,
}

impl SceneContext {
    /// Create a context with the camera resting at the start of `path`
    pub fn new(path: SpiralPath, rig: CameraRig, uniforms: ShaderUniforms, motion: CrystalMotion) -> Self {
        let mut rig = rig;
        rig.set_target(path.target_at(0.0));

        Self {
            state: Rc::new(RefCell::new(SceneState {
                path,
                rig,
                uniforms,
                motion,
                crystal: motion.transform_at(0.0),
                particles: ParticleField::transform_at(0.0),
                elapsed: 0.0,
                progress: 0.0,
                live: true,
            })),
        }
    }

    pub(super) fn downgrade(&self) -> Weak<RefCell<SceneState>> {
        Rc::downgrade(&self.state)
    }

    pub(super) fn from_weak(state: &Weak<RefCell<SceneState>>) -> Option<Self> {
        state.upgrade().map(|state| Self { state })
    }

    /// Advance the scene to `frame`
    ///
    /// Pushes the frame time into the uniforms, eases the camera toward its
    /// target, aims it at the pointer and moves the crystal and particles.
    /// Does nothing once the context is retired.
    pub fn render_frame(&self, frame: &FrameState) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.render_frame(frame),
            Err(_) => log::warn!("Scene state busy, skipping frame {}", frame.frame),
        }
    }

    /// Retarget the camera for a scroll progress fraction
    ///
    /// Returns `false` when the update was discarded: the context is retired
    /// or the value is not finite. The last accepted value before a frame wins.
    pub fn set_scroll_progress(&self, progress: f32) -> bool {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.set_scroll_progress(progress),
            Err(_) => {
                log::warn!("Scene state busy, dropping scroll progress {}", progress);
                false
            }
        }
    }

    /// Current frame output
    pub fn snapshot(&self) -> FrameOutput {
        let state = self.state.borrow();
        FrameOutput {
            camera: state.rig.camera().clone(),
            camera_target: state.rig.target(),
            uniforms: state.uniforms.clone(),
            crystal: state.crystal.clone(),
            particles: state.particles.clone(),
            elapsed: state.elapsed,
            progress: state.progress,
        }
    }

    /// Position of the camera before shake
    pub fn smoothed_camera_position(&self) -> Vec3 {
        self.state.borrow().rig.smoothed_position()
    }

    /// Current material uniforms
    pub fn uniforms(&self) -> ShaderUniforms {
        self.state.borrow().uniforms.clone()
    }

    /// Forward a viewport resize to the camera
    ///
    /// Returns `false` if the state is busy and the resize was dropped.
    pub fn set_aspect_ratio(&self, aspect: f32) -> bool {
        match self.state.try_borrow_mut() {
            Ok(mut state) => {
                state.rig.set_aspect_ratio(aspect);
                true
            }
            Err(_) => {
                log::warn!("Scene state busy, dropping aspect ratio {}", aspect);
                false
            }
        }
    }

    /// Stop accepting frames and scroll updates
    pub fn retire(&self) {
        self.state.borrow_mut().live = false;
    }

    /// Whether the context still accepts updates
    pub fn is_live(&self) -> bool {
        self.state.borrow().live
    }
}

impl std::fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SceneContext")
            .field("elapsed", &state.elapsed)
            .field("progress", &state.progress)
            .field("live", &state.live)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerState;
    use crate::render::shader::MaterialParams;
    use crate::scene::camera_rig::CameraRigConfig;
    use approx::assert_relative_eq;

    fn context() -> SceneContext {
        let path = SpiralPath::default();
        let rig = CameraRig::new(CameraRigConfig::default(), path.target_at(0.0));
        SceneContext::new(path, rig, ShaderUniforms::new(MaterialParams::hero_crystal()), CrystalMotion::default())
    }

    fn frame(elapsed: f32) -> FrameState {
        FrameState { elapsed, delta: 1.0 / 60.0, frame: 1, pointer: PointerState::CENTER }
    }

    #[test]
    fn test_frame_pushes_time_and_moves_crystal() {
        let ctx = context();
        ctx.render_frame(&frame(2.0));

        let output = ctx.snapshot();
        assert_eq!(output.uniforms.time(), 2.0);
        assert_eq!(output.elapsed, 2.0);
        assert_eq!(output.crystal, CrystalMotion::default().transform_at(2.0));
        assert!(output.crystal.position.y > 0.0);
    }

    #[test]
    fn test_scroll_retargets_camera() {
        let ctx = context();
        assert!(ctx.set_scroll_progress(0.5));
        let output = ctx.snapshot();
        assert_relative_eq!(output.camera_target, SpiralPath::default().target_at(0.5), epsilon = 1e-6);
        assert_eq!(output.progress, 0.5);
    }

    #[test]
    fn test_retired_context_ignores_updates() {
        let ctx = context();
        ctx.retire();
        assert!(!ctx.is_live());

        let before = ctx.snapshot();
        assert!(!ctx.set_scroll_progress(1.0));
        ctx.render_frame(&frame(5.0));
        assert_eq!(ctx.snapshot(), before);
    }

    #[test]
    fn test_non_finite_progress_is_discarded() {
        let ctx = context();
        ctx.set_scroll_progress(0.3);
        assert!(!ctx.set_scroll_progress(f32::NAN));
        assert_eq!(ctx.snapshot().progress, 0.3);
    }

    #[test]
    fn test_camera_block_uses_crystal_transform() {
        let ctx = context();
        ctx.render_frame(&frame(1.0));
        let output = ctx.snapshot();
        let block = output.camera_block();
        assert_relative_eq!(block.model[3][1], output.crystal.position.y, epsilon = 1e-6);
        assert_eq!(output.material_block().time, 1.0);
    }

    #[test]
    fn test_aspect_ratio_reaches_camera() {
        let ctx = context();
        assert!(ctx.set_aspect_ratio(1440.0 / 900.0));
        assert_relative_eq!(ctx.snapshot().camera.aspect, 1.6);

        // Invalid ratios are ignored by the camera
        assert!(ctx.set_aspect_ratio(0.0));
        assert_relative_eq!(ctx.snapshot().camera.aspect, 1.6);
    }

    #[test]
    fn test_aspect_ratio_while_state_busy() {
        let ctx = context();
        let before = ctx.snapshot().camera.aspect;
        let guard = ctx.state.borrow();
        assert!(!ctx.set_aspect_ratio(before * 2.0));
        drop(guard);
        assert_relative_eq!(ctx.snapshot().camera.aspect, before);
    }
}
