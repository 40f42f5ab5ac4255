//! Scene assembly and lifecycle
//!
//! Connects the crystal, particles, stage lighting and scroll-driven camera to
//! a host's frame loop and scroll source.
//!
//! ## Lifecycle
//!
//! ```text
//! SceneConfig ──validate──▶ CrystalScene ──mount──▶ MountedScene ──unmount──▶ (released)
//!                                                   │
//!                                                   ├─ frame subscription  → SceneContext::render_frame
//!                                                   └─ scroll subscription → SceneContext::set_scroll_progress
//! ```
//!
//! Unmounting releases both subscriptions and retires the context. It is
//! idempotent and also runs on `Drop`, so every exit path tears the scene down.

pub mod binding;
pub mod camera_path;
pub mod camera_rig;
pub mod context;
pub mod crystal;

#[cfg(test)]
mod tests;

pub use binding::{bind_render_loop, bind_scroll};
pub use camera_path::{SpiralPath, SpiralPathConfig};
pub use camera_rig::{CameraRig, CameraRigConfig};
pub use context::{FrameOutput, SceneContext};
pub use crystal::{CrystalConfig, CrystalMotion};

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::config::SceneConfig;
use crate::engine::FrameLoop;
use crate::events::Subscription;
use crate::input::ScrollSource;
use crate::render::geometry::{icosphere, Mesh, Vertex};
use crate::render::particles::ParticleField;
use crate::render::stage::Stage;
use crate::render::shader::{displace_vertex, ShaderUniforms};
use crate::render::ColorError;

/// Scene construction errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Configuration could not be loaded or failed validation
    #[error("Scene configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A color literal could not be parsed
    #[error("Scene color error: {0}")]
    Color(#[from] ColorError),
}

/// A built scene that is not yet attached to a host
pub struct CrystalScene {
    context: SceneContext,
    geometry: Mesh,
    particles: ParticleField,
    stage: Stage,
}

impl CrystalScene {
    /// Validate `config` and build the scene's meshes and state
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let geometry = icosphere(config.crystal.radius, config.crystal.detail);
        let particles = ParticleField::generate(&config.particles);
        let stage = Stage::new(&config.stage);

        let path = SpiralPath::new(config.camera_path.clone());
        let rig = CameraRig::new(config.camera_rig.clone(), path.target_at(0.0));
        let context = SceneContext::new(path, rig, ShaderUniforms::new(config.material), config.crystal.motion);

        log::info!(
            "Built crystal scene: {} triangles, {} particles, {} sparkles",
            geometry.triangle_count(),
            particles.len(),
            stage.sparkles.len()
        );

        Ok(Self {
            context,
            geometry,
            particles,
            stage,
        })
    }

    /// Attach the scene to a frame loop and a scroll source
    ///
    /// If the scroll source has already reported a position, the camera target
    /// starts there instead of at the resting position.
    pub fn mount(self, frames: &FrameLoop, scroll: &ScrollSource) -> MountedScene {
        if let Some(progress) = scroll.last_progress() {
            self.context.set_scroll_progress(progress);
        }

        let subscriptions = vec![
            bind_render_loop(&self.context, frames),
            bind_scroll(&self.context, scroll),
        ];
        log::info!("Crystal scene mounted");

        MountedScene {
            context: self.context,
            geometry: self.geometry,
            particles: self.particles,
            stage: self.stage,
            subscriptions,
        }
    }

    /// Scene state, usable before mounting
    pub fn context(&self) -> &SceneContext {
        &self.context
    }
}

/// A scene attached to a host's frame loop and scroll source
pub struct MountedScene {
    context: SceneContext,
    geometry: Mesh,
    particles: ParticleField,
    stage: Stage,
    subscriptions: Vec<Subscription>,
}

impl MountedScene {
    /// Release every registration and retire the context
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn unmount(&mut self) {
        if self.subscriptions.is_empty() && !self.context.is_live() {
            log::trace!("Crystal scene already unmounted");
            return;
        }
        for mut subscription in self.subscriptions.drain(..) {
            subscription.release();
        }
        self.context.retire();
        log::info!("Crystal scene unmounted");
    }

    /// Whether the scene is still attached
    pub fn is_mounted(&self) -> bool {
        self.context.is_live()
    }

    /// Current frame output
    pub fn snapshot(&self) -> FrameOutput {
        self.context.snapshot()
    }

    /// Scene state
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Crystal mesh before displacement
    pub fn geometry(&self) -> &Mesh {
        &self.geometry
    }

    /// Crystal mesh displaced on the CPU at the current animation time
    ///
    /// Normals and texture coordinates are left as generated.
    pub fn morphed_vertices(&self) -> Vec<Vertex> {
        let uniforms = self.context.uniforms();
        self.geometry
            .vertices
            .iter()
            .map(|vertex| {
                let position = displace_vertex(vertex.position(), vertex.normal(), &uniforms);
                Vertex { position: position.into(), ..*vertex }
            })
            .collect()
    }

    /// Particle positions and colors
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Lights, fog, sparkles and floor
    pub fn stage(&self) -> &Stage {
        &self.stage
    }
}

impl Drop for MountedScene {
    fn drop(&mut self) {
        self.unmount();
    }
}
