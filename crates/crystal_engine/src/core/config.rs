//! # Scene Configuration
//!
//! Every tunable of the crystal scene in one serializable structure. Each
//! section defaults to the values the home page ships with, so a config file
//! only needs to name what it changes.
//!
//! ## Sections
//!
//! - **material**: the seven crystal shader parameters
//! - **camera_path**: spiral mapping from scroll progress to camera target
//! - **camera_rig**: damping, pointer look offset, shake and projection
//! - **crystal**: icosphere size and idle motion
//! - **particles**: the surrounding particle ring and its point material
//! - **stage**: sparkles and the reflective floor
//!
//! ```toml
//! [material]
//! color1 = "#5a4ec4"
//! intensity = 0.3
//!
//! [camera_rig]
//! damping = 0.08
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

use crate::render::particles::ParticleFieldConfig;
use crate::render::shader::MaterialParams;
use crate::render::stage::StageConfig;
use crate::scene::camera_path::SpiralPathConfig;
use crate::scene::camera_rig::CameraRigConfig;
use crate::scene::crystal::CrystalConfig;

/// Complete scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Crystal material parameters
    pub material: MaterialParams,
    /// Scroll-driven camera path
    pub camera_path: SpiralPathConfig,
    /// Camera follow behavior
    pub camera_rig: CameraRigConfig,
    /// Crystal mesh and motion
    pub crystal: CrystalConfig,
    /// Particle ring
    pub particles: ParticleFieldConfig,
    /// Sparkles and floor
    pub stage: StageConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            material: MaterialParams::hero_crystal(),
            camera_path: SpiralPathConfig::default(),
            camera_rig: CameraRigConfig::default(),
            crystal: CrystalConfig::default(),
            particles: ParticleFieldConfig::default(),
            stage: StageConfig::default(),
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Validate every section, reporting the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.material.validate()?;
        self.camera_path.validate()?;
        self.camera_rig.validate()?;
        self.crystal.validate()?;
        self.particles.validate()?;
        self.stage.validate()?;
        Ok(())
    }

    /// Load from `path` and validate
    pub fn load_validated(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        log::info!("Loaded scene configuration from {}", path);
        Ok(config)
    }
}
