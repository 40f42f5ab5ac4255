//! Everything drawn around the crystal besides the particle ring
//!
//! The [`Stage`] bundles the lights and fog with two decorative layers: a box
//! of drifting sparkles around the crystal and a reflective floor below it.
//! Like the rest of `render`, this is data for a host renderer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::math::{constants, Transform, Vec3};
use crate::render::lighting::SceneLighting;
use crate::render::Color;

/// Sparkle layer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklesConfig {
    /// Number of sparkles
    pub count: usize,
    /// Edge length of the cube the sparkles are scattered in, centered on the origin
    pub scale: f32,
    /// Sprite size
    pub size: f32,
    /// Drift speed
    pub speed: f32,
    /// Sprite opacity
    pub opacity: f32,
    /// Sprite color
    pub color: Color,
    /// Seed for reproducible layouts; random when absent
    pub seed: Option<u64>,
}

impl Default for SparklesConfig {
    fn default() -> Self {
        Self {
            count: 100,
            scale: 10.0,
            size: 2.0,
            speed: 0.3,
            opacity: 0.6,
            color: Color::from_srgb8(0xff, 0xff, 0xff),
            seed: None,
        }
    }
}

impl SparklesConfig {
    /// Check the sparkle box and sprite values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid("stage.sparkles.scale", self.scale, "must be finite and > 0"));
        }
        if !(self.size.is_finite() && self.size >= 0.0) {
            return Err(invalid("stage.sparkles.size", self.size, "must be finite and >= 0"));
        }
        if !self.speed.is_finite() {
            return Err(invalid("stage.sparkles.speed", self.speed, "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(invalid("stage.sparkles.opacity", self.opacity, "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Amplitude of the sparkle drift along each axis
const SPARKLE_DRIFT: f32 = 0.2;

/// Scattered sparkle sprites
#[derive(Debug, Clone)]
pub struct SparkleField {
    /// Rest positions
    pub positions: Vec<[f32; 3]>,
    /// Sprite size
    pub size: f32,
    /// Drift speed
    pub speed: f32,
    /// Sprite opacity
    pub opacity: f32,
    /// Sprite color
    pub color: Color,
}

impl SparkleField {
    /// Scatter `config.count` sparkles uniformly in the cube
    pub fn generate(config: &SparklesConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let positions = (0..config.count)
            .map(|_| [(); 3].map(|()| (rng.gen::<f32>() - 0.5) * config.scale))
            .collect();

        Self {
            positions,
            size: config.size,
            speed: config.speed,
            opacity: config.opacity,
            color: config.color,
        }
    }

    /// Number of sparkles
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no sparkles
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of sparkle `index` at animation time `elapsed`
    ///
    /// Each axis wobbles by up to 0.2 around the rest position, phased by the
    /// rest x coordinate.
    pub fn position_at(&self, index: usize, elapsed: f32) -> Option<Vec3> {
        let [x, y, z] = *self.positions.get(index)?;
        let phase = elapsed * self.speed + x * 100.0;
        Some(Vec3::new(
            x + phase.cos() * SPARKLE_DRIFT,
            y + phase.sin() * SPARKLE_DRIFT,
            z + phase.cos() * SPARKLE_DRIFT,
        ))
    }

    /// On-screen sprite size in pixels at view depth `depth`
    pub fn point_size(&self, depth: f32, pixel_ratio: f32) -> f32 {
        if depth <= 0.0 {
            return 0.0;
        }
        self.size * 25.0 * pixel_ratio / depth
    }
}

/// Mirror plane below the crystal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectiveFloor {
    /// Height of the plane
    pub height: f32,
    /// Extent along x
    pub width: f32,
    /// Extent along z
    pub depth: f32,
    /// Base color of the surface
    pub color: Color,
    /// Surface metalness
    pub metalness: f32,
    /// Surface roughness
    pub roughness: f32,
    /// Share of the reflection in the final color
    pub mirror: f32,
    /// Strength of the blurred reflection mix
    pub mix_strength: f32,
    /// Blur applied to the reflection
    pub mix_blur: f32,
    /// Reflection target resolution in pixels
    pub resolution: u32,
}

impl Default for ReflectiveFloor {
    fn default() -> Self {
        Self {
            height: -4.0,
            width: 20.0,
            depth: 20.0,
            color: Color::from_srgb8(0x0f, 0x0f, 0x1a),
            metalness: 0.8,
            roughness: 0.2,
            mirror: 0.5,
            mix_strength: 0.3,
            mix_blur: 1.0,
            resolution: 512,
        }
    }
}

impl ReflectiveFloor {
    /// Placement of the plane: a unit quad in xy rotated to lie flat
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(
            Vec3::new(0.0, self.height, 0.0),
            Transform::euler_xyz(-constants::FRAC_PI_2, 0.0, 0.0),
        )
    }

    /// Surface normal, facing up
    pub fn normal(&self) -> Vec3 {
        self.transform().rotation * Vec3::z()
    }

    /// Corners in world space, counter-clockwise seen from above
    pub fn corners(&self) -> [Vec3; 4] {
        let transform = self.transform();
        let (hx, hy) = (self.width * 0.5, self.depth * 0.5);
        [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)].map(|(x, y)| transform.transform_point(Vec3::new(x, y, 0.0)))
    }

    /// Reflection of `point` across the plane
    pub fn mirror_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(point.x, 2.0 * self.height - point.y, point.z)
    }

    /// Check dimensions and surface values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.height.is_finite() {
            return Err(invalid("stage.floor.height", self.height, "must be finite"));
        }
        for (field, value) in [("stage.floor.width", self.width), ("stage.floor.depth", self.depth)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, value, "must be finite and > 0"));
            }
        }
        for (field, value) in [
            ("stage.floor.metalness", self.metalness),
            ("stage.floor.roughness", self.roughness),
            ("stage.floor.mirror", self.mirror),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, value, "must be within [0, 1]"));
            }
        }
        for (field, value) in [("stage.floor.mix_strength", self.mix_strength), ("stage.floor.mix_blur", self.mix_blur)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, value, "must be finite and >= 0"));
            }
        }
        if self.resolution == 0 {
            return Err(ConfigError::Invalid {
                field: "stage.floor.resolution",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Sparkle and floor settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Sparkle layer
    pub sparkles: SparklesConfig,
    /// Reflective floor
    pub floor: ReflectiveFloor,
}

impl StageConfig {
    /// Validate both layers
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sparkles.validate()?;
        self.floor.validate()
    }
}

/// Lights, fog, sparkles and floor
#[derive(Debug, Clone)]
pub struct Stage {
    /// Lights and fog
    pub lighting: SceneLighting,
    /// Sparkle sprites
    pub sparkles: SparkleField,
    /// Reflective floor
    pub floor: ReflectiveFloor,
}

impl Stage {
    /// Build the stage from its configuration
    pub fn new(config: &StageConfig) -> Self {
        let sparkles = SparkleField::generate(&config.sparkles);
        log::debug!("Generated {} sparkles", sparkles.len());
        Self {
            lighting: SceneLighting::default(),
            sparkles,
            floor: config.floor.clone(),
        }
    }
}

fn invalid(field: &'static str, value: f32, rule: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: format!("{value} {rule}") }
}
