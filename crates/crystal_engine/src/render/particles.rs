//! Particle field surrounding the crystal
//!
//! A flat "galaxy" ring of points, colored by distance from the axis and
//! slowly rotated as a whole. Points are generated once; animation only
//! changes the field's transform.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::math::{constants, Transform, Vec3};

/// How a point's color combines with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Source over destination, weighted by opacity
    Normal,
    /// Source added onto destination, weighted by opacity
    Additive,
}

impl BlendMode {
    /// Combine one channel of `src` at `opacity` onto `dst`
    pub fn blend(self, dst: f32, src: f32, opacity: f32) -> f32 {
        match self {
            Self::Normal => dst + (src - dst) * opacity,
            Self::Additive => dst + src * opacity,
        }
    }
}

/// Point sprite material shared by every particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleMaterial {
    /// Point size in world units when attenuated, pixels otherwise
    pub size: f32,
    /// Opacity applied to every point
    pub opacity: f32,
    /// Blend equation
    pub blending: BlendMode,
    /// Shrink points with distance from the camera
    pub size_attenuation: bool,
}

impl Default for ParticleMaterial {
    fn default() -> Self {
        Self {
            size: 0.05,
            opacity: 0.6,
            blending: BlendMode::Additive,
            size_attenuation: true,
        }
    }
}

impl ParticleMaterial {
    /// On-screen point size in pixels at view depth `depth`
    ///
    /// Attenuated points scale by half the viewport height over depth. Points
    /// at or behind the camera get size zero.
    pub fn point_size(&self, depth: f32, viewport_height: f32) -> f32 {
        if !self.size_attenuation {
            return self.size;
        }
        if depth <= 0.0 {
            return 0.0;
        }
        self.size * viewport_height * 0.5 / depth
    }

    /// Check size and opacity
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "particles.material.size",
                reason: format!("{} must be finite and >= 0", self.size),
            });
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::Invalid {
                field: "particles.material.opacity",
                reason: format!("{} must be within [0, 1]", self.opacity),
            });
        }
        Ok(())
    }
}

/// Particle field settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    /// Number of points
    pub count: usize,
    /// Inner radius of the ring
    pub min_radius: f32,
    /// Radial thickness of the ring
    pub radius_span: f32,
    /// Vertical thickness, centered on y = 0
    pub height_span: f32,
    /// Seed for reproducible layouts; random when absent
    pub seed: Option<u64>,
    /// Point sprite material
    pub material: ParticleMaterial,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            count: 800,
            min_radius: 5.0,
            radius_span: 20.0,
            height_span: 10.0,
            seed: None,
            material: ParticleMaterial::default(),
        }
    }
}

impl ParticleFieldConfig {
    /// Check the ring dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("particles.min_radius", self.min_radius),
            ("particles.radius_span", self.radius_span),
            ("particles.height_span", self.height_span),
        ];
        for (field, value) in dims {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid { field, reason: format!("{value} must be finite and >= 0") });
            }
        }
        if self.min_radius + self.radius_span <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "particles.radius_span",
                reason: "outer radius must be > 0".to_string(),
            });
        }
        self.material.validate()
    }

    /// Outer radius of the ring
    pub fn max_radius(&self) -> f32 {
        self.min_radius + self.radius_span
    }
}

/// Generated particle positions and colors
#[derive(Debug, Clone)]
pub struct ParticleField {
    /// Point positions, object space
    pub positions: Vec<[f32; 3]>,
    /// Per-point colors (linear RGB)
    pub colors: Vec<[f32; 3]>,
    /// Material shared by every point
    pub material: ParticleMaterial,
}

impl ParticleField {
    /// Scatter `config.count` points on the ring
    pub fn generate(config: &ParticleFieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let max_radius = config.max_radius();
        let mut positions = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let radius = config.min_radius + rng.gen::<f32>() * config.radius_span;
            let angle = rng.gen::<f32>() * constants::TAU;
            let y = (rng.gen::<f32>() - 0.5) * config.height_span;

            let x = angle.cos() * radius;
            let z = angle.sin() * radius;
            positions.push([x, y, z]);

            let d = x.hypot(z) / max_radius;
            colors.push([0.5 + d * 0.5, 0.3 + d * 0.4, 0.8 + d * 0.2]);
        }

        log::debug!("Generated particle field with {} points", positions.len());
        Self { positions, colors, material: config.material }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the field has no points
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Field transform at animation time `elapsed`
    ///
    /// Spins about y at 0.05 rad/s with a slow sinusoidal tilt about x.
    pub fn transform_at(elapsed: f32) -> Transform {
        let tilt = (elapsed * 0.1).sin() * 0.1;
        let spin = elapsed * 0.05;
        Transform::from_position_rotation(Vec3::zeros(), Transform::euler_xyz(tilt, spin, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seeded(count: usize) -> ParticleFieldConfig {
        ParticleFieldConfig { count, seed: Some(7), ..Default::default() }
    }

    #[test]
    fn test_points_stay_within_ring() {
        let config = seeded(800);
        let field = ParticleField::generate(&config);
        assert_eq!(field.len(), 800);

        for [x, y, z] in &field.positions {
            let r = x.hypot(*z);
            assert!(r >= config.min_radius - 1e-4 && r <= config.max_radius() + 1e-4);
            assert!(y.abs() <= config.height_span * 0.5);
        }
    }

    #[test]
    fn test_colors_brighten_with_distance() {
        let field = ParticleField::generate(&seeded(200));
        for (position, color) in field.positions.iter().zip(&field.colors) {
            let d = position[0].hypot(position[2]) / 25.0;
            assert!((color[0] - (0.5 + d * 0.5)).abs() < 1e-5);
            assert!(color.iter().all(|c| (0.0..=1.0 + 1e-5).contains(c)));
        }
    }

    #[test]
    fn test_seed_makes_layout_reproducible() {
        let a = ParticleField::generate(&seeded(50));
        let b = ParticleField::generate(&seeded(50));
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn test_default_material() {
        let field = ParticleField::generate(&seeded(10));
        let material = field.material;
        assert_eq!(material.size, 0.05);
        assert_eq!(material.opacity, 0.6);
        assert_eq!(material.blending, BlendMode::Additive);
        assert!(material.size_attenuation);
    }

    #[test]
    fn test_point_size_attenuates_with_depth() {
        let material = ParticleMaterial::default();
        assert_relative_eq!(material.point_size(10.0, 900.0), 2.25, epsilon = 1e-6);
        assert!(material.point_size(20.0, 900.0) < material.point_size(10.0, 900.0));
        assert_eq!(material.point_size(0.0, 900.0), 0.0);

        let fixed = ParticleMaterial { size_attenuation: false, ..material };
        assert_eq!(fixed.point_size(50.0, 900.0), 0.05);
    }

    #[test]
    fn test_additive_blending_only_brightens() {
        let material = ParticleMaterial::default();
        let dst = 0.4;
        let added = material.blending.blend(dst, 0.5, material.opacity);
        assert_relative_eq!(added, 0.7, epsilon = 1e-6);
        assert_relative_eq!(BlendMode::Normal.blend(dst, 0.5, 0.6), 0.46, epsilon = 1e-6);
    }

    #[test]
    fn test_validation() {
        assert!(ParticleFieldConfig::default().validate().is_ok());
        let mut faded = ParticleFieldConfig::default();
        faded.material.opacity = 1.5;
        assert!(faded.validate().is_err());
        let bad = ParticleFieldConfig { radius_span: f32::NAN, ..Default::default() };
        assert!(bad.validate().is_err());
        let flat = ParticleFieldConfig { min_radius: 0.0, radius_span: 0.0, ..Default::default() };
        assert!(flat.validate().is_err());
    }
}
