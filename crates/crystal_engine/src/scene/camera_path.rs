//! Scroll progress to camera target mapping
//!
//! Progress in [0, 1] is read as a spiral parameter: the radius and the height
//! grow linearly with progress while the angle sweeps `turns` full circles.
//! The mapping is a pure function of progress with no history.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::math::{constants, Vec3};

/// Spiral path settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralPathConfig {
    /// Orbit radius at progress 0
    pub base_radius: f32,
    /// Radius added between progress 0 and 1
    pub radius_span: f32,
    /// Full turns swept between progress 0 and 1
    pub turns: f32,
    /// Camera height at progress 0
    pub base_height: f32,
    /// Height added between progress 0 and 1
    pub height_span: f32,
}

impl Default for SpiralPathConfig {
    fn default() -> Self {
        Self {
            base_radius: 8.0,
            radius_span: 12.0,
            turns: 1.0,
            base_height: -2.0,
            height_span: 5.0,
        }
    }
}

impl SpiralPathConfig {
    /// Check that the path stays finite for every progress value
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("camera_path.base_radius", self.base_radius),
            ("camera_path.radius_span", self.radius_span),
            ("camera_path.turns", self.turns),
            ("camera_path.base_height", self.base_height),
            ("camera_path.height_span", self.height_span),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid { field, reason: format!("{value} must be finite") });
            }
        }
        if self.base_radius < 0.0 || self.base_radius + self.radius_span < 0.0 {
            return Err(ConfigError::Invalid {
                field: "camera_path.base_radius",
                reason: "radius must stay >= 0 along the path".to_string(),
            });
        }
        Ok(())
    }
}

/// Spiral camera path
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralPath {
    config: SpiralPathConfig,
}

impl Default for SpiralPath {
    fn default() -> Self {
        Self::new(SpiralPathConfig::default())
    }
}

impl SpiralPath {
    /// Create a path from its settings
    pub fn new(config: SpiralPathConfig) -> Self {
        Self { config }
    }

    /// Path settings
    pub fn config(&self) -> &SpiralPathConfig {
        &self.config
    }

    /// Orbit radius at `progress`
    pub fn radius_at(&self, progress: f32) -> f32 {
        self.config.base_radius + clamp_progress(progress) * self.config.radius_span
    }

    /// Orbit angle in radians at `progress`
    pub fn angle_at(&self, progress: f32) -> f32 {
        clamp_progress(progress) * constants::TAU * self.config.turns
    }

    /// Camera height at `progress`
    pub fn height_at(&self, progress: f32) -> f32 {
        self.config.base_height + clamp_progress(progress) * self.config.height_span
    }

    /// Camera target position at `progress`
    ///
    /// Progress outside [0, 1] is clamped and NaN is read as 0.
    pub fn target_at(&self, progress: f32) -> Vec3 {
        let radius = self.radius_at(progress);
        let angle = self.angle_at(progress);
        Vec3::new(angle.cos() * radius, self.height_at(progress), angle.sin() * radius)
    }

    /// Smallest and largest radius along the path
    pub fn radius_bounds(&self) -> (f32, f32) {
        let (a, b) = (self.radius_at(0.0), self.radius_at(1.0));
        (a.min(b), a.max(b))
    }

    /// Lowest and highest camera height along the path
    pub fn height_bounds(&self) -> (f32, f32) {
        let (a, b) = (self.height_at(0.0), self.height_at(1.0));
        (a.min(b), a.max(b))
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resting_position() {
        let path = SpiralPath::default();
        assert_relative_eq!(path.target_at(0.0), Vec3::new(8.0, -2.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_full_progress_closes_the_turn() {
        let path = SpiralPath::default();
        let end = path.target_at(1.0);
        // Full turn lands back on angle 0 at the outer radius
        assert_relative_eq!(end, Vec3::new(20.0, 3.0, 0.0), epsilon = 1e-4);
        assert_relative_eq!(path.angle_at(1.0) % constants::TAU, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_targets_stay_within_bounds() {
        let path = SpiralPath::default();
        let (r_min, r_max) = path.radius_bounds();
        let (h_min, h_max) = path.height_bounds();

        for i in 0..=1000 {
            let p = i as f32 / 1000.0;
            let target = path.target_at(p);
            assert!(target.iter().all(|c| c.is_finite()));

            let r = target.x.hypot(target.z);
            assert!(r >= r_min - 1e-4 && r <= r_max + 1e-4, "radius {r} at {p}");
            assert!(target.y >= h_min - 1e-5 && target.y <= h_max + 1e-5);
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let path = SpiralPath::default();
        assert_eq!(path.target_at(-4.0), path.target_at(0.0));
        assert_eq!(path.target_at(9.0), path.target_at(1.0));
        assert_eq!(path.target_at(f32::NAN), path.target_at(0.0));
    }

    #[test]
    fn test_quarter_turn() {
        let path = SpiralPath::default();
        let target = path.target_at(0.25);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target.z, 11.0, epsilon = 1e-4);
        assert_relative_eq!(target.y, -0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_validation() {
        assert!(SpiralPathConfig::default().validate().is_ok());
        let bad = SpiralPathConfig { turns: f32::INFINITY, ..Default::default() };
        assert!(bad.validate().is_err());
        let inverted = SpiralPathConfig { base_radius: 2.0, radius_span: -5.0, ..Default::default() };
        assert!(inverted.validate().is_err());
    }
}
