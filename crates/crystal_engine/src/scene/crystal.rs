//! The crystal mesh and its idle motion

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::math::{Transform, Vec3};

/// Highest icosphere subdivision accepted from configuration
pub const MAX_DETAIL: u32 = 8;

/// Slow hover applied around the crystal's own motion
///
/// With `t = (elapsed + phase) / 4 * speed` the outer frame tilts by
/// `(cos t / 8, sin t / 8, sin t / 20) * rotation_intensity` and rises by
/// `sin t / 10 * float_intensity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverMotion {
    /// Time scale of the hover
    pub speed: f32,
    /// Scale of the hover tilt
    pub rotation_intensity: f32,
    /// Scale of the hover lift
    pub float_intensity: f32,
    /// Time offset in seconds
    pub phase: f32,
}

impl Default for HoverMotion {
    fn default() -> Self {
        Self {
            speed: 2.0,
            rotation_intensity: 0.5,
            float_intensity: 0.5,
            phase: 0.0,
        }
    }
}

impl HoverMotion {
    /// No hover at all
    pub const STILL: Self = Self {
        speed: 0.0,
        rotation_intensity: 0.0,
        float_intensity: 0.0,
        phase: 0.0,
    };

    /// Outer hover frame at animation time `elapsed`
    pub fn transform_at(&self, elapsed: f32) -> Transform {
        let t = (elapsed + self.phase) / 4.0 * self.speed;
        let (sin, cos) = t.sin_cos();
        let tilt = Transform::euler_xyz(
            cos / 8.0 * self.rotation_intensity,
            sin / 8.0 * self.rotation_intensity,
            sin / 20.0 * self.rotation_intensity,
        );
        Transform::from_position_rotation(Vec3::new(0.0, sin / 10.0 * self.float_intensity, 0.0), tilt)
    }

    fn values(&self) -> [f32; 4] {
        [self.speed, self.rotation_intensity, self.float_intensity, self.phase]
    }
}

/// Idle animation of the crystal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalMotion {
    /// Rotation speed about y (rad/s)
    pub spin_speed: f32,
    /// Frequency of the tilt about x (rad/s)
    pub wobble_frequency: f32,
    /// Amplitude of the tilt about x (radians)
    pub wobble_amplitude: f32,
    /// Frequency of the vertical float (rad/s)
    pub float_frequency: f32,
    /// Amplitude of the vertical float
    pub float_amplitude: f32,
    /// Outer hover the idle motion is nested in
    pub hover: HoverMotion,
}

impl Default for CrystalMotion {
    fn default() -> Self {
        Self {
            spin_speed: 0.2,
            wobble_frequency: 0.1,
            wobble_amplitude: 0.1,
            float_frequency: 0.5,
            float_amplitude: 0.3,
            hover: HoverMotion::default(),
        }
    }
}

impl CrystalMotion {
    /// Crystal transform at animation time `elapsed`, hover included
    pub fn transform_at(&self, elapsed: f32) -> Transform {
        let hover = self.hover.transform_at(elapsed);
        let idle = self.idle_transform_at(elapsed);
        Transform::from_position_rotation(hover.transform_point(idle.position), hover.rotation * idle.rotation)
    }

    /// Spin, wobble and float without the outer hover
    pub fn idle_transform_at(&self, elapsed: f32) -> Transform {
        let wobble = (elapsed * self.wobble_frequency).sin() * self.wobble_amplitude;
        let spin = elapsed * self.spin_speed;
        let height = (elapsed * self.float_frequency).sin() * self.float_amplitude;

        Transform::from_position_rotation(Vec3::new(0.0, height, 0.0), Transform::euler_xyz(wobble, spin, 0.0))
    }
}

/// Crystal mesh settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalConfig {
    /// Icosphere radius
    pub radius: f32,
    /// Icosphere subdivision level
    pub detail: u32,
    /// Idle animation
    pub motion: CrystalMotion,
}

impl Default for CrystalConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            detail: 4,
            motion: CrystalMotion::default(),
        }
    }
}

impl CrystalConfig {
    /// Check mesh size and motion values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "crystal.radius",
                reason: format!("{} must be finite and > 0", self.radius),
            });
        }
        if self.detail > MAX_DETAIL {
            return Err(ConfigError::Invalid {
                field: "crystal.detail",
                reason: format!("{} exceeds {}", self.detail, MAX_DETAIL),
            });
        }
        let motion = &self.motion;
        let finite = [
            motion.spin_speed,
            motion.wobble_frequency,
            motion.wobble_amplitude,
            motion.float_frequency,
            motion.float_amplitude,
        ]
        .iter()
        .chain(motion.hover.values().iter())
        .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid {
                field: "crystal.motion",
                reason: "all motion values must be finite".to_string(),
            });
        }
        Ok(())
    }
}
