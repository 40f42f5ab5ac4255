//! Damped camera follow with pointer look offset and shake
//!
//! The rig keeps two positions apart:
//! - the *smoothed* position, which moves toward the target by a fixed
//!   fraction each frame and never overshoots it
//! - the *presented* position handed to the renderer, which adds a small
//!   time-based shake on top of the smoothed one without feeding back into it

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::math::Vec3;
use crate::input::PointerState;
use crate::render::camera::{Camera, DEFAULT_FOV_DEGREES};

/// Camera rig settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRigConfig {
    /// Fraction of the remaining distance covered each frame, in (0, 1]
    pub damping: f32,
    /// Scale from normalized pointer position to look-at offset
    pub look_offset_scale: f32,
    /// Shake amplitude in world units
    pub shake_amplitude: f32,
    /// Shake frequency along x (rad/s)
    pub shake_frequency_x: f32,
    /// Shake frequency along y (rad/s)
    pub shake_frequency_y: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            damping: 0.05,
            look_offset_scale: 0.5,
            shake_amplitude: 0.01,
            shake_frequency_x: 0.5,
            shake_frequency_y: 0.3,
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraRigConfig {
    /// Check damping, shake and clip settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "camera_rig.damping",
                reason: format!("{} must be within (0, 1]", self.damping),
            });
        }
        for (field, value) in [
            ("camera_rig.look_offset_scale", self.look_offset_scale),
            ("camera_rig.shake_amplitude", self.shake_amplitude),
            ("camera_rig.shake_frequency_x", self.shake_frequency_x),
            ("camera_rig.shake_frequency_y", self.shake_frequency_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid { field, reason: format!("{value} must be finite") });
            }
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid {
                field: "camera_rig.fov_degrees",
                reason: format!("{} must be within (0, 180)", self.fov_degrees),
            });
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "camera_rig.far",
                reason: format!("clip range {}..{} must satisfy 0 < near < far", self.near, self.far),
            });
        }
        Ok(())
    }
}

/// Camera that eases toward a moving target
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraRigConfig,
    target: Vec3,
    smoothed: Vec3,
    camera: Camera,
}

impl CameraRig {
    /// Create a rig resting at `position` with the target on the same spot
    pub fn new(config: CameraRigConfig, position: Vec3) -> Self {
        let camera = Camera::perspective(position, config.fov_degrees, 16.0 / 9.0, config.near, config.far);
        Self {
            config,
            target: position,
            smoothed: position,
            camera,
        }
    }

    /// Rig settings
    pub fn config(&self) -> &CameraRigConfig {
        &self.config
    }

    /// Replace the target; the last call before a frame wins
    pub fn set_target(&mut self, target: Vec3) {
        if target.iter().all(|c| c.is_finite()) {
            self.target = target;
        } else {
            log::warn!("Ignoring non-finite camera target {:?}", target);
        }
    }

    /// Position the camera is easing toward
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Position before shake is applied
    pub fn smoothed_position(&self) -> Vec3 {
        self.smoothed
    }

    /// Shake offset at time `elapsed`
    pub fn shake_at(&self, elapsed: f32) -> Vec3 {
        Vec3::new(
            (elapsed * self.config.shake_frequency_x).sin() * self.config.shake_amplitude,
            (elapsed * self.config.shake_frequency_y).cos() * self.config.shake_amplitude,
            0.0,
        )
    }

    /// Point the camera looks at for a pointer position
    pub fn look_target(&self, pointer: PointerState) -> Vec3 {
        let offset = pointer.to_vec2() * self.config.look_offset_scale;
        Vec3::new(offset.x, offset.y, 0.0)
    }

    /// Advance one frame
    pub fn update(&mut self, elapsed: f32, pointer: PointerState) -> &Camera {
        self.smoothed += (self.target - self.smoothed) * self.config.damping;

        self.camera.look_at(self.look_target(pointer));
        self.camera.set_position(self.smoothed + self.shake_at(elapsed));
        &self.camera
    }

    /// Camera as presented by the last update
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Forward viewport changes to the camera
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.camera.set_aspect_ratio(aspect);
    }
}
