//! Crystal material parameters and per-frame uniform state

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::render::{Color, ColorError};

/// The seven externally tunable knobs of the crystal material
///
/// Set once when the scene is built. Only [`ShaderUniforms::time`] changes
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    /// Base color at the bottom of the mesh (uv.y = 0)
    pub color1: Color,
    /// Base color at the top of the mesh (uv.y = 1)
    pub color2: Color,
    /// Edge color blended in by the fresnel term
    pub color3: Color,
    /// Strength of the noise morph along the normals
    pub intensity: f32,
    /// Exponent applied to the fresnel term
    pub fresnel_power: f32,
    /// Overall opacity scale (0.0 to 1.0)
    pub glassiness: f32,
    /// Amplitude of the per-channel chromatic offsets
    pub chromatic: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            color1: Color::from_srgb8(0x5a, 0x4e, 0xc4),
            color2: Color::from_srgb8(0x4e, 0x76, 0xc4),
            color3: Color::from_srgb8(0xc4, 0x76, 0x4e),
            intensity: 0.2,
            fresnel_power: 2.0,
            glassiness: 0.8,
            chromatic: 0.02,
        }
    }
}

impl MaterialParams {
    /// Parameters used by the hero crystal on the home page
    pub fn hero_crystal() -> Self {
        Self {
            intensity: 0.3,
            fresnel_power: 2.5,
            glassiness: 0.9,
            chromatic: 0.03,
            ..Self::default()
        }
    }

    /// Replace the three colors with sRGB hex literals
    pub fn with_palette(self, palette: [&str; 3]) -> Result<Self, ColorError> {
        Ok(Self {
            color1: Color::from_hex(palette[0])?,
            color2: Color::from_hex(palette[1])?,
            color3: Color::from_hex(palette[2])?,
            ..self
        })
    }

    /// Check that every parameter is usable by the shading math
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.intensity.is_finite() && self.intensity >= 0.0) {
            return Err(invalid("material.intensity", self.intensity, "must be finite and >= 0"));
        }
        if !(self.fresnel_power.is_finite() && self.fresnel_power > 0.0) {
            return Err(invalid("material.fresnel_power", self.fresnel_power, "must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.glassiness) {
            return Err(invalid("material.glassiness", self.glassiness, "must be within [0, 1]"));
        }
        if !(self.chromatic.is_finite() && self.chromatic >= 0.0) {
            return Err(invalid("material.chromatic", self.chromatic, "must be finite and >= 0"));
        }
        for (field, color) in [
            ("material.color1", self.color1),
            ("material.color2", self.color2),
            ("material.color3", self.color3),
        ] {
            if ![color.r, color.g, color.b].iter().all(|c| c.is_finite()) {
                return Err(ConfigError::Invalid { field, reason: "channels must be finite".to_string() });
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: f32, rule: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: format!("{value} {rule}") }
}

/// Uniform state of one crystal material instance
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderUniforms {
    time: f32,
    params: MaterialParams,
}

impl ShaderUniforms {
    /// Create uniforms at time zero
    pub fn new(params: MaterialParams) -> Self {
        Self { time: 0.0, params }
    }

    /// Current animation time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// The write-once material parameters
    pub fn params(&self) -> &MaterialParams {
        &self.params
    }

    /// Push the frame time into the uniforms
    ///
    /// Time only moves forward; earlier or non-finite values are ignored.
    pub fn set_time(&mut self, time: f32) {
        if time.is_finite() && time >= self.time {
            self.time = time;
        } else {
            log::trace!("Ignoring non-monotonic shader time {} (current {})", time, self.time);
        }
    }

    /// Pack into the std140 block consumed by `crystal.vert` / `crystal.frag`
    pub fn to_block(&self) -> CrystalUniformBlock {
        CrystalUniformBlock {
            color1: self.params.color1.to_padded(0.0),
            color2: self.params.color2.to_padded(0.0),
            color3: self.params.color3.to_padded(0.0),
            time: self.time,
            intensity: self.params.intensity,
            fresnel_power: self.params.fresnel_power,
            glassiness: self.params.glassiness,
            chromatic: self.params.chromatic,
            _padding: [0.0; 3],
        }
    }
}

/// GPU layout of the crystal material uniforms (set 0, binding 1)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CrystalUniformBlock {
    /// `color1` (rgb + padding)
    pub color1: [f32; 4],
    /// `color2` (rgb + padding)
    pub color2: [f32; 4],
    /// `color3` (rgb + padding)
    pub color3: [f32; 4],
    /// Animation time in seconds
    pub time: f32,
    /// Morph intensity
    pub intensity: f32,
    /// Fresnel exponent
    pub fresnel_power: f32,
    /// Opacity scale
    pub glassiness: f32,
    /// Chromatic offset amplitude
    pub chromatic: f32,
    _padding: [f32; 3],
}
