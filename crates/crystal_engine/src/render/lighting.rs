//! Stage lighting and fog for the crystal scene
//!
//! Pure data handed to the host renderer. The crystal material itself is
//! unlit; these lights and the fog shape the floor, particles and anything else
//! the host draws around it.

use crate::foundation::math::{utils, Vec3};
use crate::render::Color;

/// Types of lights used by the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Uniform light from every direction
    Ambient,
    /// Directional light (like sunlight) with parallel rays
    Directional,
    /// Point light that radiates in all directions from a position
    Point,
}

/// One light of the stage
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// The type of light
    pub light_type: LightType,
    /// Light color
    pub color: Color,
    /// Light intensity multiplier
    pub intensity: f32,
    /// Position for point lights; for directional lights the light shines from
    /// here toward the origin
    pub position: Vec3,
    /// Whether this light should cast shadows
    pub cast_shadows: bool,
}

/// Factory functions for stage lights
pub struct LightFactory;

impl LightFactory {
    /// Ambient light
    pub fn ambient(color: Color, intensity: f32) -> Light {
        Light {
            light_type: LightType::Ambient,
            color,
            intensity,
            position: Vec3::zeros(),
            cast_shadows: false,
        }
    }

    /// Directional light shining from `position` toward the origin
    pub fn directional(position: Vec3, color: Color, intensity: f32) -> Light {
        Light {
            light_type: LightType::Directional,
            color,
            intensity,
            position,
            cast_shadows: true,
        }
    }

    /// Point light at `position`
    pub fn point(position: Vec3, color: Color, intensity: f32) -> Light {
        Light {
            light_type: LightType::Point,
            color,
            intensity,
            position,
            cast_shadows: false,
        }
    }
}

impl Light {
    /// Direction the light travels, for directional lights
    pub fn direction(&self) -> Option<Vec3> {
        match self.light_type {
            LightType::Directional => (-self.position).try_normalize(1e-6),
            _ => None,
        }
    }
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Fog color
    pub color: Color,
    /// Depth where fog starts
    pub near: f32,
    /// Depth where fog is opaque
    pub far: f32,
}

impl Fog {
    /// Fog amount at a view depth (0.0 = clear, 1.0 = fully fogged)
    pub fn factor(&self, depth: f32) -> f32 {
        utils::smoothstep(self.near, self.far, depth)
    }
}

/// Everything the host needs to light the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLighting {
    /// All lights, ambient first
    pub lights: Vec<Light>,
    /// Distance fog
    pub fog: Fog,
}

impl Default for SceneLighting {
    fn default() -> Self {
        let night = Color::from_srgb8(0x0a, 0x0a, 0x0f);
        Self {
            lights: vec![
                LightFactory::ambient(Color::WHITE, 0.2),
                LightFactory::directional(Vec3::new(10.0, 10.0, 5.0), Color::WHITE, 0.5),
                // Accent lights in the three material colors
                LightFactory::point(Vec3::new(-10.0, 0.0, -10.0), Color::from_srgb8(0x5a, 0x4e, 0xc4), 0.3),
                LightFactory::point(Vec3::new(10.0, 0.0, 10.0), Color::from_srgb8(0x4e, 0x76, 0xc4), 0.3),
                LightFactory::point(Vec3::new(0.0, 10.0, 0.0), Color::from_srgb8(0xc4, 0x76, 0x4e), 0.2),
            ],
            fog: Fog { color: night, near: 15.0, far: 40.0 },
        }
    }
}

impl SceneLighting {
    /// Lights of one type
    pub fn of_type(&self, light_type: LightType) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(move |light| light.light_type == light_type)
    }
}
