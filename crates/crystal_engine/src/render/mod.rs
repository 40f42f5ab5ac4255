//! Rendering data for the crystal scene
//!
//! Nothing in here talks to a graphics API. The module produces what a host
//! renderer consumes: camera and material uniform blocks, the crystal mesh,
//! the particle field, GLSL sources and the stage around the crystal.

pub mod camera;
pub mod color;
pub mod geometry;
pub mod lighting;
pub mod particles;
pub mod shader;
pub mod stage;

pub use camera::{Camera, CameraUniformBlock};
pub use color::{Color, ColorError};
pub use geometry::{icosphere, Mesh, Vertex};
pub use lighting::{Fog, Light, LightFactory, LightType, SceneLighting};
pub use particles::{BlendMode, ParticleField, ParticleFieldConfig, ParticleMaterial};
pub use stage::{ReflectiveFloor, SparkleField, SparklesConfig, Stage, StageConfig};
