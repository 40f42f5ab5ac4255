//! Crystal material: GLSL sources and their CPU reference
//!
//! The GLSL pair is what a GPU host compiles; [`crystal`] reproduces the same
//! math on the CPU. Both read their parameters from [`ShaderUniforms`].

pub mod crystal;
pub mod noise;
pub mod uniforms;

pub use crystal::{displace_vertex, shade_fragment, FragmentInput, Rgba};
pub use uniforms::{CrystalUniformBlock, MaterialParams, ShaderUniforms};

/// GLSL 450 vertex stage of the crystal material
pub const CRYSTAL_VERTEX_SHADER: &str = include_str!("../../../resources/shaders/crystal.vert");

/// GLSL 450 fragment stage of the crystal material
pub const CRYSTAL_FRAGMENT_SHADER: &str = include_str!("../../../resources/shaders/crystal.frag");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_declare_shared_uniform_block() {
        for source in [CRYSTAL_VERTEX_SHADER, CRYSTAL_FRAGMENT_SHADER] {
            assert!(source.starts_with("#version 450"));
            assert!(source.contains("uniform CrystalUniforms"));
            assert!(source.contains("uniform CameraUniforms"));
        }
        assert!(CRYSTAL_VERTEX_SHADER.contains("float snoise(vec3 v)"));
        assert!(CRYSTAL_FRAGMENT_SHADER.contains("mix(0.6, 0.9, fresnel)"));
    }

    #[test]
    fn test_shading_inputs_share_object_space() {
        assert!(CRYSTAL_VERTEX_SHADER.contains("vNormal = normalize(inNormal);"));
        assert!(CRYSTAL_VERTEX_SHADER.contains("vPosition = pos;"));
        assert!(!CRYSTAL_VERTEX_SHADER.contains("normalMatrix"));
        assert!(CRYSTAL_FRAGMENT_SHADER.contains("normalize(camera.cameraPosition.xyz - vPosition)"));
    }
}
