//! CPU reference of the crystal material
//!
//! Mirrors `crystal.vert` and `crystal.frag` step for step. Used for software
//! morphing of the crystal mesh and to pin the shading behavior down in tests.
//! Every function here is total: any input, including degenerate normals,
//! produces a finite result.

use crate::foundation::math::{utils, Vec2, Vec3};
use super::noise::simplex3;
use super::uniforms::ShaderUniforms;

/// Spatial frequency of the large morph
pub const MORPH_FREQUENCY: f32 = 0.5;
/// Time scale of the large morph
pub const MORPH_SPEED: f32 = 0.3;
/// Displacement per unit of noise times intensity
pub const MORPH_AMPLITUDE: f32 = 0.3;
/// Spatial frequency of the facet detail pass
pub const FACET_FREQUENCY: f32 = 2.0;
/// Time scale of the facet detail pass
pub const FACET_SPEED: f32 = 0.1;
/// Displacement per unit of facet noise
pub const FACET_AMPLITUDE: f32 = 0.1;

/// Opacity at normal incidence, before glassiness
pub const ALPHA_FACING: f32 = 0.6;
/// Opacity at grazing angles, before glassiness
pub const ALPHA_GRAZING: f32 = 0.9;
/// Rim light contribution per unit of squared rim term
pub const RIM_STRENGTH: f32 = 0.5;

/// Interpolated inputs of the fragment stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput {
    /// Displaced surface position forwarded by the vertex stage
    pub position: Vec3,
    /// Surface normal (need not be normalized)
    pub normal: Vec3,
    /// Texture coordinate
    pub uv: Vec2,
    /// Camera position in the same space as `position`
    pub camera_position: Vec3,
}

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red, may exceed 1.0 before tone mapping
    pub r: f32,
    /// Green, may exceed 1.0 before tone mapping
    pub g: f32,
    /// Blue, may exceed 1.0 before tone mapping
    pub b: f32,
    /// Opacity
    pub a: f32,
}

/// Displace a vertex along its normal by the two noise passes
pub fn displace_vertex(position: Vec3, normal: Vec3, uniforms: &ShaderUniforms) -> Vec3 {
    let time = uniforms.time();
    let intensity = uniforms.params().intensity;

    let morph = simplex3(position * MORPH_FREQUENCY + Vec3::repeat(time * MORPH_SPEED)) * intensity;
    let morphed = position + normal * morph * MORPH_AMPLITUDE;

    let facet = simplex3(morphed * FACET_FREQUENCY + Vec3::repeat(time * FACET_SPEED)) * FACET_AMPLITUDE;
    morphed + normal * facet
}

/// Cosine between view direction and normal, clamped to [0, 1]
///
/// Back-facing and degenerate configurations count as grazing (0.0).
pub fn facing_ratio(view_direction: Vec3, normal: Vec3) -> f32 {
    match (view_direction.try_normalize(1e-12), normal.try_normalize(1e-12)) {
        (Some(view), Some(normal)) => utils::finite_or(view.dot(&normal), 0.0).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Fresnel term for a facing ratio, always within [0, 1]
pub fn fresnel(facing: f32, power: f32) -> f32 {
    (1.0 - facing.clamp(0.0, 1.0)).powf(power)
}

/// Opacity for a fresnel value: `mix(0.6, 0.9, fresnel) * glassiness`
pub fn glass_alpha(fresnel: f32, glassiness: f32) -> f32 {
    utils::lerp(ALPHA_FACING, ALPHA_GRAZING, fresnel.clamp(0.0, 1.0)) * glassiness
}

/// Shade one fragment of the crystal
pub fn shade_fragment(input: &FragmentInput, uniforms: &ShaderUniforms) -> Rgba {
    let params = uniforms.params();
    let time = uniforms.time();

    let facing = facing_ratio(input.camera_position - input.position, input.normal);
    let fresnel = fresnel(facing, params.fresnel_power);

    // Vertical gradient, then fresnel toward the edge color
    let base = params.color1.to_vec3().lerp(&params.color2.to_vec3(), input.uv.y);
    let mut color = base.lerp(&params.color3.to_vec3(), fresnel);

    // Holographic banding
    let holo = (input.position.y * 10.0 + time * 2.0).sin() * 0.1 + 0.9;
    color *= holo;

    // Chromatic aberration
    let c = params.chromatic;
    let mut rgb = Vec3::new(
        color.x + (time + input.uv.x * 10.0).sin() * c,
        color.y + (time + input.uv.y * 10.0 + 2.0).sin() * c,
        color.z + (time + (input.uv.x + input.uv.y) * 5.0 + 4.0).sin() * c,
    );

    let rim = (1.0 - facing).powi(2);
    rgb += Vec3::repeat(rim * RIM_STRENGTH);

    let rgb = rgb.map(|channel| utils::finite_or(channel, 0.0));
    Rgba {
        r: rgb.x,
        g: rgb.y,
        b: rgb.z,
        a: glass_alpha(fresnel, params.glassiness),
    }
}
