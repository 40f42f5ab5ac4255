//! 3D simplex noise
//!
//! CPU twin of the `snoise` function in `crystal.vert` (the mod-289
//! permutation-polynomial variant, no lookup tables). Keeping the arithmetic
//! identical means CPU-side morphing and GPU morphing agree up to float
//! rounding.

use crate::foundation::math::Vec3;

const SKEW: f32 = 1.0 / 3.0;
const UNSKEW: f32 = 1.0 / 6.0;
const GRADIENT_RING: f32 = 1.0 / 7.0;

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

fn taylor_inv_sqrt(r: f32) -> f32 {
    1.792_842_9 - 0.853_734_7 * r
}

/// GLSL `step`: 0.0 when `x < edge`, 1.0 otherwise
fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Sample 3D simplex noise at `v`
///
/// Output is continuous and lies within roughly [-1, 1].
pub fn simplex3(v: Vec3) -> f32 {
    // Skew into simplex space and find the containing cell
    let s = (v.x + v.y + v.z) * SKEW;
    let cell = [(v.x + s).floor(), (v.y + s).floor(), (v.z + s).floor()];
    let t = (cell[0] + cell[1] + cell[2]) * UNSKEW;
    let x0 = [v.x - cell[0] + t, v.y - cell[1] + t, v.z - cell[2] + t];

    // Which of the six simplices of the cell we are in
    let g = [step(x0[1], x0[0]), step(x0[2], x0[1]), step(x0[0], x0[2])];
    let l = [1.0 - g[0], 1.0 - g[1], 1.0 - g[2]];
    let i1 = [g[0].min(l[2]), g[1].min(l[0]), g[2].min(l[1])];
    let i2 = [g[0].max(l[2]), g[1].max(l[0]), g[2].max(l[1])];

    let x1 = [x0[0] - i1[0] + UNSKEW, x0[1] - i1[1] + UNSKEW, x0[2] - i1[2] + UNSKEW];
    let x2 = [x0[0] - i2[0] + SKEW, x0[1] - i2[1] + SKEW, x0[2] - i2[2] + SKEW];
    let x3 = [x0[0] - 0.5, x0[1] - 0.5, x0[2] - 0.5];
    let corners = [x0, x1, x2, x3];

    // Hash the four corners
    let cell = cell.map(mod289);
    let offsets = |axis: usize| [0.0, i1[axis], i2[axis], 1.0];
    let (oz, oy, ox) = (offsets(2), offsets(1), offsets(0));
    let mut hash = [0.0_f32; 4];
    for k in 0..4 {
        let h = permute(cell[2] + oz[k]);
        let h = permute(h + cell[1] + oy[k]);
        hash[k] = permute(h + cell[0] + ox[k]);
    }

    // Map hashes onto gradients on an octahedron
    let ns = [2.0 * GRADIENT_RING, 0.5 * GRADIENT_RING - 1.0, GRADIENT_RING];
    let mut total = 0.0;
    for k in 0..4 {
        let j = hash[k] - 49.0 * (hash[k] * ns[2] * ns[2]).floor();
        let gx_cell = (j * ns[2]).floor();
        let gy_cell = (j - 7.0 * gx_cell).floor();

        let gx = gx_cell * ns[0] + ns[1];
        let gy = gy_cell * ns[0] + ns[1];
        let h = 1.0 - gx.abs() - gy.abs();

        let sh = -step(h, 0.0);
        let gradient = [
            gx + (gx.floor() * 2.0 + 1.0) * sh,
            gy + (gy.floor() * 2.0 + 1.0) * sh,
            h,
        ];
        let norm = taylor_inv_sqrt(dot(gradient, gradient));
        let gradient = gradient.map(|c| c * norm);

        let falloff = (0.6 - dot(corners[k], corners[k])).max(0.0);
        let falloff = falloff * falloff;
        total += falloff * falloff * dot(gradient, corners[k]);
    }

    42.0 * total
}
