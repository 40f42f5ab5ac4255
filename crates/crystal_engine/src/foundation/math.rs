//! Math utilities and types
//!
//! Provides the vector, matrix and transform types shared by the camera, the
//! shader reference code and the scene animation.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Build a rotation from X-then-Y-then-Z Euler angles (radians)
    ///
    /// Matches the `XYZ` order used by web scene graphs, i.e. the resulting
    /// matrix is `Rx * Ry * Rz`.
    pub fn euler_xyz(x: f32, y: f32, z: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::x_axis(), x)
            * Quat::from_axis_angle(&Vec3::y_axis(), y)
            * Quat::from_axis_angle(&Vec3::z_axis(), z)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point.component_mul(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const FRAC_PI_2: f32 = std::f32::consts::FRAC_PI_2;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Hermite smoothstep between two edges, clamped to [0, 1]
    pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
        if edge1 <= edge0 {
            return if x < edge0 { 0.0 } else { 1.0 };
        }
        let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }

    /// Replace NaN and infinities with a fallback value
    pub fn finite_or(value: f32, fallback: f32) -> f32 {
        if value.is_finite() { value } else { fallback }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix (Vulkan depth range [0, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Flip Y and Z to go from Y-up view space to Vulkan's Y-down, Z-forward clip convention
    fn vulkan_coordinate_transform() -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        // Right-handed, Y-up view space
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn vulkan_coordinate_transform() -> Mat4 {
        Mat4::new(
            1.0,  0.0,  0.0, 0.0,
            0.0, -1.0,  0.0, 0.0,
            0.0,  0.0, -1.0, 0.0,
            0.0,  0.0,  0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(utils::smoothstep(15.0, 40.0, 10.0), 0.0);
        assert_eq!(utils::smoothstep(15.0, 40.0, 50.0), 1.0);
        assert_relative_eq!(utils::smoothstep(15.0, 40.0, 27.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_moves_target_onto_negative_z() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 8.0), Vec3::zeros(), Vec3::y());
        let origin = view.transform_point(&nalgebra::Point3::origin());

        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.z, -8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_euler_xyz_matches_single_axis() {
        let q = Transform::euler_xyz(0.0, constants::PI * 0.5, 0.0);
        let rotated = q * Vec3::new(1.0, 0.0, 0.0);

        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point_matches_matrix() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Transform::euler_xyz(0.3, 0.7, 0.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let point = Vec3::new(0.5, -1.0, 0.25);

        let direct = transform.transform_point(point);
        let via_matrix = transform.to_matrix().transform_point(&nalgebra::Point3::from(point));

        assert_relative_eq!(direct, via_matrix.coords, epsilon = 1e-5);
    }
}
