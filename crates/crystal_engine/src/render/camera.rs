//! # 3D Camera
//!
//! Perspective camera with look-at orientation, plus the uniform block the
//! crystal shaders read it from.
//!
//! ## Design Principles
//! - **Library-agnostic**: No graphics API types in camera math
//! - **On-demand matrices**: View and projection are computed when asked for
//!
//! Uses a right-handed Y-up view space; the projection maps depth to [0, 1].

use bytemuck::{Pod, Zeroable};
use nalgebra::Point3;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Transform, Vec3};

/// Default vertical field of view in degrees
pub const DEFAULT_FOV_DEGREES: f32 = 75.0;

/// 3D perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Field of view angle in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// The camera starts out looking at the origin.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Point the camera at `target`, keeping the current up vector
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs changes larger than 0.01 to keep resize storms quiet.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if !(aspect.is_finite() && aspect > 0.0) {
            log::warn!("Ignoring invalid aspect ratio {}", aspect);
            return;
        }
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Unit vector from the camera toward its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize(1e-6)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0))
    }

    /// World-to-camera transformation
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Camera-to-clip transformation, including the Y-up to Y-down flip
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far) * Mat4::vulkan_coordinate_transform()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 8.0), DEFAULT_FOV_DEGREES, 16.0 / 9.0, 0.1, 1000.0)
    }
}

/// GPU layout of the camera uniforms (set 0, binding 0)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniformBlock {
    /// Object-to-world matrix of the crystal
    pub model: [[f32; 4]; 4],
    /// World-to-camera matrix
    pub view: [[f32; 4]; 4],
    /// Camera-to-clip matrix
    pub projection: [[f32; 4]; 4],
    /// Camera position in the crystal's object space (w = 1)
    pub camera_position: [f32; 4],
}

impl CameraUniformBlock {
    /// Pack the camera and the crystal's model transform
    ///
    /// The crystal's fragment stage works in object space, so the camera
    /// position is carried into that space here.
    pub fn new(camera: &Camera, model: &Transform) -> Self {
        let model_matrix = model.to_matrix();
        let local_camera = model_matrix
            .try_inverse()
            .map_or(camera.position, |inverse| {
                inverse.transform_point(&Point3::from(camera.position)).coords
            });

        Self {
            model: model_matrix.into(),
            view: camera.view_matrix().into(),
            projection: camera.projection_matrix().into(),
            camera_position: [local_camera.x, local_camera.y, local_camera.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_points_at_target() {
        let mut camera = Camera::default();
        camera.look_at(Vec3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);

        camera.set_position(Vec3::zeros());
        // Degenerate: falls back to -Z
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_aspect_is_ignored() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(0.0);
        camera.set_aspect_ratio(f32::NAN);
        assert_relative_eq!(camera.aspect, 16.0 / 9.0);
        camera.set_aspect_ratio(1.0);
        assert_relative_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn test_uniform_block_moves_camera_into_object_space() {
        let camera = Camera::default();
        let model = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));

        let block = CameraUniformBlock::new(&camera, &model);
        assert_eq!(std::mem::size_of::<CameraUniformBlock>(), 208);
        assert_relative_eq!(block.camera_position[1], -1.0, epsilon = 1e-6);
        assert_relative_eq!(block.camera_position[2], 8.0, epsilon = 1e-6);
        // Column-major translation
        assert_relative_eq!(block.model[3][1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_maps_view_depth_to_unit_range() {
        let camera = Camera::default();
        let projection = camera.projection_matrix();

        // View space looks down -Z
        let near = projection * nalgebra::Vector4::new(0.0, 0.0, -camera.near, 1.0);
        let far = projection * nalgebra::Vector4::new(0.0, 0.0, -camera.far, 1.0);
        assert!(near.w > 0.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }
}
