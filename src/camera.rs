//! Perspective camera shared by every field.

use glam::{Mat4, Vec3};

pub const FIELD_OF_VIEW_DEG: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;
/// Distance of the eye from the origin along +Z.
pub const CAMERA_DISTANCE: f32 = 100.0;

/// Perspective camera looking down -Z at the particle volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y_deg: FIELD_OF_VIEW_DEG,
            aspect,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
        }
    }

    /// Camera whose aspect ratio matches a `width` x `height` content box.
    pub fn for_size(width: u32, height: u32) -> Self {
        Self::new(aspect_ratio(width, height))
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Width over height, with each side clamped to at least one pixel.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_camera_defaults() {
        let camera = PerspectiveCamera::for_size(1600, 900);
        assert_eq!(camera.fov_y_deg, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 100.0));
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_ratio_clamps_zero_sizes() {
        assert_eq!(aspect_ratio(0, 0), 1.0);
        assert_eq!(aspect_ratio(300, 0), 300.0);
        assert_eq!(aspect_ratio(200, 100), 2.0);
    }

    #[test]
    fn test_view_space_depth_of_origin() {
        let camera = PerspectiveCamera::new(1.0);
        let view = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((view.z + CAMERA_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = PerspectiveCamera::new(1.5);
        let clip = camera.projection_matrix() * camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
    }
}
