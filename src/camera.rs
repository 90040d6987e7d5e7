pub mod camera_controller;
pub mod orbit_controller;

use serde::{Deserialize, Serialize};
use ultraviolet::{projection, Mat4, Vec3};

use self::camera_controller::CameraController;

#[derive(Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub settings: CameraSettings,
    pub aspect_ratio: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Where the camera starts out
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::zero(),
            fov: 50.0,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new(settings: CameraSettings, aspect_ratio: f32) -> Self {
        Self {
            position: settings.position,
            target: settings.target,
            settings,
            aspect_ratio,
        }
    }

    /// Positions the camera
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, Camera::up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        projection::rh_yup::perspective_vk(
            self.settings.fov.to_radians(),
            self.aspect_ratio,
            self.settings.z_near,
            self.settings.z_far,
        )
    }

    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn update_camera(&mut self, controller: &impl CameraController) {
        self.position = controller.position();
        self.target = controller.target();
    }

    /// in world-space
    pub const fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use ultraviolet::Vec4;

    use super::*;

    #[test]
    fn starts_at_the_configured_position() {
        let camera = Camera::new(CameraSettings::default(), 16.0 / 9.0);

        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.settings.fov, 50.0);
    }

    #[test]
    fn looks_at_the_target() {
        let camera = Camera::new(CameraSettings::default(), 1.0);
        let target = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!((target.z + 3.0).abs() < 1e-5);
    }

    #[test]
    fn ignores_degenerate_sizes() {
        let mut camera = Camera::new(CameraSettings::default(), 1.0);
        camera.set_aspect_ratio(800, 0);
        assert_eq!(camera.aspect_ratio, 1.0);
        camera.set_aspect_ratio(800, 400);
        assert_eq!(camera.aspect_ratio, 2.0);
    }
}
