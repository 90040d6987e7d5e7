use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;
use winit::event::MouseButton;

use crate::input_map::InputMap;

use super::{camera_controller::CameraController, Camera};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub enable_zoom: bool,
    pub enable_pan: bool,
    /// Radians per pixel of mouse movement
    pub rotate_speed: f32,
    /// Scroll lines are turned into a distance factor of `0.95^(lines * zoom_speed)`
    pub zoom_speed: f32,
    /// Fraction of the orbit distance per pixel of mouse movement
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_zoom: true,
            enable_pan: true,
            rotate_speed: 0.005,
            zoom_speed: 1.0,
            pan_speed: 0.001,
            min_distance: 0.1,
            max_distance: 90.0,
        }
    }
}

/// Circles around a target point. Left drag rotates, right drag pans, the wheel zooms.
pub struct OrbitController {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub settings: OrbitSettings,
}

impl OrbitController {
    pub fn new(position: Vec3, target: Vec3, settings: OrbitSettings) -> Self {
        let offset = position - target;
        let distance = offset.mag().max(settings.min_distance);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self {
            target,
            distance,
            yaw,
            pitch: pitch.clamp(-max_pitch(), max_pitch()),
            settings,
        }
    }

    pub fn update(&mut self, input_map: &InputMap) {
        let mouse_delta = input_map.mouse_delta();

        if input_map.is_mouse_pressed(MouseButton::Left) {
            self.yaw -= mouse_delta.x * self.settings.rotate_speed;
            self.pitch = (self.pitch + mouse_delta.y * self.settings.rotate_speed)
                .clamp(-max_pitch(), max_pitch());
        } else if self.settings.enable_pan && input_map.is_mouse_pressed(MouseButton::Right) {
            let forward = -self.offset_direction();
            let right = forward.cross(Camera::up()).normalized();
            let up = right.cross(forward);
            let scale = self.settings.pan_speed * self.distance;
            self.target += (up * mouse_delta.y - right * mouse_delta.x) * scale;
        }

        let scroll = input_map.scroll_delta();
        if self.settings.enable_zoom && scroll != 0.0 {
            self.distance = (self.distance * 0.95f32.powf(scroll * self.settings.zoom_speed))
                .clamp(self.settings.min_distance, self.settings.max_distance);
        }
    }

    /// Unit vector from the target to the camera
    fn offset_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }
}

impl CameraController for OrbitController {
    fn position(&self) -> Vec3 {
        self.target + self.offset_direction() * self.distance
    }

    fn target(&self) -> Vec3 {
        self.target
    }
}

fn max_pitch() -> f32 {
    88f32.to_radians()
}
