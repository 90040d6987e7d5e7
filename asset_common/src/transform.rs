use serde::{Deserialize, Serialize};
use ultraviolet::{Mat4, Rotor3, Vec3};

/// Local translation, rotation and scale of a node, composed in TRS order.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Rotor3,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_arrays(position: [f32; 3], orientation: [f32; 4], scale: [f32; 3]) -> Self {
        Self {
            position: Vec3::from(position),
            orientation: Rotor3::from_quaternion_array(orientation),
            scale: Vec3::from(scale),
        }
    }

    pub fn from_uniform_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::broadcast(scale),
            ..Default::default()
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + (self.orientation * (point * self.scale))
    }

    pub fn to_matrix(&self) -> Mat4 {
        let isometry = ultraviolet::Isometry3::new(self.position, self.orientation);
        isometry.into_homogeneous_matrix() * Mat4::from_nonuniform_scale(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            orientation: Rotor3::identity(),
            scale: Vec3::one(),
        }
    }
}
