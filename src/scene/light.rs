use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DirectionalLight {
    pub position: Vec3,
    /// The light shines from `position` towards `target`
    pub target: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Half angle of the cone, in radians
    pub angle: f32,
    /// Fraction of the cone that fades out, 0 gives a hard edge
    pub penumbra: f32,
    /// 0 means no range limit
    pub distance: f32,
    pub decay: f32,
    pub cast_shadow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Ambient(AmbientLight),
    Directional(DirectionalLight),
    Spot(SpotLight),
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::one(),
            intensity: 1.5,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(10.0, 10.0, 10.0),
            target: Vec3::zero(),
            color: Vec3::one(),
            intensity: 2.0,
        }
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 5.0, 5.0),
            target: Vec3::zero(),
            color: Vec3::one(),
            intensity: 3.0,
            angle: 0.5,
            penumbra: 1.0,
            distance: 0.0,
            decay: 2.0,
            cast_shadow: true,
        }
    }
}

/// The fixed lighting rig of the scene.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct LightSettings {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
}

impl LightSettings {
    pub fn lights(&self) -> Vec<Light> {
        vec![
            Light::Ambient(self.ambient.clone()),
            Light::Directional(self.directional.clone()),
            Light::Spot(self.spot.clone()),
        ]
    }
}
