use serde::{Deserialize, Serialize};
use ultraviolet::Vec3;

/// Material parameters as authored in the model file.
/// Texture maps are bound later on the scene side.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LoadedMaterial {
    pub name: Option<String>,
    pub base_color: Vec3,
    pub opacity: f32,
    pub roughness_factor: f32,
    pub metallic_factor: f32,
    pub emissivity: Vec3,
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

impl LoadedMaterial {
    /// The material glTF prescribes for primitives that don't name one.
    pub fn default_material() -> Self {
        Self {
            name: None,
            base_color: Vec3::one(),
            opacity: 1.0,
            roughness_factor: 1.0,
            metallic_factor: 1.0,
            emissivity: Vec3::zero(),
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha_mode == AlphaMode::Blend
    }
}

impl Default for LoadedMaterial {
    fn default() -> Self {
        Self::default_material()
    }
}
