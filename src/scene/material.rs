use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use asset_common::scene::{ColorSpace, LoadedMaterial};
use ultraviolet::Vec3;

use super::Texture;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialIdGenerator {
    next_id: Arc<AtomicU32>,
}

impl MaterialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> MaterialId {
        MaterialId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

/// The texture inputs of a surface.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MapSlot {
    Color,
    Roughness,
    Metalness,
    Normal,
    AmbientOcclusion,
}

impl MapSlot {
    pub const ALL: [MapSlot; 5] = [
        MapSlot::Color,
        MapSlot::Roughness,
        MapSlot::Metalness,
        MapSlot::Normal,
        MapSlot::AmbientOcclusion,
    ];

    pub fn index(&self) -> usize {
        match self {
            MapSlot::Color => 0,
            MapSlot::Roughness => 1,
            MapSlot::Metalness => 2,
            MapSlot::Normal => 3,
            MapSlot::AmbientOcclusion => 4,
        }
    }

    /// Only the colour map holds colours, the others hold data.
    pub fn color_space(&self) -> ColorSpace {
        match self {
            MapSlot::Color => ColorSpace::SRGB,
            _ => ColorSpace::Linear,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShadingModel {
    /// Metallic/roughness PBR, affected by lights
    Standard,
    /// Just the colour, ignores lights
    Unlit,
}

/// Which faces get drawn, relative to the triangle winding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    Front,
    Back,
    Double,
}

/// The mutable material of one renderable surface.
///
/// Every change that a renderer has to react to must be followed by
/// [`SurfaceMaterial::mark_needs_update`], which bumps the version the renderer compares against.
#[derive(Clone, Debug)]
pub struct SurfaceMaterial {
    id: MaterialId,
    pub shading: ShadingModel,
    pub base_color: Vec3,
    pub opacity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Vec3,
    pub side: Side,
    pub transparent: bool,
    maps: [Option<Texture>; 5],
    version: u32,
}

impl SurfaceMaterial {
    pub fn standard(id: MaterialId, loaded: &LoadedMaterial) -> Self {
        Self {
            id,
            shading: ShadingModel::Standard,
            base_color: loaded.base_color,
            opacity: loaded.opacity,
            roughness: loaded.roughness_factor,
            metalness: loaded.metallic_factor,
            emissive: loaded.emissivity,
            side: if loaded.double_sided {
                Side::Double
            } else {
                Side::Front
            },
            transparent: loaded.is_transparent(),
            maps: Default::default(),
            version: 0,
        }
    }

    pub fn unlit(id: MaterialId) -> Self {
        Self {
            id,
            shading: ShadingModel::Unlit,
            base_color: Vec3::one(),
            opacity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            emissive: Vec3::zero(),
            side: Side::Front,
            transparent: false,
            maps: Default::default(),
            version: 0,
        }
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn map(&self, slot: MapSlot) -> Option<&Texture> {
        self.maps[slot.index()].as_ref()
    }

    pub fn set_map(&mut self, slot: MapSlot, texture: Option<Texture>) {
        self.maps[slot.index()] = texture;
    }

    pub fn all_maps_bound(&self) -> bool {
        self.maps.iter().all(Option::is_some)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Tells the renderer to re-derive its GPU state for this material before the next draw.
    pub fn mark_needs_update(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Compares everything a renderer would see, ignoring the version counter.
    pub fn same_appearance(&self, other: &SurfaceMaterial) -> bool {
        self.shading == other.shading
            && self.base_color == other.base_color
            && self.opacity == other.opacity
            && self.roughness == other.roughness
            && self.metalness == other.metalness
            && self.emissive == other.emissive
            && self.side == other.side
            && self.transparent == other.transparent
            && self.maps == other.maps
    }
}
