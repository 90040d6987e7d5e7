use std::{collections::HashMap, sync::Arc};

use asset_common::{
    gpu::{SkinVertex, Vertex},
    scene::{
        AlphaMode, ChannelValues, Interpolation, LoadedChannel, LoadedClip, LoadedMaterial,
        LoadedMesh, LoadedModel, LoadedNode, LoadedPrimitive, LoadedSkin,
    },
    transform::Transform,
    AssetRef,
};
use gltf::{animation::util::ReadOutputs, Semantic};
use ultraviolet::{Mat4, Vec3, Vec4};

use crate::error::{AssetLoadError, AssetLoadErrorKind};

struct ModelLoadingData<'a> {
    asset: &'a AssetRef,
    buffers: Vec<gltf::buffer::Data>,
    default_material: Arc<LoadedMaterial>,
    materials: HashMap<MaterialKey, Arc<LoadedMaterial>>,
    meshes: HashMap<MeshKey, Arc<LoadedMesh>>,
}

impl<'a> ModelLoadingData<'a> {
    fn new(asset: &'a AssetRef, buffers: Vec<gltf::buffer::Data>) -> Self {
        Self {
            asset,
            buffers,
            default_material: Arc::new(LoadedMaterial::default_material()),
            materials: HashMap::new(),
            meshes: HashMap::new(),
        }
    }

    fn buffer(&self, buffer: gltf::Buffer<'_>) -> Option<&[u8]> {
        self.buffers.get(buffer.index()).map(|v| &v.0[..])
    }
}

#[derive(Hash, Eq, PartialEq, Debug)]
struct MaterialKey {
    index: usize,
}

#[derive(Hash, Eq, PartialEq, Debug)]
struct MeshKey {
    mesh: usize,
    primitive: usize,
}

/// Turns a self-contained glTF file (GLB, or JSON with embedded data URIs) into a [`LoadedModel`].
///
/// Only the buffers are imported. Images referenced by the file are skipped,
/// the scene binds its own texture maps.
pub struct GltfModelLoader {}

impl GltfModelLoader {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for GltfModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GltfModelLoader {
    pub fn load_model(
        &mut self,
        asset: &AssetRef,
        bytes: &[u8],
    ) -> Result<LoadedModel, AssetLoadError> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)
            .map_err(|error| AssetLoadError::gltf(asset.clone(), error))?;
        let buffers = gltf::import_buffers(&document, None, blob)
            .map_err(|error| AssetLoadError::gltf(asset.clone(), error))?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| AssetLoadError::new(asset.clone(), AssetLoadErrorKind::NoScene))?;

        let mut loading_data = ModelLoadingData::new(asset, buffers);

        let nodes = document
            .nodes()
            .map(|node| self.load_node(&mut loading_data, &node))
            .collect::<Result<Vec<_>, _>>()?;
        let skins = document
            .skins()
            .map(|skin| self.load_skin(&loading_data, &skin))
            .collect();
        let clips = document
            .animations()
            .map(|animation| Arc::new(self.load_clip(&loading_data, &animation)))
            .collect();

        Ok(LoadedModel {
            nodes,
            roots: scene.nodes().map(|node| node.index()).collect(),
            skins,
            clips,
        })
    }

    fn load_node(
        &mut self,
        loading_data: &mut ModelLoadingData<'_>,
        node: &gltf::Node<'_>,
    ) -> Result<LoadedNode, AssetLoadError> {
        let transform = {
            let (position, orientation, scale) = node.transform().decomposed();
            Transform::from_arrays(position, orientation, scale)
        };

        let mut primitives = Vec::new();
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "Skipping primitive {} of mesh {} in {}: only triangles are supported",
                        primitive.index(),
                        mesh.index(),
                        loading_data.asset
                    );
                    continue;
                }
                let material = self.load_material(loading_data, &primitive.material());
                let loaded_mesh = self.load_mesh(loading_data, &mesh, &primitive)?;
                primitives.push(LoadedPrimitive {
                    material,
                    mesh: loaded_mesh,
                });
            }
        }

        Ok(LoadedNode {
            name: node.name().map(str::to_string),
            transform,
            children: node.children().map(|child| child.index()).collect(),
            primitives,
            skin: node.skin().map(|skin| skin.index()),
        })
    }

    fn load_material(
        &mut self,
        loading_data: &mut ModelLoadingData<'_>,
        material: &gltf::Material<'_>,
    ) -> Arc<LoadedMaterial> {
        // material.index() returns None when the material is the default material
        let Some(index) = material.index() else {
            return loading_data.default_material.clone();
        };

        loading_data
            .materials
            .entry(MaterialKey { index })
            .or_insert_with(|| {
                let material_pbr = material.pbr_metallic_roughness();
                let emissive_factor = material.emissive_factor();
                let emissivity = emissive_factor
                    .map(|v| v * material.emissive_strength().unwrap_or(1.0))
                    .into();
                let [r, g, b, a] = material_pbr.base_color_factor();

                Arc::new(LoadedMaterial {
                    name: material.name().map(str::to_string),
                    base_color: Vec3::new(r, g, b),
                    opacity: a,
                    roughness_factor: material_pbr.roughness_factor(),
                    metallic_factor: material_pbr.metallic_factor(),
                    emissivity,
                    alpha_mode: match material.alpha_mode() {
                        gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
                        gltf::material::AlphaMode::Mask => AlphaMode::Mask,
                        gltf::material::AlphaMode::Blend => AlphaMode::Blend,
                    },
                    double_sided: material.double_sided(),
                })
            })
            .clone()
    }

    fn load_mesh(
        &mut self,
        loading_data: &mut ModelLoadingData<'_>,
        mesh: &gltf::Mesh<'_>,
        primitive: &gltf::Primitive<'_>,
    ) -> Result<Arc<LoadedMesh>, AssetLoadError> {
        let mesh_key = MeshKey {
            mesh: mesh.index(),
            primitive: primitive.index(),
        };
        if let Some(loaded) = loading_data.meshes.get(&mesh_key) {
            return Ok(loaded.clone());
        }

        let invalid = |reason| {
            AssetLoadError::new(
                loading_data.asset.clone(),
                AssetLoadErrorKind::InvalidPrimitive {
                    mesh: mesh.index(),
                    primitive: primitive.index(),
                    reason,
                },
            )
        };

        let reader = primitive.reader(|buffer| loading_data.buffer(buffer));
        let positions = reader
            .read_positions()
            .ok_or_else(|| invalid("it has no positions"))?;
        let normals: Box<dyn Iterator<Item = [f32; 3]> + '_> = match reader.read_normals() {
            Some(normals) => Box::new(normals),
            None => {
                log::warn!(
                    "Mesh {} in {} has no normals, lighting will be off",
                    mesh.index(),
                    loading_data.asset
                );
                Box::new(std::iter::repeat([0.0, 0.0, 1.0]))
            }
        };
        let tex_coords: Box<dyn Iterator<Item = [f32; 2]> + '_> = match reader.read_tex_coords(0) {
            Some(tex_coords) => Box::new(tex_coords.into_f32()),
            None => Box::new(std::iter::repeat([0.0, 0.0])),
        };
        let tangents: Box<dyn Iterator<Item = [f32; 4]> + '_> = match reader.read_tangents() {
            Some(tangents) => Box::new(tangents),
            None => Box::new(std::iter::repeat([0.0; 4])),
        };

        // zippy zip https://stackoverflow.com/a/71494478/3492994
        let vertices: Vec<Vertex> = positions
            .zip(normals.zip(tex_coords.zip(tangents)))
            .map(|(position, (normal, (uv, tangent)))| Vertex {
                position,
                normal,
                uv,
                tangent,
            })
            .collect();

        let skin = match (reader.read_joints(0), reader.read_weights(0)) {
            (Some(joints), Some(weights)) => {
                let skin: Vec<SkinVertex> = joints
                    .into_u16()
                    .zip(weights.into_f32())
                    .map(|(joints, weights)| SkinVertex { joints, weights })
                    .collect();
                if skin.len() != vertices.len() {
                    return Err(invalid("joint and position counts differ"));
                }
                Some(skin)
            }
            _ => None,
        };

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|indices| indices.into_u32().collect())
            .unwrap_or_else(|| (0..(vertices.len() as u32)).collect());
        if indices.len() % 3 != 0 {
            return Err(invalid("index count is not a multiple of three"));
        }
        if indices.iter().any(|&index| index as usize >= vertices.len()) {
            return Err(invalid("an index points past the last vertex"));
        }

        let loaded = Arc::new(LoadedMesh {
            vertices,
            indices,
            skin,
        });
        loading_data.meshes.insert(mesh_key, loaded.clone());
        Ok(loaded)
    }

    fn load_skin(&self, loading_data: &ModelLoadingData<'_>, skin: &gltf::Skin<'_>) -> LoadedSkin {
        let reader = skin.reader(|buffer| loading_data.buffer(buffer));
        let inverse_bind_matrices = reader
            .read_inverse_bind_matrices()
            .map(|matrices| {
                matrices
                    .map(|[c0, c1, c2, c3]| {
                        Mat4::new(Vec4::from(c0), Vec4::from(c1), Vec4::from(c2), Vec4::from(c3))
                    })
                    .collect()
            })
            .unwrap_or_default();

        LoadedSkin {
            name: skin.name().map(str::to_string),
            joints: skin.joints().map(|joint| joint.index()).collect(),
            inverse_bind_matrices,
        }
    }

    fn load_clip(
        &self,
        loading_data: &ModelLoadingData<'_>,
        animation: &gltf::Animation<'_>,
    ) -> LoadedClip {
        let mut channels = Vec::new();
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| loading_data.buffer(buffer));
            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let values = match reader.read_outputs() {
                Some(ReadOutputs::Translations(translations)) => {
                    ChannelValues::Translations(translations.map(Vec3::from).collect())
                }
                Some(ReadOutputs::Rotations(rotations)) => {
                    ChannelValues::Rotations(rotations.into_f32().collect())
                }
                Some(ReadOutputs::Scales(scales)) => {
                    ChannelValues::Scales(scales.map(Vec3::from).collect())
                }
                Some(ReadOutputs::MorphTargetWeights(_)) => {
                    log::warn!(
                        "Skipping a morph target channel of animation {} in {}",
                        animation.index(),
                        loading_data.asset
                    );
                    continue;
                }
                None => continue,
            };

            channels.push(LoadedChannel {
                target_node: channel.target().node().index(),
                interpolation: match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => Interpolation::Linear,
                    gltf::animation::Interpolation::Step => Interpolation::Step,
                    gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
                },
                timestamps: inputs.collect(),
                values,
            });
        }

        LoadedClip {
            name: animation.name().map(str::to_string),
            channels,
        }
    }
}
