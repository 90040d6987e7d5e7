use std::collections::HashMap;

use crate::scene::MaterialId;

use super::{FrameGraph, RenderEngine};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub draws: usize,
    pub triangles: usize,
    pub lights: usize,
    pub post_passes: usize,
    /// Materials whose GPU state had to be derived again this frame
    pub material_updates: usize,
}

/// A render engine without a GPU.
///
/// Does the bookkeeping a real backend does, so that the rest of the application can
/// run and be tested without a window: it remembers which version of every material it
/// has seen, and re-derives a material when its version changes.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    size: (u32, u32),
    uploaded_materials: HashMap<MaterialId, u32>,
    material_updates: u64,
    last_frame: FrameStats,
    frames: u64,
}

impl HeadlessEngine {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total number of material re-derivations since the engine was created.
    pub fn material_updates(&self) -> u64 {
        self.material_updates
    }

    pub fn uploaded_version(&self, material: MaterialId) -> Option<u32> {
        self.uploaded_materials.get(&material).copied()
    }
}

impl RenderEngine for HeadlessEngine {
    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Resizing to {}x{}", width, height);
        self.size = (width, height);
    }

    fn render(&mut self, frame: &FrameGraph<'_>) -> anyhow::Result<()> {
        let mut material_updates = 0;
        for draw in &frame.draws {
            let material = draw.material;
            let version = material.version();
            if self.uploaded_materials.insert(material.id(), version) != Some(version) {
                log::trace!("Deriving material {:?} at version {}", material.id(), version);
                material_updates += 1;
            }
        }

        self.frames += 1;
        self.material_updates += material_updates as u64;
        self.last_frame = FrameStats {
            frame: self.frames,
            draws: frame.draws.len(),
            triangles: frame.triangle_count(),
            lights: frame.lights.len(),
            post_passes: frame.post.len(),
            material_updates,
        };
        if material_updates > 0 {
            log::debug!("Frame {:?}", self.last_frame);
        }
        Ok(())
    }
}
