use ultraviolet::Mat4;

/// Joints are node indices into [`super::LoadedModel::nodes`].
#[derive(Clone, Debug)]
pub struct LoadedSkin {
    pub name: Option<String>,
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

impl LoadedSkin {
    /// glTF allows leaving out the inverse bind matrices, in which case they are all identity.
    pub fn inverse_bind_matrix(&self, joint: usize) -> Mat4 {
        self.inverse_bind_matrices
            .get(joint)
            .copied()
            .unwrap_or_else(Mat4::identity)
    }
}
