use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use asset_common::AssetRef;

/// Fetches the raw bytes of an asset. Decoding happens elsewhere.
pub trait AssetSource: Send + Sync {
    fn read(&self, asset: &AssetRef) -> io::Result<Vec<u8>>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FileSource {
    fn read(&self, asset: &AssetRef) -> io::Result<Vec<u8>> {
        std::fs::read(asset.to_path(&self.root))
    }
}

/// Serves assets that are already in memory, for example bundled into the binary.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<AssetRef, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, asset: impl Into<AssetRef>, bytes: Vec<u8>) -> Self {
        self.insert(asset, bytes);
        self
    }

    pub fn insert(&mut self, asset: impl Into<AssetRef>, bytes: Vec<u8>) {
        self.files.insert(asset.into(), bytes);
    }
}

impl AssetSource for MemorySource {
    fn read(&self, asset: &AssetRef) -> io::Result<Vec<u8>> {
        self.files.get(asset).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no asset named {}", asset))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_reads_relative_to_its_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("textures")).unwrap();
        std::fs::write(root.path().join("textures").join("a.png"), b"abc").unwrap();

        let source = FileSource::new(root.path());
        assert_eq!(source.read(&"/textures/a.png".into()).unwrap(), b"abc");
        let missing = source.read(&"textures/b.png".into()).unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn file_source_cannot_leave_its_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"hidden").unwrap();

        let source = FileSource::new(&root);
        let error = source.read(&"../secret.txt".into()).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn memory_source_reports_missing_files() {
        let source = MemorySource::new().with_file("a.bin", vec![1, 2, 3]);
        assert_eq!(source.read(&"a.bin".into()).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            source.read(&"b.bin".into()).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
