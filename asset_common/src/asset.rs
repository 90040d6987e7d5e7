pub mod scene;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

/// A reference to an asset, addressed by its path segments relative to the asset root.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct AssetRef {
    name: Vec<String>,
}

impl AssetRef {
    pub fn new(name: Vec<String>) -> Self {
        Self::from_segments(name.iter().map(String::as_str))
    }

    /// Parses a `/` separated path. Leading slashes and `.` segments are ignored,
    /// so `/textures/a.png` and `textures/./a.png` name the same asset.
    /// `..` removes the previous segment and never climbs above the asset root.
    pub fn from_path(path: &str) -> Self {
        Self::from_segments(path.split(['/', '\\']))
    }

    fn from_segments<'a>(segments: impl Iterator<Item = &'a str>) -> Self {
        let mut name: Vec<String> = Vec::new();
        for segment in segments {
            match segment {
                "" | "." => {}
                ".." => {
                    name.pop();
                }
                segment => name.push(segment.to_string()),
            }
        }
        Self { name }
    }

    pub fn name(&self) -> &[String] {
        &self.name
    }

    pub fn file_name(&self) -> Option<&str> {
        self.name.last().map(String::as_str)
    }

    pub fn extension(&self) -> Option<&str> {
        self.file_name()
            .and_then(|file_name| file_name.rsplit_once('.'))
            .map(|(_, extension)| extension)
    }

    pub fn to_path(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        path.extend(self.name.iter());
        path
    }
}

impl Display for AssetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name.join("/"))
    }
}

impl From<&str> for AssetRef {
    fn from(path: &str) -> Self {
        Self::from_path(path)
    }
}
