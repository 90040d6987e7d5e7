use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    camera::{orbit_controller::OrbitSettings, CameraSettings},
    components::{BackdropSettings, FigureSettings},
    render::BloomSettings,
    scene::LightSettings,
};

/// Everything about the scene that isn't decided at runtime.
/// Missing fields fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowSettings,
    /// Asset paths are relative to this directory
    pub asset_root: PathBuf,
    pub figure: FigureSettings,
    pub backdrop: BackdropSettings,
    pub camera: CameraSettings,
    pub lights: LightSettings,
    pub controls: OrbitSettings,
    pub bloom: BloomSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            asset_root: PathBuf::from("public"),
            figure: FigureSettings::default(),
            backdrop: BackdropSettings::default(),
            camera: CameraSettings::default(),
            lights: LightSettings::default(),
            controls: OrbitSettings::default(),
            bloom: BloomSettings::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Astronaut".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl SceneConfig {
    pub fn from_str(value: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(value)?)
    }
}

pub struct ConfigFileLoader {
    pub path: PathBuf,
    config: Option<SceneConfig>,
}

impl ConfigFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: None,
        }
    }

    /// Reads the config file. If there is none yet, the defaults are written to it.
    pub fn load_config(&mut self) -> anyhow::Result<&SceneConfig> {
        let config = match std::fs::read_to_string(&self.path) {
            Ok(content) => SceneConfig::from_str(&content)
                .with_context(|| format!("Could not parse {}", self.path.display()))?,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                log::info!("Writing the default config to {}", self.path.display());
                self.config = Some(SceneConfig::default());
                self.save_config()?;
                SceneConfig::default()
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("Could not read {}", self.path.display()))
            }
        };
        Ok(self.config.insert(config))
    }

    pub fn config(&self) -> Option<&SceneConfig> {
        self.config.as_ref()
    }

    pub fn save_config(&self) -> anyhow::Result<()> {
        if let Some(config) = &self.config {
            let content = serde_json::to_string_pretty(config)?;
            write_creating_dirs(&self.path, content)
                .with_context(|| format!("Could not write {}", self.path.display()))?;
        }
        Ok(())
    }
}

fn write_creating_dirs(path: &Path, content: String) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
