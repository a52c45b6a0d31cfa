//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use cubeflat_render::FlatCubeViewOptions;
use cubeflat_render::view::{
    DEFAULT_FACE_SIZE_PX, DEFAULT_PADDING_LEFT_PX, DEFAULT_PADDING_RIGHT_PX,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Platform config directory for the viewer, e.g. `~/.config/cubeflat`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cubeflat")
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Flat cube layout and background.
    pub view: ViewConfig,
    /// Generated cube map shown by the viewer.
    pub cubemap: CubeMapConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in logical pixels.
    pub width: u32,
    /// Initial height in logical pixels.
    pub height: u32,
    pub title: String,
}

/// Layout of the cross and the colour behind it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Edge length of each face in pixels.
    pub face_size_px: f32,
    /// Gap between the left edge of the output and the cross.
    pub padding_left_px: f32,
    /// Gap used for the top edge of the cross.
    pub padding_right_px: f32,
    /// Linear RGBA the surface is cleared to before the cross is drawn.
    pub background: [f64; 4],
}

/// What the generated cube map looks like.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CubeMapPattern {
    /// Each texel coloured by its sampling direction.
    #[default]
    DirectionGradient,
    /// One flat colour per face.
    SolidFaces,
}

/// Generated cube map settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CubeMapConfig {
    /// Texels along each face edge.
    pub face_resolution: u32,
    pub pattern: CubeMapPattern,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level used when `RUST_LOG` is unset (e.g. "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "cubeflat".to_string(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            face_size_px: DEFAULT_FACE_SIZE_PX,
            padding_left_px: DEFAULT_PADDING_LEFT_PX,
            padding_right_px: DEFAULT_PADDING_RIGHT_PX,
            background: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

impl ViewConfig {
    /// Options for a [`FlatCubeView`](cubeflat_render::FlatCubeView).
    pub fn options(&self) -> FlatCubeViewOptions {
        FlatCubeViewOptions::default()
            .with_face_size(self.face_size_px)
            .with_padding(self.padding_left_px, self.padding_right_px)
    }
}

impl Default for CubeMapConfig {
    fn default() -> Self {
        Self {
            face_resolution: 256,
            pattern: CubeMapPattern::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there if it is missing.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            let config = Self::read(&path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Write `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&path, serialized).map_err(|source| ConfigError::Write { path, source })
    }

    /// Re-read `config.ron`; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;
        if &fresh != self {
            log::info!("Config reloaded with changes");
            Ok(Some(fresh))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
