//! Viewer settings persisted as `config.ron`, with command-line overrides.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CubeMapConfig, CubeMapPattern, Config, DebugConfig, ViewConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
