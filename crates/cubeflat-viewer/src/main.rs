//! Viewer binary: `cubeflat` opens a window, `cubeflat --capture out.png`
//! renders a single frame offscreen.

use std::process::ExitCode;

use clap::Parser;
use cubeflat_config::{CliArgs, Config, default_config_dir};
use cubeflat_viewer::{app, capture};
use tracing::error;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    cubeflat_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Some(path) = &args.capture {
        return match capture::capture_to_png(&config, path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Capture failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    match app::run(config, config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Event loop failed: {e}");
            ExitCode::FAILURE
        }
    }
}
