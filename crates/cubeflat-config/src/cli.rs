//! Command-line arguments for the viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;
use crate::config::CubeMapPattern;

/// cubeflat command-line arguments.
///
/// Values given here override those loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cubeflat", about = "Flat cross view of a cube map")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Edge length of each face in pixels.
    #[arg(long)]
    pub face_size: Option<f32>,

    /// Left padding in pixels.
    #[arg(long)]
    pub padding_left: Option<f32>,

    /// Right padding in pixels (also offsets the cross from the top edge).
    #[arg(long)]
    pub padding_right: Option<f32>,

    /// Show one flat colour per face instead of the direction gradient.
    #[arg(long)]
    pub solid_faces: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Render one frame offscreen, write it to this PNG and exit.
    #[arg(long, value_name = "PNG")]
    pub capture: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(size) = args.face_size {
            self.view.face_size_px = size;
        }
        if let Some(left) = args.padding_left {
            self.view.padding_left_px = left;
        }
        if let Some(right) = args.padding_right {
            self.view.padding_right_px = right;
        }
        if args.solid_faces {
            self.cubemap.pattern = CubeMapPattern::SolidFaces;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
