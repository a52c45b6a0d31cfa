//! Logging setup for the cubeflat viewer.
//!
//! The library crates log through the `log` facade; this installs a
//! `tracing-subscriber` registry that receives those records alongside native
//! `tracing` events. Console output always, plus a JSON file in debug builds.

use std::path::Path;

use cubeflat_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directives appended to every filter so GPU backends stay quiet.
const BACKEND_DIRECTIVES: &str = "wgpu=warn,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// File written under `log_dir` in debug builds.
pub const LOG_FILE_NAME: &str = "cubeflat.log";

/// Filter string for a base `level`; empty means `info`.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("{level},{BACKEND_DIRECTIVES}")
}

/// `RUST_LOG` if set, otherwise [`filter_directives`] for the configured level.
pub fn env_filter(config: Option<&Config>) -> EnvFilter {
    let level = config.map_or("", |c| c.debug.log_level.as_str());
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(level)))
}

/// Install the global subscriber.
///
/// With `debug_build` and a `log_dir`, a JSON copy of every event goes to
/// `log_dir/cubeflat.log`. Failing to create that file only drops the file
/// layer. Returns `false` if a global subscriber was already installed.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) -> bool {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console_layer);

    let file = debug_build
        .then_some(log_dir)
        .flatten()
        .and_then(|dir| {
            std::fs::create_dir_all(dir).ok()?;
            std::fs::File::create(dir.join(LOG_FILE_NAME)).ok()
        });

    let installed = match file {
        Some(file) => subscriber
            .with(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_timer(fmt::time::uptime())
                    .json(),
            )
            .try_init()
            .is_ok(),
        None => subscriber.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(debug_build, "logging initialized");
    }
    installed
}
