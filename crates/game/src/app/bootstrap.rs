use engine::{resolve_app_paths, AppPaths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, ContentError};

const DEBUG_FLAG: &str = "--debug";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CliOptions {
    pub(crate) debug: bool,
}

impl CliOptions {
    pub(crate) fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        for arg in args {
            if arg == DEBUG_FLAG {
                options.debug = true;
            } else {
                warn!(argument = %arg, "unknown_argument_ignored");
            }
        }
        options
    }
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) paths: AppPaths,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let debug = raw_args.iter().any(|arg| arg == DEBUG_FLAG);
    init_tracing(debug);
    info!("=== Cultivate Startup ===");
    let options = CliOptions::parse(raw_args);

    let paths = resolve_app_paths()?;
    let content = gameplay::load_world_content(&paths.base_content_dir())?;
    let config = LoopConfig {
        view_width: content.world.view_width,
        view_height: content.world.view_height,
        show_fps_overlay: options.debug,
        ..LoopConfig::default()
    };
    info!(
        debug = options.debug,
        view_width = config.view_width,
        view_height = config.view_height,
        "content_loaded"
    );

    Ok(AppWiring {
        config,
        paths,
        scene: Box::new(gameplay::ExplorationScene::new(content)),
    })
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn debug_flag_enables_debug_mode() {
        assert!(CliOptions::parse(args(&["--debug"])).debug);
        assert!(!CliOptions::parse(args(&[])).debug);
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        let options = CliOptions::parse(args(&["--fullscreen", "level2", "--debug"]));
        assert_eq!(options, CliOptions { debug: true });
    }
}
