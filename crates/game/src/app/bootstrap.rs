use engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay;
use super::layout::{load_layout, LayoutError};

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Treasure Escape Startup ===");

    let paths = resolve_app_paths()?;
    let layout = load_layout(&paths.assets_dir)?;
    let scene_size = layout.design_size.scaled(layout.scale);
    info!(
        root = %paths.root.display(),
        scene_width = scene_size.x,
        scene_height = scene_size.y,
        "app_paths_resolved"
    );

    let config = LoopConfig {
        window_width: scene_size.x.round().max(1.0) as u32,
        window_height: scene_size.y.round().max(1.0) as u32,
        asset_root: Some(paths.assets_dir),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: gameplay::build_scene(&layout),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
