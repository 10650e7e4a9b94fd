use sidescroll_engine::{
    load_manifest, resolve_app_paths, LoopConfig, SessionSetup, SLOW_FRAME_ENV_VAR,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::tuning_file::load_tuning_file;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) setup: SessionSetup,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Side Scroller Startup ===");

    let paths = resolve_app_paths().map_err(|error| format!("resolve app paths: {error}"))?;
    info!(
        root = %paths.root.display(),
        assets_dir = %paths.assets_dir.display(),
        slow_frame_env_var = SLOW_FRAME_ENV_VAR,
        "startup"
    );

    let manifest = load_manifest(&paths.manifest_path).map_err(|error| error.to_string())?;
    info!(sprite_count = manifest.len(), "asset_manifest_loaded");
    let tuning = load_tuning_file(&paths.tuning_path)?;

    Ok(AppWiring {
        config: LoopConfig {
            window_title: format!("Side Scroller {}", env!("CARGO_PKG_VERSION")),
            ..LoopConfig::default()
        },
        setup: SessionSetup {
            tuning,
            manifest,
            assets_dir: paths.assets_dir,
        },
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
