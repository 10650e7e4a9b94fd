use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod assets;
pub mod tuning;
pub mod world;

pub use app::{
    run_app, run_app_with_metrics, AppError, InputAction, LoopConfig, LoopMetricsSnapshot,
    MetricsHandle, Renderer, SessionSetup, SLOW_FRAME_ENV_VAR,
};
pub use assets::{
    load_manifest, parse_manifest, AssetLoader, AssetManifest, AssetStore, ManifestError,
    ManifestErrorCode, SpriteRole,
};
pub use tuning::{Tuning, TuningError, REFERENCE_TICKS_PER_SECOND};
pub use world::{
    CanvasSize, DrawCommand, EntityAllocator, EntityId, FrameInput, FramePhase, GameState,
    InputIntent, RenderView,
};

pub const ROOT_ENV_VAR: &str = "SIDESCROLL_ROOT";
pub const MANIFEST_FILE_NAME: &str = "manifest.xml";
pub const TUNING_FILE_NAME: &str = "tuning.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub tuning_path: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        Self {
            manifest_path: assets_dir.join(MANIFEST_FILE_NAME),
            tuning_path: assets_dir.join(TUNING_FILE_NAME),
            assets_dir,
            root,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "SIDESCROLL_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/sidescroll\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => root_from_env_value(&value),
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_upward(&exe_dir)
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn root_from_env_value(value: &str) -> Result<PathBuf, StartupError> {
    let normalized = normalize_path(Path::new(value));
    if is_repo_marker(&normalized) {
        Ok(normalized)
    } else {
        Err(StartupError::InvalidEnvRoot { path: normalized })
    }
}

fn find_root_upward(start_dir: &Path) -> Result<PathBuf, StartupError> {
    start_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: normalize_path(start_dir),
            env_var: ROOT_ENV_VAR,
        })
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn make_root(dir: &Path) {
        fs::write(dir.join("Cargo.toml"), "[workspace]\n").expect("cargo toml");
        fs::create_dir_all(dir.join("assets")).expect("assets dir");
    }

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let temp = TempDir::new().expect("temp");
        fs::create_dir_all(temp.path().join("assets")).expect("assets dir");
        assert!(!is_repo_marker(temp.path()));

        fs::write(temp.path().join("Cargo.toml"), "").expect("cargo toml");
        assert!(is_repo_marker(temp.path()));
    }

    #[test]
    fn root_is_found_from_nested_directory() {
        let temp = TempDir::new().expect("temp");
        make_root(temp.path());
        let nested = temp.path().join("target").join("debug");
        fs::create_dir_all(&nested).expect("nested");

        let root = find_root_upward(&nested).expect("root");
        assert_eq!(root, normalize_path(temp.path()));
    }

    #[test]
    fn env_root_must_be_a_project_root() {
        let temp = TempDir::new().expect("temp");
        let err = root_from_env_value(&temp.path().display().to_string()).expect_err("invalid");
        assert!(matches!(err, StartupError::InvalidEnvRoot { .. }));

        make_root(temp.path());
        let root = root_from_env_value(&temp.path().display().to_string()).expect("valid");
        assert_eq!(root, normalize_path(temp.path()));
    }

    #[test]
    fn app_paths_live_under_assets() {
        let paths = AppPaths::from_root(PathBuf::from("/game"));
        assert_eq!(paths.assets_dir, PathBuf::from("/game/assets"));
        assert_eq!(paths.manifest_path, PathBuf::from("/game/assets/manifest.xml"));
        assert_eq!(paths.tuning_path, PathBuf::from("/game/assets/tuning.json"));
    }
}
