use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::{ImageError, ImageReader};
use thiserror::Error;
use tracing::warn;

use super::manifest::{AssetManifest, SpriteDecl};
use super::paths::{resolve_asset_path, AssetPathError};
use super::store::DecodedImage;

/// Index of a declaration in the manifest the loader was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub usize);

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("invalid asset path: {0}")]
    InvalidPath(#[from] AssetPathError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("sheet is {width}px wide, too narrow for {frame_count} frames")]
    SheetTooNarrow { width: u32, frame_count: u32 },
    #[error("failed to start loader thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

#[derive(Debug)]
pub struct LoadedSheet {
    pub image: DecodedImage,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
}

/// Completion signal for one declared asset. Exactly one is sent per
/// declaration.
#[derive(Debug)]
pub struct AssetCompletion {
    pub asset: AssetId,
    pub result: Result<LoadedSheet, AssetLoadError>,
}

/// Decodes declared sprites on background threads and hands completions
/// back to the frame loop through a channel.
#[derive(Debug)]
pub struct AssetLoader {
    receiver: Receiver<AssetCompletion>,
    outstanding: usize,
}

impl AssetLoader {
    pub fn spawn(assets_dir: &Path, manifest: &AssetManifest) -> Self {
        let (sender, receiver) = mpsc::channel();
        for (index, decl) in manifest.sprites().iter().enumerate() {
            spawn_worker(assets_dir, AssetId(index), decl.clone(), sender.clone());
        }
        Self {
            receiver,
            outstanding: manifest.len(),
        }
    }

    /// Returns every completion that has arrived, without blocking.
    pub fn drain(&mut self) -> Vec<AssetCompletion> {
        let completions: Vec<_> = self.receiver.try_iter().collect();
        self.outstanding = self.outstanding.saturating_sub(completions.len());
        completions
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

fn spawn_worker(
    assets_dir: &Path,
    asset: AssetId,
    decl: SpriteDecl,
    sender: Sender<AssetCompletion>,
) {
    let assets_dir = assets_dir.to_path_buf();
    let fallback_sender = sender.clone();
    let spawned = thread::Builder::new()
        .name(format!("asset-{}", decl.role.key()))
        .spawn(move || {
            let result = resolve_asset_path(&assets_dir, &decl.path)
                .map_err(AssetLoadError::from)
                .and_then(|path| load_sheet(&path, decl.frame_count));
            // The receiver is gone only when the loop has already shut down.
            let _ = sender.send(AssetCompletion { asset, result });
        });

    if let Err(error) = spawned {
        warn!(asset = asset.0, error = %error, "asset_worker_spawn_failed");
        let _ = fallback_sender.send(AssetCompletion {
            asset,
            result: Err(AssetLoadError::WorkerSpawn(error)),
        });
    }
}

pub fn load_sheet(path: &Path, frame_count: u32) -> Result<LoadedSheet, AssetLoadError> {
    let reader = ImageReader::open(path).map_err(|source| AssetLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    let frame_count = frame_count.max(1);
    let frame_width = image.width() / frame_count;
    if frame_width == 0 {
        return Err(AssetLoadError::SheetTooNarrow {
            width: image.width(),
            frame_count,
        });
    }
    Ok(LoadedSheet {
        frame_width,
        frame_height: image.height(),
        frame_count,
        image: DecodedImage {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        },
    })
}
