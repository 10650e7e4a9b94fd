use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("asset path must not be empty")]
    Empty,
    #[error("asset path must be relative to the assets directory")]
    Absolute,
    #[error("asset path must not contain '\\\\'")]
    Backslash,
    #[error("asset path must not contain '..'")]
    ParentTraversal,
    #[error("asset path contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_asset_path(raw: &str) -> Result<(), AssetPathError> {
    if raw.is_empty() {
        return Err(AssetPathError::Empty);
    }
    if raw.starts_with('/') {
        return Err(AssetPathError::Absolute);
    }
    if raw.contains('\\') {
        return Err(AssetPathError::Backslash);
    }
    if raw.split('/').any(|segment| segment == "..") {
        return Err(AssetPathError::ParentTraversal);
    }
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-' | '.') {
            continue;
        }
        return Err(AssetPathError::InvalidCharacter { character: ch });
    }
    Ok(())
}

pub(crate) fn resolve_asset_path(assets_dir: &Path, raw: &str) -> Result<PathBuf, AssetPathError> {
    validate_asset_path(raw)?;
    Ok(raw
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(assets_dir.to_path_buf(), |path, segment| path.join(segment)))
}
