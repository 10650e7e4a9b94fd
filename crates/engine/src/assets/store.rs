use std::collections::HashMap;

use tracing::{debug, warn};

use super::loader::{AssetCompletion, AssetId};
use super::manifest::{AssetManifest, SpriteRole};

/// Opaque reference to a decoded image owned by [`AssetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Frame geometry of a loaded horizontal strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
    pub image: ImageHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Loaded,
    Failed,
    Duplicate,
    Undeclared,
}

/// Decoded images, per-role sheet metadata, and the readiness count.
///
/// Every declared asset is counted once, loaded or failed. Readiness is
/// reached when the count equals the declared total.
#[derive(Debug, Default)]
pub struct AssetStore {
    declared: Vec<SpriteRole>,
    completed: Vec<bool>,
    completed_count: usize,
    images: Vec<DecodedImage>,
    sheets: HashMap<SpriteRole, SpriteSheet>,
}

impl AssetStore {
    pub fn new(manifest: &AssetManifest) -> Self {
        let declared: Vec<SpriteRole> = manifest.sprites().iter().map(|decl| decl.role).collect();
        Self {
            completed: vec![false; declared.len()],
            declared,
            ..Self::default()
        }
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn is_ready(&self) -> bool {
        self.completed_count == self.declared.len()
    }

    pub fn record(&mut self, completion: AssetCompletion) -> CompletionOutcome {
        let AssetId(index) = completion.asset;
        let Some(role) = self.declared.get(index).copied() else {
            warn!(asset = index, "asset_completion_undeclared");
            return CompletionOutcome::Undeclared;
        };
        if self.completed[index] {
            warn!(asset = index, role = role.key(), "asset_completion_duplicate");
            return CompletionOutcome::Duplicate;
        }
        self.completed[index] = true;
        self.completed_count += 1;

        match completion.result {
            Ok(loaded) => {
                let image = ImageHandle(self.images.len() as u32);
                self.images.push(loaded.image);
                self.sheets.insert(
                    role,
                    SpriteSheet {
                        frame_width: loaded.frame_width,
                        frame_height: loaded.frame_height,
                        frame_count: loaded.frame_count,
                        image,
                    },
                );
                debug!(
                    role = role.key(),
                    completed = self.completed_count,
                    declared = self.declared.len(),
                    "asset_loaded"
                );
                CompletionOutcome::Loaded
            }
            Err(error) => {
                warn!(
                    role = role.key(),
                    error = %error,
                    completed = self.completed_count,
                    declared = self.declared.len(),
                    "asset_load_failed"
                );
                CompletionOutcome::Failed
            }
        }
    }

    pub fn sheet(&self, role: SpriteRole) -> Option<&SpriteSheet> {
        self.sheets.get(&role)
    }

    pub fn image(&self, handle: ImageHandle) -> Option<&DecodedImage> {
        self.images.get(handle.0 as usize)
    }
}
