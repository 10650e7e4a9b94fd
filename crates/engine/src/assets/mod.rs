mod loader;
mod manifest;
mod paths;
mod store;

pub use loader::{load_sheet, AssetCompletion, AssetId, AssetLoadError, AssetLoader, LoadedSheet};
pub use manifest::{
    load_manifest, parse_manifest, AssetManifest, ManifestError, ManifestErrorCode,
    SourceLocation, SpriteDecl, SpriteRole,
};
pub use paths::AssetPathError;
pub use store::{AssetStore, CompletionOutcome, DecodedImage, ImageHandle, SpriteSheet};
