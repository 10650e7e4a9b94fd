use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use tracing::info;

use super::paths::validate_asset_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteRole {
    Background,
    Player,
    Boss,
    /// Template copied onto every spawned projectile.
    Projectile,
}

impl SpriteRole {
    pub const ALL: [SpriteRole; 4] = [
        SpriteRole::Background,
        SpriteRole::Player,
        SpriteRole::Boss,
        SpriteRole::Projectile,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SpriteRole::Background => "background",
            SpriteRole::Player => "player",
            SpriteRole::Boss => "boss",
            SpriteRole::Projectile => "donut",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteDecl {
    pub role: SpriteRole,
    pub path: String,
    pub frame_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    sprites: Vec<SpriteDecl>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let decl = |role, path: &str, frame_count| SpriteDecl {
            role,
            path: path.to_string(),
            frame_count,
        };
        Self {
            sprites: vec![
                decl(SpriteRole::Background, "background.png", 1),
                decl(SpriteRole::Player, "sprites/tris.png", 3),
                decl(SpriteRole::Boss, "sprites/boss.png", 2),
                decl(SpriteRole::Projectile, "sprites/donut.png", 1),
            ],
        }
    }
}

impl AssetManifest {
    pub fn from_sprites(sprites: Vec<SpriteDecl>) -> Self {
        Self { sprites }
    }

    pub fn sprites(&self) -> &[SpriteDecl] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownElement,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    UnknownSpriteKey,
    DuplicateSpriteKey,
}

#[derive(Debug, Clone)]
pub struct ManifestError {
    pub code: ManifestErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ManifestError {}

/// Reads the manifest at `path`, falling back to [`AssetManifest::default`]
/// when the file does not exist.
pub fn load_manifest(path: &Path) -> Result<AssetManifest, ManifestError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "asset_manifest_missing_using_defaults");
            return Ok(AssetManifest::default());
        }
        Err(error) => {
            return Err(ManifestError {
                code: ManifestErrorCode::ReadFile,
                message: format!("failed to read manifest: {error}"),
                file_path: path.to_path_buf(),
                location: None,
            })
        }
    };
    parse_manifest(path, &raw)
}

pub fn parse_manifest(file_path: &Path, raw: &str) -> Result<AssetManifest, ManifestError> {
    let doc = Document::parse(raw).map_err(|error| ManifestError {
        code: ManifestErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Assets" {
        return Err(error_at_node(
            ManifestErrorCode::InvalidRoot,
            "root element must be <Assets>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    let mut seen_roles = HashSet::<SpriteRole>::new();
    let mut sprites = Vec::new();
    for child in root.children().filter(|node| node.is_element()) {
        if child.tag_name().name() != "Sprite" {
            return Err(error_at_node(
                ManifestErrorCode::UnknownElement,
                format!(
                    "unsupported element <{}>; only <Sprite> is allowed",
                    child.tag_name().name()
                ),
                file_path,
                &doc,
                child,
            ));
        }
        let decl = parse_sprite(file_path, &doc, child)?;
        if !seen_roles.insert(decl.role) {
            return Err(error_at_node(
                ManifestErrorCode::DuplicateSpriteKey,
                format!("sprite '{}' is declared more than once", decl.role.key()),
                file_path,
                &doc,
                child,
            ));
        }
        sprites.push(decl);
    }

    Ok(AssetManifest { sprites })
}

fn parse_sprite(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<SpriteDecl, ManifestError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut role: Option<SpriteRole> = None;
    let mut path: Option<String> = None;
    let mut frame_count: Option<u32> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ManifestErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <Sprite>"),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "key" => {
                let value = required_text(file_path, doc, field, "key")?;
                let parsed = SpriteRole::from_key(&value).ok_or_else(|| {
                    error_at_node(
                        ManifestErrorCode::UnknownSpriteKey,
                        format!(
                            "unknown sprite key '{value}'; allowed keys: background, player, boss, donut"
                        ),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                role = Some(parsed);
            }
            "path" => {
                let value = required_text(file_path, doc, field, "path")?;
                validate_asset_path(&value).map_err(|error| {
                    error_at_node(
                        ManifestErrorCode::InvalidValue,
                        format!("invalid path '{value}': {error}"),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                path = Some(value);
            }
            "frameCount" => {
                let value = required_text(file_path, doc, field, "frameCount")?;
                let parsed = value.parse::<u32>().ok().filter(|count| *count > 0);
                let Some(parsed) = parsed else {
                    return Err(error_at_node(
                        ManifestErrorCode::InvalidValue,
                        format!("frameCount '{value}' must be a positive integer"),
                        file_path,
                        doc,
                        field,
                    ));
                };
                frame_count = Some(parsed);
            }
            _ => {
                return Err(error_at_node(
                    ManifestErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <Sprite>"),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(role) = role else {
        return Err(missing_field(file_path, doc, node, "key"));
    };
    let Some(path) = path else {
        return Err(missing_field(file_path, doc, node, "path"));
    };

    Ok(SpriteDecl {
        role,
        path,
        frame_count: frame_count.unwrap_or(1),
    })
}

fn required_text(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, ManifestError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(error_at_node(
            ManifestErrorCode::MissingField,
            format!("field <{field_name}> must not be empty"),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn missing_field(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> ManifestError {
    error_at_node(
        ManifestErrorCode::MissingField,
        format!("missing required field <{field_name}> in <Sprite>"),
        file_path,
        doc,
        node,
    )
}

fn error_at_node(
    code: ManifestErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> ManifestError {
    let pos = doc.text_pos_at(node.range().start);
    ManifestError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}
