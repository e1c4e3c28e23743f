use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// What kind of file a [`LoadError::MissingAsset`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Tile, object or background image
    Texture,
    /// Background music or walk sound
    Audio,
    /// Behaviour script attached to an object
    Script,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::Texture => "texture",
            AssetKind::Audio => "audio",
            AssetKind::Script => "script",
        };
        f.write_str(name)
    }
}

/// Error type for every level-loading stage.
///
/// Line numbers are 1-based lines of the source file; grid coordinates are
/// zero-based `(row, col)`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The comma-separated reader itself failed (bad UTF-8, I/O mid-read)
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The level manifest is not valid JSON for its schema
    #[error("failed to parse {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A tile definition record has the wrong shape
    #[error("malformed tile record at line {line} of {}: {reason}", .path.display())]
    MalformedTileRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// The same tile identifier was defined twice
    #[error(
        "duplicate tile identifier '{id}' in {} at line {line} (first defined at line {first_line})",
        .path.display()
    )]
    DuplicateTileIdentifier {
        path: PathBuf,
        id: String,
        line: usize,
        first_line: usize,
    },
    /// A grid row is not as long as the first row
    #[error(
        "irregular grid in {}: row {row} has {found} cells, expected {expected}",
        .path.display()
    )]
    IrregularGrid {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The grid has no rows or no columns
    #[error("empty grid in {}", .path.display())]
    EmptyGrid { path: PathBuf },
    /// A grid cell names a tile the registry does not define
    #[error("unknown tile '{id}' at row {row}, col {col}")]
    UnknownTileReference { id: String, row: usize, col: usize },
    /// A referenced file does not exist
    #[error("missing {kind} asset: {}", .path.display())]
    MissingAsset { kind: AssetKind, path: PathBuf },
    /// The world's pixel size does not fit the image limits
    #[error("a {cols}x{rows} grid at tile size {tile_size} is too large to composite")]
    WorldTooLarge {
        cols: usize,
        rows: usize,
        tile_size: u32,
    },
    /// An image is larger than the render backend can upload
    #[error("texture of {width}x{height} pixels exceeds the backend limit")]
    TextureTooLarge { width: u32, height: u32 },
    /// A texture could not be decoded into RGBA8
    #[error("unsupported texture format for {}: {source}", .path.display())]
    UnsupportedTextureFormat {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The level is well-formed on disk but violates a level rule
    #[error("invalid level {}: {reason}", .path.display())]
    InvalidLevel { path: PathBuf, reason: String },
    /// The engine config is not valid JSON for its schema
    #[error("failed to parse engine config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The engine config parsed but holds an unusable value
    #[error("invalid engine config {}: {reason}", .path.display())]
    InvalidConfig { path: PathBuf, reason: String },
    /// No discovered level has this name
    #[error("level '{0}' not found")]
    UnknownLevel(String),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_level(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::InvalidLevel {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_diagnostic_context() {
        let err = LoadError::DuplicateTileIdentifier {
            path: PathBuf::from("tiles.csv"),
            id: "a".into(),
            line: 4,
            first_line: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("'a'"));
        assert!(msg.contains("tiles.csv"));
        assert!(msg.contains("line 4"));

        let err = LoadError::UnknownTileReference {
            id: "z".into(),
            row: 3,
            col: 4,
        };
        assert_eq!(err.to_string(), "unknown tile 'z' at row 3, col 4");
    }

    #[test]
    fn missing_asset_names_its_kind() {
        let err = LoadError::MissingAsset {
            kind: AssetKind::Script,
            path: PathBuf::from("door.lua"),
        };
        assert_eq!(err.to_string(), "missing script asset: door.lua");
    }
}
