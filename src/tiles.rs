use crate::error::LoadError;
use crate::loader::csv_records::{self, read_records};
use log::debug;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Grid token meaning "no tile here": nothing drawn, no collision.
pub const EMPTY_TILE: &str = "none";

/// Metadata for one tile kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDefinition {
    pub id: String,
    /// Texture path, resolved against the definitions file's folder
    pub texture: PathBuf,
    pub walk_sound: Option<PathBuf>,
    pub collision: bool,
}

/// Tile identifier -> [`TileDefinition`].
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: HashMap<String, TileDefinition>,
}

fn parse_collision(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl TileRegistry {
    /// Load tile definitions from a file. Texture and sound paths are
    /// resolved relative to the file's folder.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = csv_records::open(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_reader(file, path, base)
    }

    /// Parse `identifier, texture, walk_sound, collision` records.
    ///
    /// Fails on the first bad record; a partial registry is never returned.
    pub fn from_reader<R: Read>(source: R, origin: &Path, base_dir: &Path) -> Result<Self, LoadError> {
        let mut tiles = HashMap::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for rec in read_records(source, origin)? {
            let malformed = |reason: String| LoadError::MalformedTileRecord {
                path: origin.to_path_buf(),
                line: rec.line,
                reason,
            };

            let [id, texture, sound, collision] = rec.fields.as_slice() else {
                return Err(malformed(format!(
                    "expected 4 fields, found {}",
                    rec.fields.len()
                )));
            };

            if id.is_empty() {
                return Err(malformed("empty tile identifier".into()));
            }
            if id == EMPTY_TILE {
                return Err(malformed(format!("'{EMPTY_TILE}' is reserved for empty cells")));
            }
            if texture.is_empty() {
                return Err(malformed(format!("tile '{id}' has no texture")));
            }
            let collision = parse_collision(collision).ok_or_else(|| {
                malformed(format!(
                    "collision flag must be true or false, got '{collision}'"
                ))
            })?;

            if let Some(&first_line) = first_seen.get(id) {
                return Err(LoadError::DuplicateTileIdentifier {
                    path: origin.to_path_buf(),
                    id: id.clone(),
                    line: rec.line,
                    first_line,
                });
            }
            first_seen.insert(id.clone(), rec.line);

            tiles.insert(
                id.clone(),
                TileDefinition {
                    id: id.clone(),
                    texture: base_dir.join(texture),
                    walk_sound: (!sound.is_empty()).then(|| base_dir.join(sound)),
                    collision,
                },
            );
        }

        debug!("loaded {} tile definitions from {}", tiles.len(), origin.display());
        Ok(Self { tiles })
    }

    /// `None` for [`EMPTY_TILE`] and for identifiers this registry does
    /// not define; the compositor tells the two apart.
    pub fn lookup(&self, id: &str) -> Option<&TileDefinition> {
        if id == EMPTY_TILE {
            return None;
        }
        self.tiles.get(id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileDefinition> {
        self.tiles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<TileRegistry, LoadError> {
        TileRegistry::from_reader(src.as_bytes(), Path::new("tiles.csv"), Path::new("lvl"))
    }

    #[test]
    fn parses_records_and_resolves_paths() {
        let reg = parse("grass,grass.png,step.wav,false\nwall,wall.png,,TRUE\n").expect("load");
        assert_eq!(reg.len(), 2);

        let grass = reg.lookup("grass").expect("grass");
        assert_eq!(grass.texture, Path::new("lvl").join("grass.png"));
        assert_eq!(grass.walk_sound, Some(Path::new("lvl").join("step.wav")));
        assert!(!grass.collision);

        let wall = reg.lookup("wall").expect("wall");
        assert_eq!(wall.walk_sound, None);
        assert!(wall.collision);
    }

    #[test]
    fn duplicate_identifier_fails_whole_load() {
        let err = parse("a,x.gif,,false\na,y.gif,,true\n").unwrap_err();
        match err {
            LoadError::DuplicateTileIdentifier {
                id,
                line,
                first_line,
                ..
            } => {
                assert_eq!(id, "a");
                assert_eq!(line, 2);
                assert_eq!(first_line, 1);
            }
            other => panic!("expected DuplicateTileIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn errors_cite_file_lines_past_blank_lines() {
        let err = parse("a,x.gif,,false\n\n\nb,y.gif,,false\na,z.gif,,true\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::DuplicateTileIdentifier {
                line: 5,
                first_line: 1,
                ..
            }
        ));

        let err = parse("\na,x.gif,,false\n\nb,y.gif\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedTileRecord { line: 4, .. }));
    }

    #[test]
    fn bad_collision_flag_is_malformed() {
        let err = parse("a,x.gif,,maybe\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedTileRecord { line: 1, .. }));
    }

    #[test]
    fn missing_collision_field_is_malformed() {
        let err = parse("a,x.gif,\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedTileRecord { .. }));

        let err = parse("a,x.gif\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedTileRecord { .. }));
    }

    #[test]
    fn sentinel_cannot_be_defined() {
        let err = parse("none,x.gif,,false\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedTileRecord { .. }));
    }

    #[test]
    fn sentinel_resolves_to_nothing() {
        let reg = parse("a,x.gif,,false\n").expect("load");
        assert!(reg.lookup(EMPTY_TILE).is_none());
        assert!(reg.lookup("a").is_some());
    }
}
