use crate::config::EngineConfig;
use crate::error::LoadError;
use crate::level::LevelDescriptor;
use crate::loader::manifest::MANIFEST_FILENAME;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Level folders found under a worlds directory, keyed by folder name.
#[derive(Debug, Clone, Default)]
pub struct WorldCatalog {
    levels: BTreeMap<String, PathBuf>,
}

impl WorldCatalog {
    /// Every sub-folder of `worlds_dir` holding a level manifest.
    pub fn discover(worlds_dir: &Path) -> Result<Self, LoadError> {
        let entries =
            std::fs::read_dir(worlds_dir).map_err(|source| LoadError::io(worlds_dir, source))?;

        let mut levels = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::io(worlds_dir, source))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if !path.join(MANIFEST_FILENAME).is_file() {
                warn!("skipping {}: no {}", path.display(), MANIFEST_FILENAME);
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            levels.insert(name, path);
        }

        info!("found {} levels in {}", levels.len(), worlds_dir.display());
        Ok(Self { levels })
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.levels.get(name).map(PathBuf::as_path)
    }

    /// Level names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.names().next()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Owns the active level. Transitions are all-or-nothing.
pub struct LevelSession {
    config: EngineConfig,
    catalog: WorldCatalog,
    current: Option<LevelDescriptor>,
}

impl LevelSession {
    pub fn new(config: EngineConfig, catalog: WorldCatalog) -> Self {
        Self {
            config,
            catalog,
            current: None,
        }
    }

    /// Discover levels under `config.worlds_dir`.
    pub fn open(config: EngineConfig) -> Result<Self, LoadError> {
        let catalog = WorldCatalog::discover(&config.worlds_dir)?;
        Ok(Self::new(config, catalog))
    }

    /// Load `name` and make it current. On error the previous level stays
    /// active and untouched.
    pub fn change_level(&mut self, name: &str) -> Result<&LevelDescriptor, LoadError> {
        let folder = self
            .catalog
            .get(name)
            .ok_or_else(|| LoadError::UnknownLevel(name.to_owned()))?;
        let level = LevelDescriptor::load(folder, &self.config)?;
        info!("switched to level '{}'", name);
        Ok(self.current.insert(level))
    }

    pub fn current(&self) -> Option<&LevelDescriptor> {
        self.current.as_ref()
    }

    pub fn catalog(&self) -> &WorldCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn write_level(root: &Path, name: &str, map: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).expect("mkdir");
        RgbaImage::from_pixel(2, 2, Rgba([0, 128, 0, 255]))
            .save(dir.join("grass.png"))
            .expect("png");
        fs::write(dir.join("tiles.csv"), "grass,grass.png,,false\n").expect("tiles");
        fs::write(dir.join("map.csv"), map).expect("map");
        fs::write(
            dir.join(MANIFEST_FILENAME),
            r#"{"tiles":"tiles.csv","map":"map.csv",
                "objects":[{"texture":"grass.png","interaction":"player","start":[0,0]}]}"#,
        )
        .expect("manifest");
    }

    #[test]
    fn discovers_only_folders_with_manifest() {
        let root = tempfile::tempdir().expect("tempdir");
        write_level(root.path(), "b_level", "grass\n");
        write_level(root.path(), "a_level", "grass\n");
        fs::create_dir_all(root.path().join("notes")).expect("mkdir");
        fs::write(root.path().join("readme.txt"), "hi").expect("file");

        let catalog = WorldCatalog::discover(root.path()).expect("discover");
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a_level", "b_level"]);
        assert_eq!(catalog.first(), Some("a_level"));
        assert!(catalog.get("notes").is_none());
    }

    #[test]
    fn missing_worlds_dir_is_io_error() {
        let err = WorldCatalog::discover(Path::new("/no/worlds/here")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn failed_transition_keeps_previous_level() {
        let root = tempfile::tempdir().expect("tempdir");
        write_level(root.path(), "good", "grass,grass\n");
        write_level(root.path(), "broken", "grass,grass\ngrass\n");

        let config = EngineConfig {
            worlds_dir: root.path().to_path_buf(),
            ..EngineConfig::default()
        };
        let mut session = LevelSession::open(config).expect("open");

        session.change_level("good").expect("good loads");
        let err = session.change_level("broken").unwrap_err();
        assert!(matches!(err, LoadError::IrregularGrid { .. }));
        assert_eq!(session.current().map(|l| l.name.as_str()), Some("good"));

        let err = session.change_level("missing").unwrap_err();
        assert!(matches!(err, LoadError::UnknownLevel(_)));
        assert_eq!(session.current().map(|l| l.name.as_str()), Some("good"));
    }
}
