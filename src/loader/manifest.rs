// src/loader/manifest.rs
use crate::error::LoadError;
use serde::Deserialize;
use std::path::Path;

/// File name every level folder must contain.
pub const MANIFEST_FILENAME: &str = "level.json";

#[derive(Debug, Deserialize)]
pub struct JsonManifest {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub background_music: Option<String>,
    pub tiles: String,
    pub map: String,
    /// `[x, y]` = `[col, row]`
    #[serde(default)]
    pub start: Option<[usize; 2]>,
    #[serde(default)]
    pub objects: Vec<JsonObject>,
}

#[derive(Debug, Deserialize)]
pub struct JsonObject {
    pub texture: String,
    pub interaction: JsonInteraction,
    /// `[x, y]` = `[col, row]`
    pub start: [usize; 2],
    #[serde(default)]
    pub script: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonInteraction {
    Player,
    #[serde(alias = "contact")]
    TriggerZone,
    #[serde(alias = "key")]
    KeyPress,
}

pub fn parse_manifest(txt: &str, path: &Path) -> Result<JsonManifest, LoadError> {
    serde_json::from_str(txt).map_err(|source| LoadError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_manifest(path: &Path) -> Result<JsonManifest, LoadError> {
    let txt = std::fs::read_to_string(path).map_err(|source| LoadError::io(path, source))?;
    parse_manifest(&txt, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let txt = r#"{
          "background": "sky.png",
          "background_music": "theme.ogg",
          "tiles": "tiles.csv",
          "map": "map.csv",
          "start": [1, 2],
          "objects": [
            {"texture": "chick.png", "interaction": "player", "start": [1, 2]},
            {"texture": "sign.png", "interaction": "key_press", "start": [3, 1], "script": "sign.lua"}
          ]
        }"#;
        let m = parse_manifest(txt, Path::new(MANIFEST_FILENAME)).expect("parse");
        assert_eq!(m.background.as_deref(), Some("sky.png"));
        assert_eq!(m.start, Some([1, 2]));
        assert_eq!(m.objects.len(), 2);
        assert_eq!(m.objects[0].interaction, JsonInteraction::Player);
        assert_eq!(m.objects[1].script.as_deref(), Some("sign.lua"));
    }

    #[test]
    fn optional_fields_default() {
        let m = parse_manifest(r#"{"tiles":"t.csv","map":"m.csv"}"#, Path::new("level.json"))
            .expect("parse");
        assert!(m.background.is_none());
        assert!(m.background_music.is_none());
        assert!(m.start.is_none());
        assert!(m.objects.is_empty());
    }

    #[test]
    fn unknown_interaction_is_a_typed_error() {
        let txt = r#"{"tiles":"t.csv","map":"m.csv",
            "objects":[{"texture":"x.png","interaction":"teleport","start":[0,0]}]}"#;
        let err = parse_manifest(txt, Path::new("level.json")).unwrap_err();
        assert!(matches!(err, LoadError::Manifest { .. }));
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let err = read_manifest(Path::new("/no/level.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
