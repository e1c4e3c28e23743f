use crate::error::LoadError;
use crate::render::compositor::{CompositeStrategy, Compositor};
use log::LevelFilter;
use macroquad::window::Conf;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_tile_size() -> u32 {
    16
}
fn default_window_width() -> i32 {
    800
}
fn default_window_height() -> i32 {
    600
}
fn default_window_title() -> String {
    "Tilemap World".to_owned()
}
fn default_worlds_dir() -> PathBuf {
    PathBuf::from("worlds")
}
fn default_log_level() -> String {
    "info".to_owned()
}
fn default_camera_speed() -> f32 {
    240.0
}

/// Engine-wide settings passed explicitly into loading and rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default)]
    pub strategy: CompositeStrategy,
    #[serde(default = "default_window_width")]
    pub window_width: i32,
    #[serde(default = "default_window_height")]
    pub window_height: i32,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_worlds_dir")]
    pub worlds_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Camera pan speed in pixels per second
    #[serde(default = "default_camera_speed")]
    pub camera_speed: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            strategy: CompositeStrategy::default(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            window_title: default_window_title(),
            worlds_dir: default_worlds_dir(),
            log_level: default_log_level(),
            camera_speed: default_camera_speed(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let txt = std::fs::read_to_string(path).map_err(|source| LoadError::io(path, source))?;
        Self::from_json(&txt, path)
    }

    pub fn from_json(txt: &str, path: &Path) -> Result<Self, LoadError> {
        let cfg: Self = serde_json::from_str(txt).map_err(|source| LoadError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate(path)?;
        Ok(cfg)
    }

    pub fn validate(&self, path: &Path) -> Result<(), LoadError> {
        if self.tile_size == 0 {
            return Err(LoadError::InvalidConfig {
                path: path.to_path_buf(),
                reason: "tile_size must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn compositor(&self) -> Box<dyn Compositor> {
        self.strategy.compositor()
    }

    /// Unrecognised names fall back to `Info`.
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Window settings for `#[macroquad::main]`.
    pub fn window_conf(&self) -> Conf {
        Conf {
            window_title: self.window_title.clone(),
            window_width: self.window_width,
            window_height: self.window_height,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = EngineConfig::from_json("{}", Path::new("engine.json")).expect("parse");
        assert_eq!(cfg.tile_size, 16);
        assert_eq!(cfg.strategy, CompositeStrategy::FlatImage);
        assert_eq!(cfg.worlds_dir, PathBuf::from("worlds"));
        assert_eq!(cfg.log_filter(), LevelFilter::Info);
    }

    #[test]
    fn reads_strategy_and_sizes() {
        let cfg = EngineConfig::from_json(
            r#"{"tile_size": 32, "strategy": "draw_list", "window_width": 1280, "log_level": "debug"}"#,
            Path::new("engine.json"),
        )
        .expect("parse");
        assert_eq!(cfg.tile_size, 32);
        assert_eq!(cfg.strategy, CompositeStrategy::DrawList);
        assert_eq!(cfg.window_conf().window_width, 1280);
        assert_eq!(cfg.log_filter(), LevelFilter::Debug);
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let err = EngineConfig::from_json(r#"{"tile_size": 0}"#, Path::new("engine.json")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidConfig { .. }));
        assert!(err.to_string().starts_with("invalid engine config engine.json"));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = EngineConfig::from_json(r#"{"strategy": "sideways"}"#, Path::new("engine.json"))
            .unwrap_err();
        assert!(matches!(err, LoadError::ConfigParse { .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = EngineConfig::load(Path::new("/no/such/engine.json")).expect("defaults");
        assert_eq!(cfg.window_height, 600);
    }
}
