#![warn(missing_docs)]

//! CSV tile-map level loader and world compositor for Macroquad.
//!
//! A level folder holds a `level.json` manifest, a tile-definitions CSV and
//! a map-grid CSV. [`LevelDescriptor::load`] turns it into a
//! [`WorldSurface`] (one baked image or a per-cell draw list) plus the
//! level's objects, or fails with a [`LoadError`] naming the offending
//! file, record and identifier.

mod camera;
mod config;
mod error;
mod grid;
mod level;
mod loader {
    pub mod csv_records;
    pub mod manifest;
}
mod render;
mod tiles;
mod world;

pub use camera::Camera;
pub use config::EngineConfig;
pub use error::{AssetKind, LoadError};
pub use grid::{GridCoord, MapGrid};
pub use level::{Interaction, LevelDescriptor, LevelObject, ObjectRole};
pub use loader::manifest::MANIFEST_FILENAME;
pub use render::backend::{
    draw_surface, prepare_surface, MacroquadBackend, RenderBackend, TextureCache,
};
pub use render::compositor::{
    resolve_cells, CompositeStrategy, Compositor, DrawCommand, DrawListCompositor,
    FlatImageCompositor, WorldSurface,
};
pub use render::cull::{visible_cell_range, visible_commands, CellRange};
pub use tiles::{TileDefinition, TileRegistry, EMPTY_TILE};
pub use world::{LevelSession, WorldCatalog};
