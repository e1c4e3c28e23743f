use crate::error::LoadError;
use crate::grid::{GridCoord, MapGrid};
use crate::render::texture::{decode_rgba, scale_to_tile};
use crate::tiles::{TileDefinition, TileRegistry, EMPTY_TILE};
use image::{imageops, Limits, RgbaImage};
use macroquad::math::Vec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// One per-cell draw: top-left pixel and the texture to draw there.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub cell: GridCoord,
    pub position: Vec2,
    pub texture: PathBuf,
}

/// The renderable product of composing a grid.
#[derive(Debug, Clone)]
pub enum WorldSurface {
    /// Whole world pre-baked into one image, empty cells transparent.
    Flat { image: RgbaImage, tile_size: u32 },
    /// Row-major draw commands, one per non-empty cell.
    DrawList {
        commands: Vec<DrawCommand>,
        size: (u32, u32),
        tile_size: u32,
    },
}

impl WorldSurface {
    /// World size in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            WorldSurface::Flat { image, .. } => image.dimensions(),
            WorldSurface::DrawList { size, .. } => *size,
        }
    }

    pub fn tile_size(&self) -> u32 {
        match self {
            WorldSurface::Flat { tile_size, .. } | WorldSurface::DrawList { tile_size, .. } => {
                *tile_size
            }
        }
    }
}

/// Which compositing strategy a level is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeStrategy {
    #[default]
    FlatImage,
    DrawList,
}

impl CompositeStrategy {
    pub fn compositor(self) -> Box<dyn Compositor> {
        match self {
            CompositeStrategy::FlatImage => Box::new(FlatImageCompositor),
            CompositeStrategy::DrawList => Box::new(DrawListCompositor),
        }
    }
}

/// Turns a grid plus registry into a [`WorldSurface`].
pub trait Compositor {
    fn compose(
        &self,
        grid: &MapGrid,
        registry: &TileRegistry,
        tile_size: u32,
    ) -> Result<WorldSurface, LoadError>;
}

/// Resolve every non-empty cell against the registry, in row-major order.
/// Any dangling reference fails the whole grid.
pub fn resolve_cells<'r>(
    grid: &MapGrid,
    registry: &'r TileRegistry,
) -> Result<Vec<(GridCoord, &'r TileDefinition)>, LoadError> {
    let mut out = Vec::with_capacity(grid.rows() * grid.cols());
    for (at, id) in grid.cells() {
        if id == EMPTY_TILE {
            continue;
        }
        let def = registry
            .lookup(id)
            .ok_or_else(|| LoadError::UnknownTileReference {
                id: id.to_owned(),
                row: at.row,
                col: at.col,
            })?;
        out.push((at, def));
    }
    Ok(out)
}

/// World size in pixels, or [`LoadError::WorldTooLarge`] if either side
/// overflows `u32`.
pub fn world_size(grid: &MapGrid, tile_size: u32) -> Result<(u32, u32), LoadError> {
    let span = |cells: usize| u32::try_from(cells).ok()?.checked_mul(tile_size);
    match (span(grid.cols()), span(grid.rows())) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(too_large(grid, tile_size)),
    }
}

fn too_large(grid: &MapGrid, tile_size: u32) -> LoadError {
    LoadError::WorldTooLarge {
        cols: grid.cols(),
        rows: grid.rows(),
        tile_size,
    }
}

/// A baked world stays within the allocation cap `image` applies to decodes.
fn check_flat_alloc(grid: &MapGrid, (w, h): (u32, u32), tile_size: u32) -> Result<(), LoadError> {
    let bytes = (u64::from(w) * u64::from(h)).checked_mul(4);
    let fits = match (bytes, Limits::default().max_alloc) {
        (None, _) => false,
        (Some(b), Some(max)) => b <= max,
        (Some(b), None) => usize::try_from(b).is_ok(),
    };
    if fits {
        Ok(())
    } else {
        Err(too_large(grid, tile_size))
    }
}

/// Bakes the whole world into one image at load time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatImageCompositor;

impl Compositor for FlatImageCompositor {
    fn compose(
        &self,
        grid: &MapGrid,
        registry: &TileRegistry,
        tile_size: u32,
    ) -> Result<WorldSurface, LoadError> {
        let cells = resolve_cells(grid, registry)?;
        let (w, h) = world_size(grid, tile_size)?;
        check_flat_alloc(grid, (w, h), tile_size)?;
        let mut image = RgbaImage::new(w, h);

        // tiles commonly share a texture; decode and scale each once
        let mut scaled: HashMap<&PathBuf, RgbaImage> = HashMap::new();
        for (at, def) in cells {
            if !scaled.contains_key(&def.texture) {
                let tex = decode_rgba(&def.texture)?;
                scaled.insert(&def.texture, scale_to_tile(&tex, tile_size));
            }
            let tile = &scaled[&def.texture];
            imageops::replace(
                &mut image,
                tile,
                at.col as i64 * i64::from(tile_size),
                at.row as i64 * i64::from(tile_size),
            );
        }

        Ok(WorldSurface::Flat { image, tile_size })
    }
}

/// Emits per-cell draw commands instead of baking an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawListCompositor;

impl Compositor for DrawListCompositor {
    fn compose(
        &self,
        grid: &MapGrid,
        registry: &TileRegistry,
        tile_size: u32,
    ) -> Result<WorldSurface, LoadError> {
        let size = world_size(grid, tile_size)?;
        let commands = resolve_cells(grid, registry)?
            .into_iter()
            .map(|(at, def)| DrawCommand {
                cell: at,
                position: at.to_pixel(tile_size),
                texture: def.texture.clone(),
            })
            .collect();

        Ok(WorldSurface::DrawList {
            commands,
            size,
            tile_size,
        })
    }
}
