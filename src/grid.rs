use crate::error::LoadError;
use crate::loader::csv_records::{self, read_records};
use log::debug;
use macroquad::math::{vec2, Vec2};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Zero-based cell position, row 0 = first parsed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Top-left pixel of this cell: `pixel = grid_coordinate * tile_size`.
    #[inline]
    pub fn to_pixel(self, tile_size: u32) -> Vec2 {
        let ts = tile_size as f32;
        vec2(self.col as f32 * ts, self.row as f32 * ts)
    }
}

/// Rectangular, row-major grid of tile identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGrid {
    rows: usize,
    cols: usize,
    cells: Vec<String>,
    spawn: GridCoord,
}

impl MapGrid {
    /// Load a grid from a comma-separated file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = csv_records::open(path)?;
        Self::from_reader(file, path)
    }

    pub fn from_reader<R: Read>(source: R, origin: &Path) -> Result<Self, LoadError> {
        let rows = read_records(source, origin)?
            .into_iter()
            .map(|r| r.fields)
            .collect();
        Self::from_rows(rows, origin)
    }

    /// Build a grid from already-split rows. Identifiers are not checked
    /// here; that happens when the grid is composed against a registry.
    pub fn from_rows(rows: Vec<Vec<String>>, origin: &Path) -> Result<Self, LoadError> {
        let empty = || LoadError::EmptyGrid {
            path: origin.to_path_buf(),
        };
        let cols = rows.first().map(Vec::len).ok_or_else(empty)?;
        if cols == 0 {
            return Err(empty());
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(LoadError::IrregularGrid {
                    path: PathBuf::from(origin),
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
        }

        let height = rows.len();
        let cells: Vec<String> = rows.into_iter().flatten().collect();
        debug!("parsed {}x{} grid from {}", cols, height, origin.display());

        Ok(Self {
            rows: height,
            cols,
            cells,
            spawn: GridCoord::default(),
        })
    }

    /// Set the starting cell; it must lie inside the grid.
    pub fn with_spawn(mut self, spawn: GridCoord) -> Option<Self> {
        if !self.contains(spawn) {
            return None;
        }
        self.spawn = spawn;
        Some(self)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn spawn(&self) -> GridCoord {
        self.spawn
    }

    #[inline]
    pub fn contains(&self, at: GridCoord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    pub fn get(&self, at: GridCoord) -> Option<&str> {
        if !self.contains(at) {
            return None;
        }
        self.cells.get(at.row * self.cols + at.col).map(String::as_str)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, &str)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, id)| (GridCoord::new(idx / cols, idx % cols), id.as_str()))
    }
}
