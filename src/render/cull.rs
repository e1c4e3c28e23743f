use crate::render::compositor::DrawCommand;
use macroquad::math::Vec2;

const CULL_MARGIN_TILES: i64 = 1;

/// Inclusive cell range covered by a view rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub row_min: i64,
    pub row_max: i64,
    pub col_min: i64,
    pub col_max: i64,
}

impl CellRange {
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (r, c) = (row as i64, col as i64);
        r >= self.row_min && r <= self.row_max && c >= self.col_min && c <= self.col_max
    }
}

/// Cells touched by `view_min..view_max`, padded by one tile each side.
pub fn visible_cell_range(view_min: Vec2, view_max: Vec2, tile_size: u32) -> CellRange {
    let ts = tile_size.max(1) as i64;
    let mut cx_min = (view_min.x.floor() as i64).div_euclid(ts);
    let mut cy_min = (view_min.y.floor() as i64).div_euclid(ts);
    let mut cx_max = (view_max.x.floor() as i64).div_euclid(ts);
    let mut cy_max = (view_max.y.floor() as i64).div_euclid(ts);

    if cx_min > cx_max {
        std::mem::swap(&mut cx_min, &mut cx_max);
    }
    if cy_min > cy_max {
        std::mem::swap(&mut cy_min, &mut cy_max);
    }

    CellRange {
        row_min: cy_min - CULL_MARGIN_TILES,
        row_max: cy_max + CULL_MARGIN_TILES,
        col_min: cx_min - CULL_MARGIN_TILES,
        col_max: cx_max + CULL_MARGIN_TILES,
    }
}

/// Draw commands inside the padded view, keeping row-major order.
pub fn visible_commands<'a>(
    commands: &'a [DrawCommand],
    view_min: Vec2,
    view_max: Vec2,
    tile_size: u32,
) -> impl Iterator<Item = &'a DrawCommand> + 'a {
    let range = visible_cell_range(view_min, view_max, tile_size);
    commands
        .iter()
        .filter(move |c| range.contains(c.cell.row, c.cell.col))
}
