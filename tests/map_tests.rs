// tests/map_tests.rs

use image::{Rgba, RgbaImage};
use std::path::Path;
use tilemap_world::{
    Compositor, DrawListCompositor, FlatImageCompositor, LoadError, MapGrid, TileRegistry,
    WorldSurface,
};

const TILES: &str = "a,x.gif,,false\na,y.gif,,true\n";

#[test]
fn error_on_duplicate_tile_identifier() {
    let err = TileRegistry::from_reader(TILES.as_bytes(), Path::new("tiles.csv"), Path::new("."))
        .unwrap_err();
    assert!(matches!(err, LoadError::DuplicateTileIdentifier { ref id, .. } if id == "a"));
}

#[test]
fn error_on_irregular_grid() {
    let err = MapGrid::from_reader("a,b\na\n".as_bytes(), Path::new("map.csv")).unwrap_err();
    assert!(matches!(err, LoadError::IrregularGrid { .. }));
}

#[test]
fn flat_image_is_cols_by_rows_tiles() {
    let dir = tempfile::tempdir().unwrap();
    RgbaImage::from_pixel(3, 5, Rgba([1, 1, 1, 255]))
        .save(dir.path().join("t.png"))
        .unwrap();
    let registry = TileRegistry::from_reader(
        "t,t.png,,false\n".as_bytes(),
        Path::new("tiles.csv"),
        dir.path(),
    )
    .unwrap();

    for (rows, cols, tile) in [(1, 1, 8), (2, 5, 16), (4, 3, 10)] {
        let src = vec![vec!["t"; cols].join(","); rows].join("\n");
        let grid = MapGrid::from_reader(src.as_bytes(), Path::new("map.csv")).unwrap();
        let surface = FlatImageCompositor.compose(&grid, &registry, tile).unwrap();
        assert_eq!(surface.size(), (cols as u32 * tile, rows as u32 * tile));
    }
}

#[test]
fn draw_list_positions_are_cell_times_tile_size() {
    let registry = TileRegistry::from_reader(
        "a,a.png,,false\n".as_bytes(),
        Path::new("tiles.csv"),
        Path::new("."),
    )
    .unwrap();
    let grid = MapGrid::from_reader("none,a\na,none\n".as_bytes(), Path::new("map.csv")).unwrap();

    let surface = DrawListCompositor.compose(&grid, &registry, 24).unwrap();
    let WorldSurface::DrawList { commands, .. } = surface else {
        panic!("expected draw list");
    };
    let positions: Vec<(f32, f32)> = commands.iter().map(|c| (c.position.x, c.position.y)).collect();
    assert_eq!(positions, vec![(24.0, 0.0), (0.0, 24.0)]);
}
