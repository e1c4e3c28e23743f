// tests/integration_example.rs

use std::path::PathBuf;
use tilemap_world::{EngineConfig, LevelDescriptor, WorldCatalog};

#[test]
fn example_world_loads() {
    let mut worlds = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    worlds.push("worlds");

    let catalog = WorldCatalog::discover(&worlds).expect("Example worlds should be found");
    let meadow = catalog.get("meadow").expect("meadow level");
    let level = LevelDescriptor::load(meadow, &EngineConfig::default())
        .expect("Example level should load");

    assert_eq!(level.world_size(), (24 * 16, 16 * 16));
    assert_eq!(level.objects.len(), 2);
}
