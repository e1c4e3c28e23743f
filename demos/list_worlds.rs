use anyhow::Context;
use std::path::PathBuf;
use tilemap_world::{EngineConfig, LevelDescriptor, WorldCatalog};

// Try to load every level under a worlds directory and report the result.
fn main() -> anyhow::Result<()> {
    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "worlds".into()));
    let config = EngineConfig {
        strategy: tilemap_world::CompositeStrategy::DrawList,
        ..EngineConfig::default()
    };

    let catalog = WorldCatalog::discover(&dir).with_context(|| format!("Scanning {}", dir.display()))?;
    for name in catalog.names() {
        let Some(folder) = catalog.get(name) else { continue };
        match LevelDescriptor::load(folder, &config) {
            Ok(level) => {
                let (w, h) = level.world_size();
                println!("{name}: ok, {w}x{h} px, {} objects", level.objects.len());
            }
            Err(e) => println!("{name}: {e}"),
        }
    }
    Ok(())
}
