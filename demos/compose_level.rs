use anyhow::Context;
use std::path::PathBuf;
use tilemap_world::{EngineConfig, LevelDescriptor, WorldSurface};

// Bake a level folder into a single PNG:
//   cargo run --example compose_level -- worlds/meadow meadow.png
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let folder = PathBuf::from(args.next().context("usage: compose_level <level-folder> [out.png]")?);
    let out = PathBuf::from(args.next().unwrap_or_else(|| "world.png".into()));

    let config = EngineConfig::default();
    let level = LevelDescriptor::load(&folder, &config)
        .with_context(|| format!("Loading level {}", folder.display()))?;

    match &level.world_surface {
        WorldSurface::Flat { image, .. } => {
            image
                .save(&out)
                .with_context(|| format!("Writing {}", out.display()))?;
            println!("wrote {} ({}x{})", out.display(), image.width(), image.height());
        }
        WorldSurface::DrawList { commands, .. } => {
            println!("{} draw commands", commands.len());
        }
    }
    println!("start position: {:?}", level.start_position());
    Ok(())
}
