use crate::config::EngineConfig;
use crate::error::{AssetKind, LoadError};
use crate::grid::{GridCoord, MapGrid};
use crate::loader::manifest::{read_manifest, JsonInteraction, JsonObject, MANIFEST_FILENAME};
use crate::render::compositor::{Compositor, WorldSurface};
use crate::render::texture::decode_rgba;
use crate::tiles::{TileRegistry, EMPTY_TILE};
use image::RgbaImage;
use log::info;
use macroquad::math::Vec2;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// How a non-player object reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Fires when the player touches the object's cell
    OnContact,
    /// Fires when the player presses the interact key nearby
    OnKey,
}

/// What an object is for. The loader only tags it; the engine dispatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRole {
    Player,
    Interactive {
        trigger: Interaction,
        /// Validated to exist; never executed here
        script: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
pub struct LevelObject {
    pub texture: PathBuf,
    pub image: RgbaImage,
    pub spawn: GridCoord,
    pub role: ObjectRole,
}

impl LevelObject {
    pub fn is_player(&self) -> bool {
        matches!(self.role, ObjectRole::Player)
    }

    /// Spawn position in world pixels.
    pub fn spawn_position(&self, tile_size: u32) -> Vec2 {
        self.spawn.to_pixel(tile_size)
    }
}

/// A fully loaded level. Never exists half-built.
#[derive(Debug, Clone)]
pub struct LevelDescriptor {
    pub name: String,
    pub folder: PathBuf,
    pub registry: TileRegistry,
    pub grid: MapGrid,
    pub world_surface: WorldSurface,
    pub objects: Vec<LevelObject>,
    player: usize,
    pub background: Option<(PathBuf, RgbaImage)>,
    pub background_music: Option<PathBuf>,
}

fn require_file(path: PathBuf, kind: AssetKind) -> Result<PathBuf, LoadError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(LoadError::MissingAsset { kind, path })
    }
}

fn coord([x, y]: [usize; 2]) -> GridCoord {
    GridCoord::new(y, x)
}

fn build_object(
    obj: JsonObject,
    index: usize,
    folder: &Path,
    grid: &MapGrid,
    manifest: &Path,
) -> Result<LevelObject, LoadError> {
    let spawn = coord(obj.start);
    if !grid.contains(spawn) {
        return Err(LoadError::invalid_level(
            manifest,
            format!(
                "object {index} spawns at [{}, {}], outside the {}x{} grid",
                obj.start[0],
                obj.start[1],
                grid.cols(),
                grid.rows()
            ),
        ));
    }

    let has_script = obj.script.as_deref().is_some_and(|s| !s.is_empty());
    if obj.interaction == JsonInteraction::Player && has_script {
        return Err(LoadError::invalid_level(
            manifest,
            format!("object {index} is the player and cannot carry a script"),
        ));
    }

    let texture = folder.join(&obj.texture);
    let image = decode_rgba(&texture)?;

    let script = obj
        .script
        .filter(|s| !s.is_empty())
        .map(|s| require_file(folder.join(s), AssetKind::Script))
        .transpose()?;

    let role = match obj.interaction {
        JsonInteraction::Player => ObjectRole::Player,
        JsonInteraction::TriggerZone => ObjectRole::Interactive {
            trigger: Interaction::OnContact,
            script,
        },
        JsonInteraction::KeyPress => ObjectRole::Interactive {
            trigger: Interaction::OnKey,
            script,
        },
    };

    Ok(LevelObject {
        texture,
        image,
        spawn,
        role,
    })
}

/// Every walk sound the registry names must exist, used by the grid or not.
fn check_walk_sounds(registry: &TileRegistry) -> Result<(), LoadError> {
    let mut sounds: Vec<&Path> = registry.iter().filter_map(|t| t.walk_sound.as_deref()).collect();
    sounds.sort_unstable();
    sounds.dedup();
    for sound in sounds {
        require_file(sound.to_path_buf(), AssetKind::Audio)?;
    }
    Ok(())
}

/// Fail early on draw-list textures that would only break at render time.
fn check_surface_textures(surface: &WorldSurface) -> Result<(), LoadError> {
    if let WorldSurface::DrawList { commands, .. } = surface {
        let mut seen = HashSet::new();
        for cmd in commands {
            if seen.insert(&cmd.texture) {
                decode_rgba(&cmd.texture)?;
            }
        }
    }
    Ok(())
}

impl LevelDescriptor {
    /// Load `folder` with the engine's tile size and strategy.
    pub fn load(folder: &Path, config: &EngineConfig) -> Result<Self, LoadError> {
        Self::load_with(folder, config.tile_size, config.compositor().as_ref())
    }

    /// Manifest -> registry -> grid -> compose -> objects. The first error
    /// aborts the whole load.
    pub fn load_with(
        folder: &Path,
        tile_size: u32,
        compositor: &dyn Compositor,
    ) -> Result<Self, LoadError> {
        let manifest_path = folder.join(MANIFEST_FILENAME);
        if tile_size == 0 {
            return Err(LoadError::invalid_level(&manifest_path, "tile size must be at least 1"));
        }
        let manifest = read_manifest(&manifest_path)?;

        let registry = TileRegistry::load(&folder.join(&manifest.tiles))?;
        check_walk_sounds(&registry)?;
        let grid = MapGrid::load(&folder.join(&manifest.map))?;

        let players = manifest
            .objects
            .iter()
            .filter(|o| o.interaction == JsonInteraction::Player)
            .count();
        if players != 1 {
            return Err(LoadError::invalid_level(
                &manifest_path,
                format!("expected exactly one player object, found {players}"),
            ));
        }

        let start = manifest.start.or_else(|| {
            manifest
                .objects
                .iter()
                .find(|o| o.interaction == JsonInteraction::Player)
                .map(|o| o.start)
        });
        let spawn = start.map(coord).unwrap_or_default();
        let grid = grid.with_spawn(spawn).ok_or_else(|| {
            LoadError::invalid_level(
                &manifest_path,
                format!("start [{}, {}] is outside the grid", spawn.col, spawn.row),
            )
        })?;

        let world_surface = compositor.compose(&grid, &registry, tile_size)?;
        check_surface_textures(&world_surface)?;

        let objects = manifest
            .objects
            .into_iter()
            .enumerate()
            .map(|(i, obj)| build_object(obj, i, folder, &grid, &manifest_path))
            .collect::<Result<Vec<_>, _>>()?;
        let player = objects.iter().position(LevelObject::is_player).unwrap_or_default();

        let background = manifest
            .background
            .map(|bg| {
                let path = folder.join(bg);
                decode_rgba(&path).map(|img| (path, img))
            })
            .transpose()?;

        let background_music = manifest
            .background_music
            .map(|m| require_file(folder.join(m), AssetKind::Audio))
            .transpose()?;

        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(
            "loaded level '{}': {}x{} cells, {} tile kinds, {} objects",
            name,
            grid.cols(),
            grid.rows(),
            registry.len(),
            objects.len()
        );

        Ok(Self {
            name,
            folder: folder.to_path_buf(),
            registry,
            grid,
            world_surface,
            objects,
            player,
            background,
            background_music,
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.world_surface.tile_size()
    }

    /// Spawn cell in world pixels.
    pub fn start_position(&self) -> Vec2 {
        self.grid.spawn().to_pixel(self.tile_size())
    }

    pub fn player(&self) -> &LevelObject {
        &self.objects[self.player]
    }

    pub fn interactive_objects(&self) -> impl Iterator<Item = &LevelObject> {
        self.objects.iter().filter(|o| !o.is_player())
    }

    /// World size in pixels.
    pub fn world_size(&self) -> (u32, u32) {
        self.world_surface.size()
    }

    /// Cells outside the grid are solid; empty cells are not.
    pub fn is_solid(&self, at: GridCoord) -> bool {
        match self.grid.get(at) {
            None => true,
            Some(EMPTY_TILE) => false,
            Some(id) => self.registry.lookup(id).is_some_and(|t| t.collision),
        }
    }

    pub fn walk_sound_at(&self, at: GridCoord) -> Option<&Path> {
        let id = self.grid.get(at)?;
        self.registry.lookup(id)?.walk_sound.as_deref()
    }

    /// Grid cell under a world-pixel position.
    pub fn cell_at(&self, position: Vec2) -> Option<GridCoord> {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let ts = self.tile_size() as f32;
        let at = GridCoord::new((position.y / ts) as usize, (position.x / ts) as usize);
        self.grid.contains(at).then_some(at)
    }
}
