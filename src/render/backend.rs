use crate::error::LoadError;
use crate::render::compositor::WorldSurface;
use crate::render::cull::visible_commands;
use crate::render::texture::decode_rgba;
use image::RgbaImage;
use log::debug;
use macroquad::color::WHITE;
use macroquad::math::Vec2;
use macroquad::texture::{draw_texture, FilterMode, Texture2D};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The drawing surface the engine renders through.
pub trait RenderBackend {
    type Handle: Copy;

    /// Upload an RGBA8 image, returning a handle for [`RenderBackend::draw`].
    fn upload(&mut self, image: &RgbaImage) -> Result<Self::Handle, LoadError>;

    /// Free an uploaded texture. The handle must not be drawn afterwards.
    fn release(&mut self, handle: Self::Handle);

    /// Draw a texture with its top-left corner at `position` (world pixels).
    fn draw(&mut self, handle: Self::Handle, position: Vec2);
}

/// Registers textures with a backend once per path.
pub struct TextureCache<B: RenderBackend> {
    backend: B,
    handles: HashMap<PathBuf, B::Handle>,
}

impl<B: RenderBackend> TextureCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: HashMap::new(),
        }
    }

    /// Decode and upload `path`. Registering a path twice returns the
    /// first handle without touching the file or the backend again.
    pub fn register_texture(&mut self, path: &Path) -> Result<B::Handle, LoadError> {
        if let Some(handle) = self.handles.get(path) {
            return Ok(*handle);
        }
        let image = decode_rgba(path)?;
        let handle = self.backend.upload(&image)?;
        debug!("registered texture {}", path.display());
        self.handles.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    /// Register an in-memory image under `key`, once. A key already present
    /// keeps its first image.
    pub fn register_image(
        &mut self,
        key: &Path,
        image: &RgbaImage,
    ) -> Result<B::Handle, LoadError> {
        if let Some(handle) = self.handles.get(key) {
            return Ok(*handle);
        }
        let handle = self.backend.upload(image)?;
        self.handles.insert(key.to_path_buf(), handle);
        Ok(handle)
    }

    /// Upload `image` under `key`, releasing whatever was there before. On
    /// error the previous entry is kept.
    pub fn replace_image(
        &mut self,
        key: &Path,
        image: &RgbaImage,
    ) -> Result<B::Handle, LoadError> {
        let handle = self.backend.upload(image)?;
        if let Some(old) = self.handles.insert(key.to_path_buf(), handle) {
            self.backend.release(old);
        }
        Ok(handle)
    }

    pub fn get(&self, path: &Path) -> Option<B::Handle> {
        self.handles.get(path).copied()
    }

    pub fn draw(&mut self, handle: B::Handle, position: Vec2) {
        self.backend.draw(handle, position);
    }

    /// Release every texture, e.g. after a level transition.
    pub fn clear(&mut self) {
        for (_, handle) in self.handles.drain() {
            self.backend.release(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Key under which the current flat world image is cached.
pub const WORLD_IMAGE_KEY: &str = "<composited world>";

/// Register every texture a surface needs. Call once after a level loads.
///
/// A flat surface replaces the cached world image, so the cache always
/// holds the world most recently prepared.
pub fn prepare_surface<B: RenderBackend>(
    cache: &mut TextureCache<B>,
    surface: &WorldSurface,
) -> Result<(), LoadError> {
    match surface {
        WorldSurface::Flat { image, .. } => {
            cache.replace_image(Path::new(WORLD_IMAGE_KEY), image)?;
        }
        WorldSurface::DrawList { commands, .. } => {
            for cmd in commands {
                cache.register_texture(&cmd.texture)?;
            }
        }
    }
    Ok(())
}

/// Draw the part of `surface` visible in `view_min..view_max`.
///
/// Textures must have been registered with [`prepare_surface`]; unknown
/// ones are skipped.
pub fn draw_surface<B: RenderBackend>(
    cache: &mut TextureCache<B>,
    surface: &WorldSurface,
    view_min: Vec2,
    view_max: Vec2,
) {
    match surface {
        WorldSurface::Flat { .. } => {
            if let Some(h) = cache.get(Path::new(WORLD_IMAGE_KEY)) {
                cache.draw(h, Vec2::ZERO);
            }
        }
        WorldSurface::DrawList {
            commands,
            tile_size,
            ..
        } => {
            for cmd in visible_commands(commands, view_min, view_max, *tile_size) {
                if let Some(h) = cache.get(&cmd.texture) {
                    cache.draw(h, cmd.position);
                }
            }
        }
    }
}

/// [`RenderBackend`] on top of macroquad. Needs a live window.
///
/// Released slots are reused by later uploads.
#[derive(Default)]
pub struct MacroquadBackend {
    textures: Vec<Option<Texture2D>>,
}

impl MacroquadBackend {
    /// Number of textures currently held on the GPU.
    pub fn live_textures(&self) -> usize {
        self.textures.iter().flatten().count()
    }
}

impl RenderBackend for MacroquadBackend {
    type Handle = usize;

    fn upload(&mut self, image: &RgbaImage) -> Result<usize, LoadError> {
        let (width, height) = image.dimensions();
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(LoadError::TextureTooLarge { width, height });
        };
        let tex = Texture2D::from_rgba8(w, h, image.as_raw());
        tex.set_filter(FilterMode::Nearest);

        if let Some(slot) = self.textures.iter().position(Option::is_none) {
            self.textures[slot] = Some(tex);
            return Ok(slot);
        }
        self.textures.push(Some(tex));
        Ok(self.textures.len() - 1)
    }

    fn release(&mut self, handle: usize) {
        // dropping the last Texture2D frees the GPU texture
        if let Some(slot) = self.textures.get_mut(handle) {
            *slot = None;
        }
    }

    fn draw(&mut self, handle: usize, position: Vec2) {
        if let Some(Some(tex)) = self.textures.get(handle) {
            draw_texture(tex, position.x, position.y, WHITE);
        }
    }
}
