pub mod backend;
pub mod compositor;
pub mod cull;
pub mod texture;
