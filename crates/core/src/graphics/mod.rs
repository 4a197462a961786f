//! Drawing routines shared by every sprite variant.

pub mod blit;
pub mod color;

pub use blit::draw_palette_mapped_image;
pub use color::ColorOps;
