//! Palette handling for indexed sprites.
//!
//! Two separate concerns live here:
//!
//! - [`PaletteTable`]: the per-sprite index remap applied at draw time
//! - [`IndexedPalette`]: index to ARGB resolution, used only when a finished
//!   screen is turned into a [`Frame`](crate::types::Frame)

pub mod colors;
pub mod table;

pub use colors::{IndexedPalette, RamPalette};
pub use table::{PaletteTable, PALETTE_SIZE, TRANSPARENT_INDEX};
