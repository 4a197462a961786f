//! Command line frontend for the palette sprite core.

pub mod png_export;
pub mod scene_file;
