//! Index to ARGB color resolution.
//!
//! Sprites and the screen only ever hold palette indices. Colors are looked up
//! once, when a rendered screen is turned into a frame for display or export.

use crate::graphics::ColorOps;

/// Color returned for indices the palette does not define.
pub const FALLBACK_COLOR: u32 = 0xFF000000;

/// Palette that maps color indices to ARGB values (0xAARRGGBB).
pub trait IndexedPalette {
    /// Get the ARGB color for a palette index.
    fn get_color(&self, index: i32) -> u32;

    /// Set the ARGB color for a palette index.
    fn set_color(&mut self, index: i32, color: u32);

    /// Number of colors in this palette.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAM-backed palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamPalette {
    colors: Vec<u32>,
}

impl RamPalette {
    /// Create a palette of `size` opaque black entries.
    pub fn new(size: usize) -> Self {
        Self {
            colors: vec![FALLBACK_COLOR; size],
        }
    }

    pub fn from_colors(colors: Vec<u32>) -> Self {
        Self { colors }
    }

    /// The host engine's default 16-color palette.
    ///
    /// Index 0 is the transparency key and is stored as fully transparent.
    pub fn arcade() -> Self {
        Self::from_colors(vec![
            0x00000000,
            ColorOps::from_rgb(0xFF, 0xFF, 0xFF),
            ColorOps::from_rgb(0xFF, 0x21, 0x21),
            ColorOps::from_rgb(0xFF, 0x93, 0xC4),
            ColorOps::from_rgb(0xFF, 0x81, 0x35),
            ColorOps::from_rgb(0xFF, 0xF6, 0x09),
            ColorOps::from_rgb(0x24, 0x9C, 0xA3),
            ColorOps::from_rgb(0x78, 0xDC, 0x52),
            ColorOps::from_rgb(0x00, 0x3F, 0xAD),
            ColorOps::from_rgb(0x87, 0xF2, 0xFF),
            ColorOps::from_rgb(0x8E, 0x2E, 0xC4),
            ColorOps::from_rgb(0xA4, 0x83, 0x9F),
            ColorOps::from_rgb(0x5C, 0x40, 0x6C),
            ColorOps::from_rgb(0xE5, 0xCD, 0xC4),
            ColorOps::from_rgb(0x91, 0x46, 0x3D),
            ColorOps::from_rgb(0x00, 0x00, 0x00),
        ])
    }
}

impl Default for RamPalette {
    fn default() -> Self {
        Self::arcade()
    }
}

impl IndexedPalette for RamPalette {
    fn get_color(&self, index: i32) -> u32 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i))
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    }

    fn set_color(&mut self, index: i32, color: u32) {
        if let Some(slot) = usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get_mut(i))
        {
            *slot = color;
        }
    }

    fn len(&self) -> usize {
        self.colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arcade_palette() {
        let palette = RamPalette::arcade();
        assert_eq!(palette.len(), 16);
        assert_eq!(ColorOps::alpha(palette.get_color(0)), 0, "Index 0 is transparent");
        assert_eq!(palette.get_color(1), 0xFFFFFFFF);
        assert_eq!(palette.get_color(15), 0xFF000000);
    }

    #[test]
    fn test_new_palette_is_black() {
        let palette = RamPalette::new(4);
        assert!(!palette.is_empty());
        for i in 0..4 {
            assert_eq!(palette.get_color(i), FALLBACK_COLOR);
        }
    }

    #[test]
    fn test_unknown_index_falls_back() {
        let palette = RamPalette::arcade();
        assert_eq!(palette.get_color(200), FALLBACK_COLOR);
        assert_eq!(palette.get_color(-1), FALLBACK_COLOR);
    }

    #[test]
    fn test_set_color() {
        let mut palette = RamPalette::new(2);
        palette.set_color(1, 0xFF00FF00);
        assert_eq!(palette.get_color(1), 0xFF00FF00);

        // Out of range writes are dropped
        palette.set_color(5, 0xFFFF0000);
        palette.set_color(-1, 0xFFFF0000);
        assert_eq!(palette.len(), 2);
    }
}
