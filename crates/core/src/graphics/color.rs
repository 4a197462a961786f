//! ARGB color helpers.
//!
//! Colors are in ARGB8888 format (0xAARRGGBB).

/// Color operation utilities
pub struct ColorOps;

impl ColorOps {
    /// Extract red channel from ARGB color
    #[inline]
    pub fn red(color: u32) -> u8 {
        ((color >> 16) & 0xFF) as u8
    }

    /// Extract green channel from ARGB color
    #[inline]
    pub fn green(color: u32) -> u8 {
        ((color >> 8) & 0xFF) as u8
    }

    /// Extract blue channel from ARGB color
    #[inline]
    pub fn blue(color: u32) -> u8 {
        (color & 0xFF) as u8
    }

    /// Extract alpha channel from ARGB color
    #[inline]
    pub fn alpha(color: u32) -> u8 {
        ((color >> 24) & 0xFF) as u8
    }

    /// Construct RGB color with full alpha
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
        0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Split an ARGB color into RGBA bytes, the layout image encoders expect.
    #[inline]
    pub fn to_rgba(color: u32) -> [u8; 4] {
        [
            Self::red(color),
            Self::green(color),
            Self::blue(color),
            Self::alpha(color),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_component_extraction() {
        let color = 0xAABBCCDD; // A=0xAA, R=0xBB, G=0xCC, B=0xDD

        assert_eq!(ColorOps::alpha(color), 0xAA);
        assert_eq!(ColorOps::red(color), 0xBB);
        assert_eq!(ColorOps::green(color), 0xCC);
        assert_eq!(ColorOps::blue(color), 0xDD);
    }

    #[test]
    fn test_color_from_rgb() {
        let color = ColorOps::from_rgb(0xBB, 0xCC, 0xDD);
        assert_eq!(color, 0xFFBBCCDD); // Full alpha
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(ColorOps::to_rgba(0x80FF2010), [0xFF, 0x20, 0x10, 0x80]);
    }
}
