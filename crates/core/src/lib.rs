//! Palette-remapped sprite primitives.
//!
//! Many sprites can share one indexed source image and still show up in
//! different colors: each [`PaletteSprite`](sprite::PaletteSprite) carries its
//! own 16-entry [`PaletteTable`](palette::PaletteTable) that is applied while
//! the image is blitted onto the screen.

pub mod graphics;
pub mod image;
pub mod logging;
pub mod palette;
pub mod scene;
pub mod sprite;

pub mod types {
    use serde::{Deserialize, Serialize};

    use crate::image::Image;
    use crate::palette::IndexedPalette;

    /// Resolved ARGB8888 frame, ready for display or export.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        /// Resolve every palette index of `image` to its ARGB color.
        pub fn from_indexed<I, P>(image: &I, palette: &P) -> Self
        where
            I: Image + ?Sized,
            P: IndexedPalette + ?Sized,
        {
            let width = image.width().max(0);
            let height = image.height().max(0);
            let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
            for y in 0..height {
                match image.row(y) {
                    Some(row) => pixels.extend(row.iter().map(|&c| palette.get_color(c))),
                    None => pixels.extend((0..width).map(|x| palette.get_color(image.get_pixel(x, y)))),
                }
            }
            Self {
                width: width as u32,
                height: height as u32,
                pixels,
            }
        }
    }
}

pub use graphics::draw_palette_mapped_image;
pub use image::{Image, ImageError, IndexedImage};
pub use palette::{IndexedPalette, PaletteTable, RamPalette};
pub use scene::Scene;
pub use sprite::{Camera, Drawable, PaletteSprite, SpriteFlags, SpriteId};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Frame;

    #[test]
    fn test_frame_from_indexed() {
        let image: IndexedImage = ".1\n2f".parse().unwrap();
        let frame = Frame::from_indexed(&image, &RamPalette::arcade());

        assert_eq!(frame.width, 2);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.pixels[0], 0x00000000);
        assert_eq!(frame.pixels[1], 0xFFFFFFFF);
        assert_eq!(frame.pixels[2], 0xFFFF2121);
        assert_eq!(frame.pixels[3], 0xFF000000);
    }

    #[test]
    fn test_frame_unknown_index_is_black() {
        let image = IndexedImage::filled(1, 1, 200);
        let frame = Frame::from_indexed(&image, &RamPalette::arcade());
        assert_eq!(frame.pixels, vec![0xFF000000]);
    }

    #[test]
    fn test_team_colors_end_to_end() {
        let mut scene = Scene::new(4, 1);
        let art: IndexedImage = "22".parse().unwrap();

        scene.create_palette_sprite(art.clone(), None);
        let blue = scene.create_palette_sprite(art, None);
        blue.set_palette_map_color(2, 8);
        blue.set_left(2.0);

        let frame = Frame::from_indexed(scene.render(), &RamPalette::arcade());
        assert_eq!(frame.pixels[0], 0xFFFF2121);
        assert_eq!(frame.pixels[3], 0xFF003FAD);
    }
}
