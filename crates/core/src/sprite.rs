//! Sprites drawn through a palette remap.
//!
//! A [`PaletteSprite`] shares its source image with any number of other
//! sprites and only differs in its [`PaletteTable`], which is how team colors
//! and similar variants are made without duplicating image data.
//!
//! The host render loop works against the [`Drawable`] trait so palette
//! sprites can sit in the same draw list as any other sprite variant.

use bitflags::bitflags;

use crate::graphics::draw_palette_mapped_image;
use crate::image::{Image, IndexedImage};
use crate::logging::{log, LogCategory, LogLevel};
use crate::palette::PaletteTable;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpriteFlags: u32 {
        /// Not drawn at all
        const INVISIBLE = 0b0000_0001;
        /// Position is in screen space; the camera offset is ignored
        const RELATIVE_TO_CAMERA = 0b0000_0010;
    }
}

/// Camera position used to turn world coordinates into screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub draw_offset_x: f64,
    pub draw_offset_y: f64,
}

impl Camera {
    pub fn new(draw_offset_x: f64, draw_offset_y: f64) -> Self {
        Self {
            draw_offset_x,
            draw_offset_y,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.draw_offset_x = x;
        self.draw_offset_y = y;
    }
}

/// Something the host render loop can draw once per frame.
pub trait Drawable {
    /// Draw onto `screen` as seen through `camera`.
    fn draw(&self, camera: &Camera, screen: &mut dyn Image);

    /// Draw order; lower values are drawn first.
    fn z(&self) -> i32 {
        0
    }

    fn is_visible(&self) -> bool {
        true
    }
}

/// Identifier assigned by the scene that owns the sprite.
pub type SpriteId = u32;

/// Sprite whose pixels are remapped through its own palette table when drawn.
#[derive(Debug, Clone)]
pub struct PaletteSprite {
    id: SpriteId,
    image: IndexedImage,
    palette: PaletteTable,
    left: f64,
    top: f64,
    z: i32,
    flags: SpriteFlags,
    kind: Option<i32>,
}

impl PaletteSprite {
    /// Create a sprite at the origin with an identity palette map.
    pub fn new(image: IndexedImage) -> Self {
        Self {
            id: 0,
            image,
            palette: PaletteTable::new(),
            left: 0.0,
            top: 0.0,
            z: 0,
            flags: SpriteFlags::empty(),
            kind: None,
        }
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: SpriteId) {
        self.id = id;
    }

    /// Replace the whole palette map. See [`PaletteTable::replace`].
    pub fn set_palette_map(&mut self, mapping: &[i32]) {
        self.palette.replace(mapping);
    }

    /// Remap one color. Ignored unless both indices are in 1–15.
    pub fn set_palette_map_color(&mut self, src: i32, dst: i32) {
        self.palette.set_entry(src, dst);
    }

    pub fn palette_map(&self) -> &PaletteTable {
        &self.palette
    }

    pub fn image(&self) -> &IndexedImage {
        &self.image
    }

    pub fn set_image(&mut self, image: IndexedImage) {
        self.image = image;
    }

    pub fn width(&self) -> f64 {
        self.image.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.image.height() as f64
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.left + self.width()
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height()
    }

    pub fn set_left(&mut self, left: f64) {
        self.left = left;
    }

    pub fn set_top(&mut self, top: f64) {
        self.top = top;
    }

    /// Horizontal center.
    pub fn x(&self) -> f64 {
        self.left + self.width() / 2.0
    }

    /// Vertical center.
    pub fn y(&self) -> f64 {
        self.top + self.height() / 2.0
    }

    /// Move the sprite so its center is at (x, y).
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.left = x - self.width() / 2.0;
        self.top = y - self.height() / 2.0;
    }

    pub fn set_z(&mut self, z: i32) {
        self.z = z;
    }

    pub fn kind(&self) -> Option<i32> {
        self.kind
    }

    pub fn set_kind(&mut self, kind: Option<i32>) {
        self.kind = kind;
    }

    pub fn flags(&self) -> SpriteFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: SpriteFlags, on: bool) {
        self.flags.set(flag, on);
    }

    fn draw_offset(&self, camera: &Camera) -> (f64, f64) {
        if self.flags.contains(SpriteFlags::RELATIVE_TO_CAMERA) {
            (0.0, 0.0)
        } else {
            (camera.draw_offset_x, camera.draw_offset_y)
        }
    }

    /// True when no part of the sprite can land on a `screen_width` x
    /// `screen_height` screen.
    pub fn is_out_of_screen(&self, camera: &Camera, screen_width: i32, screen_height: i32) -> bool {
        let (ox, oy) = self.draw_offset(camera);
        self.right() - ox < 0.0
            || self.bottom() - oy < 0.0
            || self.left - ox > screen_width as f64
            || self.top - oy > screen_height as f64
    }

    /// Integer screen position of the top-left corner.
    pub fn screen_position(&self, camera: &Camera) -> (i32, i32) {
        let (ox, oy) = self.draw_offset(camera);
        (
            (self.left - ox).floor() as i32,
            (self.top - oy).floor() as i32,
        )
    }
}

impl Drawable for PaletteSprite {
    fn draw(&self, camera: &Camera, screen: &mut dyn Image) {
        if self.is_out_of_screen(camera, screen.width(), screen.height()) {
            log(LogCategory::Sprite, LogLevel::Trace, || {
                format!("Sprite {}: culled at ({}, {})", self.id, self.left, self.top)
            });
            return;
        }

        let (l, t) = self.screen_position(camera);
        draw_palette_mapped_image(screen, &self.image, &self.palette, l, t, true);
    }

    fn z(&self) -> i32 {
        self.z
    }

    fn is_visible(&self) -> bool {
        !self.flags.contains(SpriteFlags::INVISIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(art: &str) -> PaletteSprite {
        PaletteSprite::new(art.parse().unwrap())
    }

    #[test]
    fn test_new_sprite_has_identity_map() {
        let s = sprite("12\n34");
        assert!(s.palette_map().is_identity());
        assert_eq!(s.flags(), SpriteFlags::empty());
        assert!(s.is_visible());
    }

    #[test]
    fn test_palette_map_forwarding() {
        let mut s = sprite("1");
        s.set_palette_map(&[5, 4, -1]);
        assert_eq!(s.palette_map().entries()[..3], [0, 4, 2]);

        s.set_palette_map_color(2, 9);
        assert_eq!(s.palette_map().lookup(2), 9);

        s.set_palette_map_color(0, 9);
        assert_eq!(s.palette_map().lookup(0), 0);
    }

    #[test]
    fn test_center_position() {
        let mut s = sprite("1111\n1111");
        s.set_position(10.0, 10.0);
        assert_eq!(s.left(), 8.0);
        assert_eq!(s.top(), 9.0);
        assert_eq!(s.x(), 10.0);
        assert_eq!(s.y(), 10.0);
        assert_eq!(s.right(), 12.0);
        assert_eq!(s.bottom(), 11.0);
    }

    #[test]
    fn test_draw_applies_camera_offset() {
        let mut s = sprite("3");
        s.set_left(12.0);
        s.set_top(7.0);
        let camera = Camera::new(10.0, 5.0);
        let mut screen = IndexedImage::new(8, 8);

        s.draw(&camera, &mut screen);

        assert_eq!(screen.get_pixel(2, 2), 3);
    }

    #[test]
    fn test_draw_relative_to_camera_ignores_offset() {
        let mut s = sprite("3");
        s.set_left(1.0);
        s.set_top(1.0);
        s.set_flag(SpriteFlags::RELATIVE_TO_CAMERA, true);
        let camera = Camera::new(100.0, 100.0);
        let mut screen = IndexedImage::new(4, 4);

        s.draw(&camera, &mut screen);

        assert_eq!(screen.get_pixel(1, 1), 3);
    }

    #[test]
    fn test_draw_floors_fractional_position() {
        let mut s = sprite("4");
        s.set_left(2.7);
        s.set_top(-0.5);
        let mut screen = IndexedImage::new(4, 4);

        s.draw(&Camera::default(), &mut screen);

        // floor(-0.5) = -1 puts the only pixel above the screen
        assert!(screen.pixels().iter().all(|&p| p == 0));

        s.set_top(0.5);
        s.draw(&Camera::default(), &mut screen);
        assert_eq!(screen.get_pixel(2, 0), 4);
    }

    #[test]
    fn test_draw_is_transparent_and_remapped() {
        let mut s = sprite(".3\n5.");
        s.set_palette_map_color(3, 7);
        let mut screen = IndexedImage::filled(2, 2, 9);

        s.draw(&Camera::default(), &mut screen);

        assert_eq!(screen.to_art(), "97\n59\n");
    }

    #[test]
    fn test_out_of_screen() {
        let mut s = sprite("11\n11");
        let camera = Camera::default();

        s.set_left(-2.5);
        assert!(s.is_out_of_screen(&camera, 10, 10));
        s.set_left(-1.0);
        assert!(!s.is_out_of_screen(&camera, 10, 10));
        s.set_left(10.0);
        assert!(!s.is_out_of_screen(&camera, 10, 10), "Edge touching counts as on screen");
        s.set_left(10.5);
        assert!(s.is_out_of_screen(&camera, 10, 10));

        s.set_left(0.0);
        s.set_top(30.0);
        assert!(s.is_out_of_screen(&camera, 10, 10));
        assert!(!s.is_out_of_screen(&Camera::new(0.0, 25.0), 10, 10));
    }

    #[test]
    fn test_culled_sprite_does_not_draw() {
        let mut s = sprite("1");
        s.set_left(50.0);
        let mut screen = IndexedImage::new(4, 4);

        s.draw(&Camera::default(), &mut screen);

        assert!(screen.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_invisible_flag() {
        let mut s = sprite("1");
        s.set_flag(SpriteFlags::INVISIBLE, true);
        assert!(!s.is_visible());
        s.set_flag(SpriteFlags::INVISIBLE, false);
        assert!(s.is_visible());
    }

    #[test]
    fn test_shared_image_different_palettes() {
        let base: IndexedImage = "22\n2.".parse().unwrap();
        let red = PaletteSprite::new(base.clone());
        let mut blue = PaletteSprite::new(base);
        blue.set_palette_map_color(2, 8);
        blue.set_left(2.0);

        let mut screen = IndexedImage::new(4, 2);
        red.draw(&Camera::default(), &mut screen);
        blue.draw(&Camera::default(), &mut screen);

        assert_eq!(screen.to_art(), "2288\n2.8.\n");
    }
}
