//! Minimal host scene: a screen back-buffer, a camera and a list of palette
//! sprites drawn once per frame.
//!
//! Drawing is single threaded and sequential. [`Scene::render`] clears the
//! screen and then draws every visible sprite in ascending z order, ties
//! broken by creation order.

use std::fmt;

use serde_json::{json, Value};

use crate::image::{Image, IndexedImage};
use crate::logging::{log, LogCategory, LogLevel};
use crate::sprite::{Camera, Drawable, PaletteSprite, SpriteId};

/// Callback run on every new sprite of a matching kind.
pub type CreatedHandler = Box<dyn FnMut(&mut PaletteSprite)>;

struct KindHandler {
    kind: Option<i32>,
    handler: CreatedHandler,
}

pub struct Scene {
    screen: IndexedImage,
    background: i32,
    camera: Camera,
    sprites: Vec<PaletteSprite>,
    created_handlers: Vec<KindHandler>,
    next_id: SpriteId,
    frame_count: u64,
}

impl Scene {
    /// Default screen size of the host engine.
    pub const DEFAULT_WIDTH: i32 = 160;
    pub const DEFAULT_HEIGHT: i32 = 120;

    pub fn new(width: i32, height: i32) -> Self {
        Self {
            screen: IndexedImage::new(width, height),
            background: 0,
            camera: Camera::default(),
            sprites: Vec::new(),
            created_handlers: Vec::new(),
            next_id: 1,
            frame_count: 0,
        }
    }

    /// Create a palette sprite from `image`, add it to the scene and run the
    /// created-handlers registered for `kind`.
    pub fn create_palette_sprite(
        &mut self,
        image: IndexedImage,
        kind: Option<i32>,
    ) -> &mut PaletteSprite {
        let mut sprite = PaletteSprite::new(image);
        sprite.set_kind(kind);
        sprite.set_id(self.next_id);
        self.next_id += 1;

        let mut ran = 0;
        for entry in self.created_handlers.iter_mut().filter(|h| h.kind == kind) {
            (entry.handler)(&mut sprite);
            ran += 1;
        }

        log(LogCategory::Scene, LogLevel::Debug, || {
            format!(
                "Scene: created sprite {} ({}x{}, kind {:?}), {} handler(s) ran",
                sprite.id(),
                sprite.image().width(),
                sprite.image().height(),
                kind,
                ran
            )
        });

        self.sprites.push(sprite);
        let last = self.sprites.len() - 1;
        &mut self.sprites[last]
    }

    /// Register a handler run on every sprite later created with `kind`.
    pub fn on_sprite_created<F>(&mut self, kind: Option<i32>, handler: F)
    where
        F: FnMut(&mut PaletteSprite) + 'static,
    {
        self.created_handlers.push(KindHandler {
            kind,
            handler: Box::new(handler),
        });
    }

    /// Remove a sprite. Returns it if it was in the scene.
    pub fn destroy(&mut self, id: SpriteId) -> Option<PaletteSprite> {
        let pos = self.sprites.iter().position(|s| s.id() == id)?;
        log(LogCategory::Scene, LogLevel::Debug, || {
            format!("Scene: destroyed sprite {}", id)
        });
        Some(self.sprites.remove(pos))
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&PaletteSprite> {
        self.sprites.iter().find(|s| s.id() == id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut PaletteSprite> {
        self.sprites.iter_mut().find(|s| s.id() == id)
    }

    pub fn sprites(&self) -> &[PaletteSprite] {
        &self.sprites
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_background(&mut self, color: i32) {
        self.background = color;
    }

    pub fn screen(&self) -> &IndexedImage {
        &self.screen
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Draw one frame and return the finished screen.
    pub fn render(&mut self) -> &IndexedImage {
        self.screen.fill(self.background);

        let mut order: Vec<&dyn Drawable> = self
            .sprites
            .iter()
            .map(|s| s as &dyn Drawable)
            .filter(|d| d.is_visible())
            .collect();
        // sort_by_key is stable, so creation order breaks z ties
        order.sort_by_key(|d| d.z());

        let drawn = order.len();
        for drawable in order {
            drawable.draw(&self.camera, &mut self.screen);
        }

        self.frame_count += 1;
        log(LogCategory::Scene, LogLevel::Trace, || {
            format!(
                "Scene: frame {} drew {} of {} sprite(s)",
                self.frame_count,
                drawn,
                self.sprites.len()
            )
        });

        &self.screen
    }

    /// JSON snapshot of the scene for debugging.
    pub fn debug_state(&self) -> Value {
        json!({
            "frame": self.frame_count,
            "screen": {
                "width": self.screen.width(),
                "height": self.screen.height(),
                "background": self.background,
            },
            "camera": {
                "x": self.camera.draw_offset_x,
                "y": self.camera.draw_offset_y,
            },
            "sprites": self.sprites.iter().map(|s| json!({
                "id": s.id(),
                "kind": s.kind(),
                "left": s.left(),
                "top": s.top(),
                "z": s.z(),
                "flags": s.flags().bits(),
                "palette": s.palette_map().entries().to_vec(),
            })).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("width", &self.screen.width())
            .field("height", &self.screen.height())
            .field("background", &self.background)
            .field("camera", &self.camera)
            .field("sprites", &self.sprites.len())
            .field("created_handlers", &self.created_handlers.len())
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}
