/// JSON scene description loaded by the command line renderer
use anyhow::{bail, Context, Result};
use palsprite_core::logging::{log, LogCategory, LogLevel};
use palsprite_core::{IndexedImage, RamPalette, Scene, SpriteFlags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const SCENE_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One `[src, dst]` color remap.
pub type Remap = [i32; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Name of an entry in `images`
    pub image: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub z: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i32>,
    #[serde(default)]
    pub relative_to_camera: bool,
    #[serde(default)]
    pub invisible: bool,
    /// Full palette map, applied before `remap`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette_map: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remap: Vec<Remap>,
}

/// Remaps applied to every sprite created with `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRule {
    #[serde(default)]
    pub kind: Option<i32>,
    #[serde(default)]
    pub remap: Vec<Remap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub version: u32,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub background: i32,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Optional color override, `#RRGGBB` or `#AARRGGBB` per index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
    /// Named text-art images, one string per row
    pub images: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub sprites: Vec<SpriteConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_created: Vec<CreatedRule>,
}

fn default_width() -> i32 {
    Scene::DEFAULT_WIDTH
}

fn default_height() -> i32 {
    Scene::DEFAULT_HEIGHT
}

impl SceneFile {
    /// Load a scene description from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading scene file {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let scene: SceneFile = serde_json::from_str(contents)?;
        if scene.version != SCENE_FILE_VERSION {
            bail!(
                "unsupported scene file version {} (expected {})",
                scene.version,
                SCENE_FILE_VERSION
            );
        }
        Ok(scene)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Parse every named image.
    pub fn parse_images(&self) -> Result<BTreeMap<String, IndexedImage>> {
        self.images
            .iter()
            .map(|(name, rows)| {
                let image: IndexedImage = rows
                    .join("\n")
                    .parse()
                    .with_context(|| format!("image {:?}", name))?;
                Ok((name.clone(), image))
            })
            .collect()
    }

    /// Resolve the color palette, falling back to the default arcade palette.
    pub fn color_palette(&self) -> Result<RamPalette> {
        let Some(colors) = &self.palette else {
            return Ok(RamPalette::arcade());
        };
        let colors = colors
            .iter()
            .enumerate()
            .map(|(i, c)| parse_color(c).with_context(|| format!("palette entry {}", i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(RamPalette::from_colors(colors))
    }

    /// Build a ready-to-render scene.
    pub fn build_scene(&self) -> Result<Scene> {
        let images = self.parse_images()?;
        let mut scene = Scene::new(self.width, self.height);
        scene.set_background(self.background);
        scene.camera_mut().move_to(self.camera.x, self.camera.y);

        for rule in &self.on_created {
            let remaps = rule.remap.clone();
            scene.on_sprite_created(rule.kind, move |sprite| {
                for &[src, dst] in &remaps {
                    sprite.set_palette_map_color(src, dst);
                }
            });
        }

        for (idx, cfg) in self.sprites.iter().enumerate() {
            let image = images
                .get(&cfg.image)
                .with_context(|| format!("sprite {} uses unknown image {:?}", idx, cfg.image))?;

            let sprite = scene.create_palette_sprite(image.clone(), cfg.kind);
            if let Some(map) = &cfg.palette_map {
                sprite.set_palette_map(map);
            }
            for &[src, dst] in &cfg.remap {
                sprite.set_palette_map_color(src, dst);
            }
            sprite.set_left(cfg.left);
            sprite.set_top(cfg.top);
            sprite.set_z(cfg.z);
            sprite.set_flag(SpriteFlags::RELATIVE_TO_CAMERA, cfg.relative_to_camera);
            sprite.set_flag(SpriteFlags::INVISIBLE, cfg.invisible);
        }

        log(LogCategory::Scene, LogLevel::Info, || {
            format!(
                "Scene: loaded {} image(s), {} sprite(s), {} created rule(s)",
                images.len(),
                self.sprites.len(),
                self.on_created.len()
            )
        });

        Ok(scene)
    }
}

/// Parse `#RRGGBB` (opaque) or `#AARRGGBB` into ARGB8888.
pub fn parse_color(s: &str) -> Result<u32> {
    let hex = s.trim().trim_start_matches('#');
    let value = u32::from_str_radix(hex, 16).with_context(|| format!("invalid color {:?}", s))?;
    match hex.len() {
        6 => Ok(0xFF000000 | value),
        8 => Ok(value),
        _ => bail!("invalid color {:?}: expected #RRGGBB or #AARRGGBB", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palsprite_core::{Image, IndexedPalette};

    const SAMPLE: &str = r#"{
        "version": 1,
        "width": 6,
        "height": 2,
        "background": 15,
        "images": { "soldier": [".22", "2.2"] },
        "on_created": [ { "kind": 2, "remap": [[2, 8]] } ],
        "sprites": [
            { "image": "soldier", "left": 0, "top": 0, "kind": 1 },
            { "image": "soldier", "left": 3, "top": 0, "kind": 2 }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let file = SceneFile::from_json(SAMPLE).unwrap();
        assert_eq!(file.width, 6);
        assert_eq!(file.sprites.len(), 2);
        assert_eq!(file.camera, CameraConfig::default());
        assert_eq!(file.on_created[0].remap, vec![[2, 8]]);
    }

    #[test]
    fn test_defaults() {
        let file = SceneFile::from_json(r#"{ "version": 1, "images": {} }"#).unwrap();
        assert_eq!(file.width, Scene::DEFAULT_WIDTH);
        assert_eq!(file.height, Scene::DEFAULT_HEIGHT);
        assert!(file.sprites.is_empty());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = SceneFile::from_json(r#"{ "version": 7, "images": {} }"#).unwrap_err();
        assert!(err.to_string().contains("version 7"));
    }

    #[test]
    fn test_build_and_render_team_colors() {
        let file = SceneFile::from_json(SAMPLE).unwrap();
        let mut scene = file.build_scene().unwrap();

        let screen = scene.render();
        assert_eq!(screen.to_art(), "f22f88\n2f28f8\n");
    }

    #[test]
    fn test_sprite_palette_map_and_remap() {
        let mut file = SceneFile::from_json(SAMPLE).unwrap();
        file.sprites[0].palette_map = Some(vec![0, 1, 0]);
        file.sprites[1].remap = vec![[8, 9], [0, 4]];
        let mut scene = file.build_scene().unwrap();

        let first = &scene.sprites()[0];
        assert_eq!(first.palette_map().lookup(2), 0);
        // The created rule ran first, then the sprite's own remaps
        let second = &scene.sprites()[1];
        assert_eq!(second.palette_map().lookup(2), 8);
        assert_eq!(second.palette_map().lookup(8), 9);

        // First sprite's 2s now map to 0 and vanish into the background
        let screen = scene.render();
        assert_eq!(screen.get_pixel(1, 0), 15);
    }

    #[test]
    fn test_unknown_image() {
        let mut file = SceneFile::from_json(SAMPLE).unwrap();
        file.sprites[0].image = "ghost".to_string();
        let err = file.build_scene().unwrap_err();
        assert!(format!("{:#}", err).contains("ghost"));
    }

    #[test]
    fn test_bad_art() {
        let mut file = SceneFile::from_json(SAMPLE).unwrap();
        file.images.insert("soldier".to_string(), vec!["..".into(), ".".into()]);
        assert!(file.build_scene().is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF2121").unwrap(), 0xFFFF2121);
        assert_eq!(parse_color("80123456").unwrap(), 0x80123456);
        assert!(parse_color("#123").is_err());
        assert!(parse_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_color_palette_override() {
        let mut file = SceneFile::from_json(SAMPLE).unwrap();
        assert_eq!(file.color_palette().unwrap(), RamPalette::arcade());

        file.palette = Some(vec!["#000000".into(), "#00FF00".into()]);
        let palette = file.color_palette().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get_color(1), 0xFF00FF00);

        file.palette = Some(vec!["nope".into()]);
        assert!(file.color_palette().is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let file = SceneFile::from_json(SAMPLE).unwrap();
        let path = std::env::temp_dir().join("palsprite_scene_file_test.json");

        file.save(&path).unwrap();
        let loaded = SceneFile::load(&path).unwrap();
        assert_eq!(loaded, file);

        let _ = std::fs::remove_file(&path);
    }
}
