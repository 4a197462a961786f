//! Builds a scene in code and prints it as text art.
//!
//! Run with: cargo run -p palsprite_cli --example team_colors

use palsprite_core::{IndexedImage, Scene};

const RED: i32 = 1;
const BLUE: i32 = 2;

fn main() {
    let knight: IndexedImage = "
        .1111.
        122221
        1f22f1
        .2222.
        .e..e.
    "
    .parse()
    .expect("knight art is valid");

    let mut scene = Scene::new(16, 6);
    scene.set_background(13);
    scene.on_sprite_created(Some(BLUE), |s| s.set_palette_map_color(2, 8));

    scene.create_palette_sprite(knight.clone(), Some(RED)).set_left(1.0);
    scene.create_palette_sprite(knight, Some(BLUE)).set_left(9.0);

    print!("{}", scene.render());
}
