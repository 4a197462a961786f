use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use palsprite_cli::{png_export, scene_file::SceneFile};
use palsprite_core::logging::{LogCategory, LogConfig, LogLevel};
use palsprite_core::types::Frame;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "palsprite", about = "Render a palette sprite scene")]
struct Args {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Write the rendered frame to this PNG file
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Integer upscale factor for PNG output
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Print the indexed screen as text art
    #[arg(long, default_value_t = false)]
    ascii: bool,

    /// Dump scene debug state and the resolved frame as JSON to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Override the camera draw offset from the scene file
    #[arg(long, allow_hyphen_values = true)]
    camera_x: Option<f64>,

    /// Vertical counterpart of --camera-x
    #[arg(long, allow_hyphen_values = true)]
    camera_y: Option<f64>,

    /// Core log level for every category (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "off")]
    log_level: LogLevel,

    /// Core log level for palette table updates
    #[arg(long)]
    log_palette: Option<LogLevel>,

    /// Core log level for blits
    #[arg(long)]
    log_blit: Option<LogLevel>,

    /// Core log level for sprite culling
    #[arg(long)]
    log_sprite: Option<LogLevel>,

    /// Core log level for scene bookkeeping
    #[arg(long)]
    log_scene: Option<LogLevel>,

    /// Send core logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn configure_core_logging(args: &Args) -> Result<()> {
    let config = LogConfig::global();
    config.set_global_level(args.log_level);

    let overrides = [
        (LogCategory::Palette, args.log_palette),
        (LogCategory::Blit, args.log_blit),
        (LogCategory::Sprite, args.log_sprite),
        (LogCategory::Scene, args.log_scene),
    ];
    for (category, level) in overrides {
        if let Some(level) = level {
            config.set_level(category, level);
        }
    }

    if let Some(path) = &args.log_file {
        config
            .set_log_file(path.clone())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    configure_core_logging(&args)?;

    let file = SceneFile::load(&args.scene)?;
    let palette = file.color_palette()?;
    let mut scene = file.build_scene()?;

    if args.camera_x.is_some() || args.camera_y.is_some() {
        let camera = *scene.camera();
        scene.camera_mut().move_to(
            args.camera_x.unwrap_or(camera.draw_offset_x),
            args.camera_y.unwrap_or(camera.draw_offset_y),
        );
    }

    info!(
        "Rendering {} ({} sprite(s))",
        args.scene.display(),
        scene.sprites().len()
    );
    let screen = scene.render();
    let frame = Frame::from_indexed(screen, &palette);

    if args.ascii {
        print!("{}", screen.to_art());
    }

    if let Some(path) = &args.output {
        png_export::save_png(path, &frame, args.scale)?;
        info!(
            "Wrote {}x{} frame to {}",
            frame.width * args.scale,
            frame.height * args.scale,
            path.display()
        );
    }

    if let Some(path) = &args.dump {
        let dump = serde_json::json!({
            "scene": scene.debug_state(),
            "frame": frame,
        });
        let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write!(f, "{}", serde_json::to_string_pretty(&dump)?)?;
    }

    if !args.ascii && args.output.is_none() && args.dump.is_none() {
        warn!("No output requested; use --output, --ascii or --dump");
    }

    Ok(())
}
