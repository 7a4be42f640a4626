use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use env_logger::{Builder, Target};
use log::{LevelFilter, info, warn};
use raylib::prelude::*;

mod config;
mod constants;
mod error;
mod rotator;
mod stage;
mod texture_loader;

use crate::config::{Overrides, Preset};
use crate::constants::*;
use crate::rotator::Rotator;
use crate::rotator::timer::IntervalTimer;
use crate::stage::Stage;
use crate::texture_loader::{load_sorted_image_paths, load_texture_with_exif_rotation, shuffle_image_paths};

/// Rotating, cross-fading slideshow of the images in a directory.
///
/// Keys: Right / Left to step through slides, Space to pause or resume
/// automatic rotation, Escape to quit.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory containing the slide images
    image_directory: PathBuf,

    /// TOML file with interval, [transition] and [effects] options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default effect set the options are applied on
    #[arg(long, value_enum, default_value_t = Preset::Slideshow)]
    preset: Preset,

    /// Milliseconds between automatic rotations
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Transition duration in milliseconds
    #[arg(long, allow_negative_numbers = true)]
    transition: Option<i64>,

    /// Easing curve: ease, linear, ease-in, ease-out or ease-in-out
    #[arg(long)]
    curve: Option<String>,

    /// Fade slides in and out
    #[arg(long)]
    fade: Option<bool>,

    /// Slide motion: left, right, top, bottom or none
    #[arg(long)]
    axis: Option<String>,

    /// Show the images in random order
    #[arg(long)]
    shuffle: bool,

    /// Print the resolved effect configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            interval: self.interval,
            transition: self.transition,
            curve: self.curve.clone(),
            fade: self.fade,
            axis: self.axis.clone(),
        }
    }
}

fn init_logger() {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        Builder::new()
            .target(Target::Stdout)
            .filter_level(LevelFilter::Warn)
            .filter_module("slide_rotator", LevelFilter::Info)
            .init();
    }
}

/// Keeps a start-up error on screen for a moment before exiting.
fn show_error(rl: &mut RaylibHandle, thread: &RaylibThread, message: &str) {
    let mut remaining = ERROR_DISPLAY_DURATION;
    while remaining > 0.0 && !rl.window_should_close() {
        remaining -= rl.get_frame_time();
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::BLACK);
        d.draw_text(&format!("Error: {}", message), 20, 20, 20, Color::RED);
    }
}

fn load_images(rl: &mut RaylibHandle, thread: &RaylibThread, paths: &[PathBuf]) -> Vec<Rc<Texture2D>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        match load_texture_with_exif_rotation(rl, thread, path) {
            Ok(texture) => images.push(texture),
            Err(e) => warn!("skipping {}: {:#}", path.display(), e),
        }
    }
    info!("loaded {} of {} images", images.len(), paths.len());
    images
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = config::load(cli.preset, cli.config.as_deref(), &cli.overrides())
        .context("invalid effect configuration")?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut image_paths = load_sorted_image_paths(&cli.image_directory)?;
    if cli.shuffle {
        shuffle_image_paths(&mut image_paths);
    }

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Slide Rotator")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let images = load_images(&mut rl, &thread, &image_paths);
    let stage = Stage::new(images, &config);
    let mut rotator = match Rotator::initialize(stage, IntervalTimer::new(), &config) {
        Ok(rotator) => rotator,
        Err(e) => {
            show_error(&mut rl, &thread, &e.to_string());
            return Err(e).context("failed to start the slideshow");
        }
    };
    info!("rotating {} slides", rotator.len());

    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow!("failed to create render texture: {}", e))?;

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        // --- Manual navigation, same postures as the timer ---
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            rotator.next();
            info!("slide {}/{}", rotator.cursor() + 1, rotator.len());
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            rotator.previous();
            info!("slide {}/{}", rotator.cursor() + 1, rotator.len());
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            if rotator.is_running() {
                rotator.stop();
            } else {
                rotator.start();
            }
        }

        rotator.advance(Duration::from_secs_f32(dt));
        rotator.adapter_mut().update(dt);

        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            rotator.adapter().draw(&mut d);
        });

        // Scale the framebuffer to the window, flipped back upright
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }

    rotator.stop();
    Ok(())
}
