//! Gesture controlled Spotify: webcam hand poses and head turns drive playback.

use anyhow::{Context, Result};
use clap::Parser;
use gesture_spotify::{
    app::{AppConfig, GestureApp},
    config::Config,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Token file written by spotify-auth
    #[arg(short, long)]
    token: Option<PathBuf>,

    /// Hand landmark ONNX model
    #[arg(long)]
    hand_model: Option<PathBuf>,

    /// Face landmark ONNX model
    #[arg(long)]
    face_model: Option<PathBuf>,

    /// Do not mirror the camera image
    #[arg(long)]
    no_flip: bool,

    /// Run without a window
    #[arg(long)]
    no_gui: bool,

    /// Draw landmarks on the frame
    #[arg(long)]
    landmarks: bool,

    /// Detect gestures without a usable token; commands are not sent
    #[arg(long)]
    dry_run: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Command line values take precedence over the file
    fn apply(&self, config: &mut Config) {
        if let Some(cam) = self.cam {
            config.camera.index = cam;
        }
        if let Some(token) = &self.token {
            config.spotify.token_path.clone_from(token);
        }
        if let Some(path) = &self.hand_model {
            config.models.hand_landmarks.clone_from(path);
        }
        if let Some(path) = &self.face_model {
            config.models.face_landmarks.clone_from(path);
        }
        if self.no_flip {
            config.camera.flip_horizontal = false;
        }
        if self.no_gui {
            config.display.enabled = false;
        }
        if self.landmarks {
            config.display.draw_landmarks = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{}", gesture_spotify::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    info!("Gesture Controlled Spotify");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    args.apply(&mut config);

    config.validate().context("Invalid configuration")?;
    config.validate_models().context("Landmark models missing")?;

    let mut app = GestureApp::new(AppConfig {
        config,
        dry_run: args.dry_run,
    })?;
    app.run()?;

    Ok(())
}
