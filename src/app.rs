//! Main application module: webcam loop, detection, dispatch and display.

use crate::{
    config::Config,
    controller::{GestureController, StepOutcome},
    dispatcher::CommandDispatcher,
    error::{Error, Result},
    landmark_source::{LandmarkSource, OnnxLandmarkSource},
    landmarks::{FaceLandmarks, HandLandmarks},
    playback::SpotifyClient,
    token::{unix_now, TokenRecord},
    utils::to_pixel,
};
use log::{info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::time::{Duration, Instant};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// File or default configuration
    pub config: Config,
    /// Run detection even when playback control is unavailable
    pub dry_run: bool,
}

/// Main application struct
pub struct GestureApp {
    config: AppConfig,
    video_capture: VideoCapture,
    landmarks: Box<dyn LandmarkSource>,
    controller: GestureController<SpotifyClient>,
}

impl GestureApp {
    /// Create a new gesture control application
    ///
    /// # Errors
    ///
    /// Returns an error if the camera cannot be opened, a model fails to load,
    /// or no credential is available outside dry-run mode.
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing gesture controlled playback");
        let cfg = &config.config;

        let dispatcher = CommandDispatcher::from_token_file(&cfg.spotify.token_path, &cfg.spotify.api_base)
            .with_volume(cfg.dispatch.volume_step, cfg.dispatch.default_volume);
        if !dispatcher.is_ready() {
            if !config.dry_run {
                return Err(Error::MissingCredential(format!(
                    "{} not usable, run spotify-auth first",
                    cfg.spotify.token_path.display()
                )));
            }
            warn!("Dry run: gestures will be detected but not sent");
        } else if let Ok(record) = TokenRecord::load(&cfg.spotify.token_path) {
            if record.is_expired(unix_now()) {
                warn!("Access token has expired, commands will fail until spotify-auth is run again");
            }
        }

        info!("Opening camera {}", cfg.camera.index);
        let mut video_capture = VideoCapture::new(cfg.camera.index, videoio::CAP_ANY)?;
        if !video_capture.is_opened()? {
            return Err(Error::InvalidInput(format!(
                "Could not open camera {}",
                cfg.camera.index
            )));
        }
        video_capture.set(CAP_PROP_BUFFERSIZE, f64::from(cfg.camera.buffer_size))?;

        let landmarks: Box<dyn LandmarkSource> = Box::new(OnnxLandmarkSource::new(&cfg.models)?);

        let controller = GestureController::new(
            cfg.hand_classifier(),
            cfg.face_motion_detector(),
            cfg.action_cooldown(),
            dispatcher,
        );

        if cfg.display.enabled {
            highgui::named_window(&cfg.display.window_title, WINDOW_NORMAL)?;
        }

        Ok(Self {
            config,
            video_capture,
            landmarks,
            controller,
        })
    }

    /// Run until `q`/Esc is pressed or a frame cannot be read
    pub fn run(&mut self) -> Result<()> {
        info!("Starting main application loop");

        let mut frame_count = 0u64;
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();
        let mut fps = 0.0;

        loop {
            let mut frame = Mat::default();
            if !self.video_capture.read(&mut frame)? || frame.empty() {
                warn!("Failed to read frame, stopping");
                break;
            }

            if self.config.config.camera.flip_horizontal {
                let temp = frame.clone();
                opencv::core::flip(&temp, &mut frame, 1)?;
            }

            let (hand, face, outcome) = self.process_frame(&frame)?;

            frame_count += 1;
            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                fps = frame_count as f64 / start_time.elapsed().as_secs_f64();
                last_fps_update = Instant::now();
            }

            if self.config.config.display.enabled {
                self.display_results(&mut frame, hand.as_ref(), face.as_ref(), &outcome, fps)?;

                let key = highgui::wait_key(1)?;
                if key == 27 || key == i32::from(b'q') {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        info!("Application shutting down");
        self.video_capture.release()?;
        if self.config.config.display.enabled {
            highgui::destroy_all_windows()?;
        }
        Ok(())
    }

    /// Detect landmarks and advance the controller by one frame
    fn process_frame(&mut self, frame: &Mat) -> Result<(Option<HandLandmarks>, Option<FaceLandmarks>, StepOutcome)> {
        let now = Instant::now();

        let hand = self.landmarks.detect_hands(frame)?.into_iter().next();

        // Face inference is skipped entirely while the motion detector is locked
        let face = if self.controller.face_locked(now) {
            None
        } else {
            self.landmarks.detect_faces(frame)?.into_iter().next()
        };
        let nose_x = face.as_ref().and_then(FaceLandmarks::nose_tip).map(|p| p.x);

        let outcome = self.controller.step(hand.as_ref(), nose_x, now);
        Ok((hand, face, outcome))
    }

    /// Draw status overlay and show the frame
    fn display_results(
        &self,
        frame: &mut Mat,
        hand: Option<&HandLandmarks>,
        face: Option<&FaceLandmarks>,
        outcome: &StepOutcome,
        fps: f64,
    ) -> Result<()> {
        let display = &self.config.config.display;

        if display.draw_landmarks {
            let (width, height) = (frame.cols(), frame.rows());
            if let Some(hand) = hand {
                for point in &hand.points {
                    imgproc::circle(
                        frame,
                        to_pixel(point, width, height),
                        3,
                        Scalar::new(255.0, 0.0, 0.0, 0.0),
                        -1,
                        LINE_8,
                        0,
                    )?;
                }
            }
            if let Some(nose) = face.and_then(FaceLandmarks::nose_tip) {
                imgproc::circle(
                    frame,
                    to_pixel(&nose, width, height),
                    5,
                    Scalar::new(0.0, 0.0, 255.0, 0.0),
                    -1,
                    LINE_8,
                    0,
                )?;
            }
        }

        let status = format!(
            "Spotify: {}",
            if self.controller.is_ready() { "Ready" } else { "Error" }
        );
        put_label(frame, &status, Point::new(10, 30), Scalar::new(0.0, 255.0, 0.0, 0.0))?;

        if let Some(action) = outcome.action {
            put_label(
                frame,
                &format!("Action: {action}"),
                Point::new(10, 70),
                Scalar::new(0.0, 255.0, 255.0, 0.0),
            )?;
        }

        if let Some(last) = self.controller.last_action() {
            put_label(
                frame,
                &format!("Last: {last}"),
                Point::new(10, 110),
                Scalar::new(200.0, 200.0, 200.0, 0.0),
            )?;
        }

        put_label(
            frame,
            &format!("FPS: {fps:.1}"),
            Point::new(10, frame.rows() - 15),
            Scalar::new(0.0, 255.0, 0.0, 0.0),
        )?;

        highgui::imshow(&display.window_title, frame)?;
        Ok(())
    }
}

fn put_label(frame: &mut Mat, text: &str, origin: Point, color: Scalar) -> Result<()> {
    imgproc::put_text(frame, text, origin, FONT_HERSHEY_SIMPLEX, 0.7, color, 2, LINE_8, false)?;
    Ok(())
}
