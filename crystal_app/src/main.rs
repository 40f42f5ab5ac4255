//! Crystal showcase
//!
//! Mounts the crystal hero scene and drives it through a simulated visit:
//! the page is scrolled to the bottom and back up while the pointer drifts
//! across the viewport. Camera and uniform state are logged once per second,
//! then the scene is torn down and a late scroll event is shown to be ignored.
//!
//! ```text
//! crystal_showcase [CONFIG] [--frames N] [--palette #rgb,#rgb,#rgb] [--save-default PATH]
//! ```

use clap::Parser;
use crystal_engine::foundation::logging;
use crystal_engine::prelude::*;
use thiserror::Error;

const FRAME_RATE: f32 = 60.0;
const DEFAULT_FRAMES: u32 = 600;
const DOCUMENT_HEIGHT: f32 = 4000.0;
const VIEWPORT_WIDTH: f32 = 1440.0;
const VIEWPORT_HEIGHT: f32 = 900.0;

#[derive(Error, Debug)]
enum ShowcaseError {
    #[error("--palette expects three colors, got {0}")]
    PaletteSize(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Drives the crystal hero scene through a simulated page visit
#[derive(Parser, Debug)]
#[command(name = "crystal_showcase")]
struct Options {
    /// Scene configuration file (.toml or .ron)
    config: Option<String>,

    /// Number of 60 Hz frames to simulate
    #[arg(long, value_name = "N", default_value_t = DEFAULT_FRAMES)]
    frames: u32,

    /// Replace the material colors, e.g. "#5a4ec4,#4e76c4,#c4764e"
    #[arg(long, value_name = "COLORS", value_delimiter = ',')]
    palette: Vec<String>,

    /// Write the default scene configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    save_default: Option<String>,
}

struct ShowcaseApp {
    frames: FrameLoop,
    scroll: ScrollSource,
    scene: MountedScene,
    frame_budget: u32,
}

impl ShowcaseApp {
    fn new(config: &SceneConfig, frame_budget: u32) -> Result<Self, ShowcaseError> {
        let frames = FrameLoop::new();
        let scroll = ScrollSource::new();

        let scene = CrystalScene::new(config)?.mount(&frames, &scroll);
        scene.context().set_aspect_ratio(VIEWPORT_WIDTH / VIEWPORT_HEIGHT);
        let stage = scene.stage();
        log::info!(
            "Stage: {} lights, fog {} from {} to {}, {} sparkles, floor at y={}",
            stage.lighting.lights.len(),
            stage.lighting.fog.color.to_hex(),
            stage.lighting.fog.near,
            stage.lighting.fog.far,
            stage.sparkles.len(),
            stage.floor.height
        );

        Ok(Self { frames, scroll, scene, frame_budget })
    }

    /// Scroll offset for a frame: down to the bottom over the first half, back up over the second
    fn scroll_offset(&self, frame: u32) -> f32 {
        let half = (self.frame_budget / 2).max(1) as f32;
        let phase = frame as f32 / half;
        let fraction = if phase <= 1.0 { phase } else { (2.0 - phase).max(0.0) };
        fraction * (DOCUMENT_HEIGHT - VIEWPORT_HEIGHT)
    }

    fn pointer_at(time: f32) -> PointerState {
        let px = ((time * 0.9).sin() * 0.5 + 0.5) * VIEWPORT_WIDTH;
        let py = ((time * 1.4).cos() * 0.5 + 0.5) * VIEWPORT_HEIGHT;
        PointerState::from_window(px, py, VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }

    fn run(&mut self) {
        log::info!("Simulating {} frames at {} Hz", self.frame_budget, FRAME_RATE);
        let delta = 1.0 / FRAME_RATE;

        for frame in 0..self.frame_budget {
            let time = frame as f32 * delta;
            self.frames.set_pointer(Self::pointer_at(time));
            self.scroll.scroll_to(ScrollMetrics {
                offset: self.scroll_offset(frame),
                document_height: DOCUMENT_HEIGHT,
                viewport_height: VIEWPORT_HEIGHT,
            });

            let state = self.frames.step(delta);
            if state.frame % FRAME_RATE as u64 == 0 {
                self.report();
            }
        }
    }

    fn report(&self) {
        let output = self.scene.snapshot();
        let position = output.camera.position;
        let target = output.camera_target;
        log::info!(
            "t={:5.2}s progress={:.3} camera=({:7.3}, {:6.3}, {:7.3}) target=({:7.3}, {:6.3}, {:7.3}) crystal_y={:+.3}",
            output.elapsed,
            output.progress,
            position.x,
            position.y,
            position.z,
            target.x,
            target.y,
            target.z,
            output.crystal.position.y
        );

        let block = output.material_block();
        log::debug!(
            "uniforms: time={:.3} intensity={} fresnel_power={} glassiness={} chromatic={}",
            block.time,
            block.intensity,
            block.fresnel_power,
            block.glassiness,
            block.chromatic
        );
    }

    fn shutdown(mut self) {
        let morphed = self.scene.morphed_vertices();
        let max_radius = morphed
            .iter()
            .map(|vertex| vertex.position().norm())
            .fold(0.0_f32, f32::max);
        log::info!("Final crystal: {} vertices, max radius {:.3}", morphed.len(), max_radius);

        let before = self.scene.snapshot();
        self.scene.unmount();
        self.scene.unmount();
        log::info!(
            "Scene unmounted: {} frame callbacks, {} scroll observers left",
            self.frames.subscriber_count(),
            self.scroll.observer_count()
        );

        let delivered = self.scroll.emit_progress(0.5);
        self.frames.step(1.0 / FRAME_RATE);
        let unchanged = self.scene.snapshot() == before;
        log::info!(
            "Late scroll event reached {} observers; scene state unchanged: {}",
            delivered,
            unchanged
        );
    }
}

fn load_config(options: &Options) -> Result<SceneConfig, ShowcaseError> {
    let mut config = match &options.config {
        Some(path) => SceneConfig::load_validated(path)?,
        None => {
            log::info!("No config file given, using built-in scene defaults");
            SceneConfig::default()
        }
    };

    if !options.palette.is_empty() {
        let [c1, c2, c3] = options.palette.as_slice() else {
            return Err(ShowcaseError::PaletteSize(options.palette.len()));
        };
        config.material = config
            .material
            .with_palette([c1.trim(), c2.trim(), c3.trim()])
            .map_err(SceneError::from)?;
    }
    Ok(config)
}

fn run(options: Options) -> Result<(), ShowcaseError> {
    if let Some(path) = &options.save_default {
        SceneConfig::default().save_to_file(path)?;
        log::info!("Wrote default scene configuration to {}", path);
        return Ok(());
    }

    let config = load_config(&options)?;
    let mut app = ShowcaseApp::new(&config, options.frames)?;
    app.run();
    app.shutdown();
    Ok(())
}

fn main() {
    let options = Options::parse();
    logging::init();
    log::info!("Starting crystal showcase");

    match run(options) {
        Ok(()) => log::info!("Crystal showcase finished"),
        Err(error) => {
            log::error!("Crystal showcase failed: {}", error);
            std::process::exit(1);
        }
    }
}
