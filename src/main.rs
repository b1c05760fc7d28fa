//! Survivor headless entry point
//!
//! Runs the demo arena with solid-rectangle sprites and a scripted walk, then
//! logs the run summary. A windowed host plugs its own `InputSampler`,
//! `Renderer` and `AudioBackend` into `survivor::run` instead.

use std::path::Path;
use std::process::ExitCode;

use survivor::audio::{AudioManager, NullAudio};
use survivor::platform::{InputSample, ScriptedInput};
use survivor::renderer::LogRenderer;
use survivor::sim::SpriteAtlas;
use survivor::{Level, SetupError, Settings, run};

const SETTINGS_PATH: &str = "settings.json";
const LEVEL_PATH: &str = "level.json";

/// Frames spent on each leg of the scripted walk
const LEG_FRAMES: usize = 90;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Survivor (headless) starting...");

    match play() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Setup failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn play() -> Result<(), SetupError> {
    let settings = Settings::load(Path::new(SETTINGS_PATH))?;
    let level_path = Path::new(LEVEL_PATH);
    let level = if level_path.exists() {
        Level::load(level_path)?
    } else {
        log::info!("No {LEVEL_PATH}, using the demo arena");
        Level::demo()
    };
    let atlas = SpriteAtlas::solid(
        (128, 128),
        &["bat", "blob", "skeleton"],
        (64, 64),
        (16, 16),
        4,
    )?;

    // Walk a loop around the middle of the arena, then quit
    let leg = |right, down, left, up| InputSample {
        left,
        right,
        up,
        down,
        ..Default::default()
    };
    let mut input = ScriptedInput::default()
        .hold(leg(true, false, false, false), LEG_FRAMES)
        .hold(leg(false, true, false, false), LEG_FRAMES)
        .hold(leg(false, false, true, false), LEG_FRAMES)
        .hold(leg(false, false, false, true), LEG_FRAMES);

    let mut renderer = LogRenderer::new();
    let mut audio = AudioManager::from_settings(&settings, NullAudio);

    let summary = run(settings, &level, atlas, &mut input, &mut renderer, &mut audio)?;
    log::info!(
        "{} kills in {:.1}s over {} frames",
        summary.kills,
        summary.survived,
        renderer.frames()
    );
    Ok(())
}
