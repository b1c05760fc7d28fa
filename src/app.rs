//! Frame loop
//!
//! Owns one run from setup to termination: sample input, tick, feed audio,
//! draw. Returns once the simulation reaches its terminal phase.

use crate::audio::{AudioBackend, AudioManager};
use crate::error::SetupError;
use crate::level::Level;
use crate::platform::{Clock, FrameClock, InputSampler};
use crate::renderer::{Renderer, build_draw_list};
use crate::settings::Settings;
use crate::sim::{SimulationState, SpriteAtlas, tick};

pub use crate::sim::TerminationCause;

/// What a finished run amounts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub kills: u32,
    /// Simulated seconds survived
    pub survived: f32,
    pub ticks: u64,
    pub cause: TerminationCause,
}

/// Run the game until it terminates, pacing frames with the wall clock
pub fn run<I, R, A>(
    settings: Settings,
    level: &Level,
    atlas: SpriteAtlas,
    input: &mut I,
    renderer: &mut R,
    audio: &mut AudioManager<A>,
) -> Result<RunSummary, SetupError>
where
    I: InputSampler,
    R: Renderer,
    A: AudioBackend,
{
    let clock = FrameClock::new(settings.max_fps);
    run_with_clock(settings, level, atlas, input, renderer, audio, clock)
}

/// `run` with an explicit time source
pub fn run_with_clock<I, R, A, C>(
    settings: Settings,
    level: &Level,
    atlas: SpriteAtlas,
    input: &mut I,
    renderer: &mut R,
    audio: &mut AudioManager<A>,
    mut clock: C,
) -> Result<RunSummary, SetupError>
where
    I: InputSampler,
    R: Renderer,
    A: AudioBackend,
    C: Clock,
{
    let mut state = SimulationState::new(settings, level, atlas)?;
    log::info!(
        "Run started (seed {:#x}, {} spawns every {:.2}s, auto fire {})",
        state.settings.seed,
        state.settings.spawn_mode.as_str(),
        state.settings.spawn_mode.mean_interval(),
        state.settings.auto_fire
    );
    if state.settings.music {
        audio.start_music();
    }

    // Drop the delta that covers setup time
    clock.frame_dt();

    while state.is_running() {
        let dt = clock.frame_dt();
        let sample = input.sample();
        tick(&mut state, &sample.to_tick_input(), dt);
        audio.handle_events(&state.events);
        renderer.draw(state.camera.viewport, &build_draw_list(&state));
    }

    let summary = RunSummary {
        kills: state.kills,
        survived: state.time,
        ticks: state.ticks,
        cause: state.cause.unwrap_or(TerminationCause::Quit),
    };
    log::info!(
        "Survived {:.1}s ({} ticks), {} kills, ended by {:?}",
        summary.survived,
        summary.ticks,
        summary.kills,
        summary.cause
    );
    Ok(summary)
}
