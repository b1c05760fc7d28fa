//! Platform abstraction layer
//!
//! The window, keyboard and wall clock belong to the host. This module holds
//! the seams the frame loop needs from them:
//! - Input sampling (`InputSampler`)
//! - Frame timing (`Clock`)

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::axis_input;
use crate::consts::MAX_FRAME_DT;
use crate::sim::TickInput;

/// Keys held when the frame was sampled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSample {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Window closed or quit key pressed
    pub quit: bool,
}

impl InputSample {
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }

    pub fn to_tick_input(self) -> TickInput {
        TickInput {
            direction: axis_input(self.left, self.right, self.up, self.down),
            fire: self.fire,
            quit: self.quit,
        }
    }
}

/// Polled once per frame
pub trait InputSampler {
    fn sample(&mut self) -> InputSample;
}

/// Replays a fixed list of samples, then asks to quit
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputSample>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputSample>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Hold `sample` for `frames` frames
    pub fn hold(mut self, sample: InputSample, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(sample, frames));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSampler for ScriptedInput {
    fn sample(&mut self) -> InputSample {
        self.frames.pop_front().unwrap_or_else(InputSample::quit)
    }
}

/// Source of per-frame time deltas
pub trait Clock {
    /// Seconds since the previous frame, already clamped for the simulation
    fn frame_dt(&mut self) -> f32;
}

/// Clamp a measured delta so a long hitch can't teleport entities
pub fn clamp_frame_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_FRAME_DT)
}

/// Wall-clock frame timer with an optional frame-rate cap
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    min_frame: Option<Duration>,
    // FPS tracking over the last 60 frames
    frame_times: [f32; 60],
    frame_index: usize,
    fps: u32,
}

impl FrameClock {
    pub fn new(max_fps: Option<u32>) -> Self {
        Self {
            last: Instant::now(),
            min_frame: max_fps
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps))),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Measured frames per second
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Clock for FrameClock {
    fn frame_dt(&mut self) -> f32 {
        if let Some(min_frame) = self.min_frame {
            let spent = self.last.elapsed();
            if spent < min_frame {
                std::thread::sleep(min_frame - spent);
            }
        }
        let now = Instant::now();
        let raw = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        self.frame_times[self.frame_index] = raw;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        let (count, total) = self
            .frame_times
            .iter()
            .filter(|&&t| t > 0.0)
            .fold((0u32, 0.0f32), |(n, sum), t| (n + 1, sum + t));
        if total > 0.0 {
            self.fps = (count as f32 / total).round() as u32;
        }

        clamp_frame_dt(raw)
    }
}

/// Constant delta every frame, for headless runs and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub dt: f32,
}

impl Clock for FixedClock {
    fn frame_dt(&mut self) -> f32 {
        clamp_frame_dt(self.dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_opposing_keys_cancel() {
        let sample = InputSample {
            left: true,
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(sample.to_tick_input().direction, IVec2::new(0, 1));
    }

    #[test]
    fn test_scripted_input_quits_when_exhausted() {
        let fire = InputSample {
            fire: true,
            ..Default::default()
        };
        let mut input = ScriptedInput::default().hold(fire, 2);
        assert_eq!(input.remaining(), 2);
        assert!(input.sample().fire);
        assert!(input.sample().fire);
        assert!(input.sample().quit);
        assert!(input.sample().quit);
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        assert_eq!(clamp_frame_dt(2.0), MAX_FRAME_DT);
        assert_eq!(clamp_frame_dt(-1.0), 0.0);
        assert_eq!(clamp_frame_dt(0.016), 0.016);
        assert_eq!(FixedClock { dt: 1.0 }.frame_dt(), MAX_FRAME_DT);
    }

    #[test]
    fn test_frame_clock_honours_cap() {
        let mut clock = FrameClock::new(Some(100));
        let start = Instant::now();
        for _ in 0..3 {
            let dt = clock.frame_dt();
            assert!(dt <= MAX_FRAME_DT);
        }
        // Three frames at 100 fps take at least ~30ms
        assert!(start.elapsed() >= Duration::from_millis(25));
        assert!(clock.fps() > 0);
    }
}
