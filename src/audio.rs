//! Audio mixing for simulation events
//!
//! Playback itself belongs to the host. `AudioManager` turns `GameEvent`s
//! into sound requests at the right volume and hands them to an
//! `AudioBackend`.

use crate::consts::{MUSIC_VOLUME, SHOOT_VOLUME};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A volley leaves the player
    Shoot,
    /// A bullet hits an enemy
    Impact,
}

impl SoundEffect {
    /// Per-effect gain applied before the mixer volumes
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Shoot => SHOOT_VOLUME,
            SoundEffect::Impact => 1.0,
        }
    }
}

/// Host-side playback
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start (or re-level) the looping music track
    fn start_music(&mut self, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("Sound {:?} at {:.2}", effect, volume);
    }

    fn start_music(&mut self, volume: f32) {
        log::trace!("Music at {:.2}", volume);
    }

    fn stop_music(&mut self) {}
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: MUSIC_VOLUME,
            muted: false,
            music_playing: false,
        }
    }

    /// Manager with the volumes from `settings`
    pub fn from_settings(settings: &Settings, backend: B) -> Self {
        let mut audio = Self::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.relevel_music();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.relevel_music();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.relevel_music();
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.base_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    pub fn start_music(&mut self) {
        self.music_playing = true;
        self.backend.start_music(self.effective_music_volume());
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.music_playing = false;
            self.backend.stop_music();
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    fn relevel_music(&mut self) {
        if self.music_playing {
            self.backend.start_music(self.effective_music_volume());
        }
    }

    /// React to the events of one tick
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Shot { .. } => self.play(SoundEffect::Shoot),
                GameEvent::Impact { .. } => self.play(SoundEffect::Impact),
                GameEvent::GameOver { .. } => self.stop_music(),
                GameEvent::EnemySpawned { .. }
                | GameEvent::EnemyKilled { .. }
                | GameEvent::PlayerCaught { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TerminationCause;
    use glam::Vec2;

    #[derive(Debug, Default)]
    struct Recorder {
        sounds: Vec<(SoundEffect, f32)>,
        music: Option<f32>,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.sounds.push((effect, volume));
        }

        fn start_music(&mut self, volume: f32) {
            self.music = Some(volume);
        }

        fn stop_music(&mut self) {
            self.music = None;
        }
    }

    #[test]
    fn test_events_map_to_sounds() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(1.0);
        audio.handle_events(&[
            GameEvent::Shot {
                origin: Vec2::ZERO,
                count: 8,
            },
            GameEvent::Impact { pos: Vec2::ZERO },
        ]);
        assert_eq!(
            audio.backend().sounds,
            vec![(SoundEffect::Shoot, 0.2), (SoundEffect::Impact, 1.0)]
        );
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Impact);
        assert!(audio.backend().sounds.is_empty());
    }

    #[test]
    fn test_volumes_multiply_and_clamp() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(3.0);
        audio.play(SoundEffect::Impact);
        assert_eq!(audio.backend().sounds, vec![(SoundEffect::Impact, 0.5)]);
    }

    #[test]
    fn test_music_follows_volume_and_game_over() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(1.0);
        audio.start_music();
        assert_eq!(audio.backend().music, Some(0.5));

        audio.set_muted(true);
        assert_eq!(audio.backend().music, Some(0.0));
        audio.set_muted(false);

        audio.handle_events(&[GameEvent::GameOver {
            cause: TerminationCause::Quit,
        }]);
        assert!(!audio.music_playing());
        assert_eq!(audio.backend().music, None);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let mut audio = AudioManager::from_settings(&settings, Recorder::default());
        audio.play(SoundEffect::Impact);
        assert_eq!(audio.backend().sounds, vec![(SoundEffect::Impact, 0.25)]);
    }
}
