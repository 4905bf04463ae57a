//! Sound effect dispatch
//!
//! The simulation never plays audio itself. After each tick the host hands the
//! tick's events to an [`AudioManager`], which maps them to effects and fires
//! them at a [`SoundBackend`]. Nothing comes back.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fired
    Shot,
    /// A player bullet landed
    Hit,
    /// Health potion drunk
    Potion,
}

/// Oscillator shape for procedural playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// A single enveloped tone: frequency sweeps from `start_hz` to `end_hz`
/// while the gain ramps from `gain` down to silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds
    pub duration: f32,
    pub gain: f32,
}

impl SoundEffect {
    /// Synth recipe for backends without sample files
    pub fn tone(&self) -> Tone {
        match self {
            // Short bright snap
            SoundEffect::Shot => Tone {
                waveform: Waveform::Square,
                start_hz: 900.0,
                end_hz: 200.0,
                duration: 0.06,
                gain: 0.25,
            },
            // Dull thud
            SoundEffect::Hit => Tone {
                waveform: Waveform::Sine,
                start_hz: 180.0,
                end_hz: 60.0,
                duration: 0.1,
                gain: 0.5,
            },
            // Rising fizz
            SoundEffect::Potion => Tone {
                waveform: Waveform::Triangle,
                start_hz: 400.0,
                end_hz: 1200.0,
                duration: 0.25,
                gain: 0.4,
            },
        }
    }
}

/// Effect for an event, if it makes a sound
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::ShotFired { .. } => Some(SoundEffect::Shot),
        GameEvent::EnemyHit { .. } => Some(SoundEffect::Hit),
        GameEvent::PotionConsumed { .. } => Some(SoundEffect::Potion),
        _ => None,
    }
}

/// Where sounds end up
pub trait SoundBackend {
    /// Fire and forget; `volume` is already scaled and never zero
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend for headless runs: logs each effect at trace level
#[derive(Debug, Default)]
pub struct LogBackend {
    /// Effects played so far
    pub played: u64,
}

impl SoundBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played += 1;
        let tone = effect.tone();
        log::trace!(
            "sfx {effect:?} {:?} {}->{}Hz {:.2}s vol {volume:.2}",
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.duration
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<B: SoundBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volume and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol * effect.tone().gain);
    }

    /// Play whatever this tick's events call for, in event order
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(sound_for) {
            self.play(effect);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
