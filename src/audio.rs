//! Sound cue mapping
//!
//! The core never plays audio. It turns game events into named cues and
//! hands them to whatever [`CueSink`] the host provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Coin picked up
    Coin,
    /// Diamond picked up
    Diamond,
    /// Key picked up
    Key,
    Jump,
    /// Climbing step on a ladder
    Ladder,
    /// Spike damage
    SpikeHit,
    BombExplode,
    /// Creature rescued
    Rescue,
    /// Level won
    Win,
    /// Health ran out
    GameOver,
}

impl SoundEffect {
    /// Cue for an event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        Some(match event {
            GameEvent::CoinCollected { .. } => SoundEffect::Coin,
            GameEvent::DiamondCollected { .. } => SoundEffect::Diamond,
            GameEvent::KeyCollected { .. } => SoundEffect::Key,
            GameEvent::Jumped => SoundEffect::Jump,
            GameEvent::Climbed => SoundEffect::Ladder,
            GameEvent::SpikeHit { .. } => SoundEffect::SpikeHit,
            GameEvent::BombExploded { .. } => SoundEffect::BombExplode,
            GameEvent::Rescued { .. } => SoundEffect::Rescue,
            GameEvent::Won { .. } => SoundEffect::Win,
            GameEvent::Lost => SoundEffect::GameOver,
        })
    }

    /// Asset name a host can resolve to a sound file
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Coin => "coin1",
            SoundEffect::Diamond => "coin3",
            SoundEffect::Key => "coin5",
            SoundEffect::Jump => "phaseJump1",
            SoundEffect::Ladder => "rockHit2",
            SoundEffect::SpikeHit => "hit3",
            SoundEffect::BombExplode => "explosion1",
            SoundEffect::Rescue => "upgrade3",
            SoundEffect::Win => "secret4",
            SoundEffect::GameOver => "gameover2",
        }
    }
}

/// Receives cues with their effective volume
pub trait CueSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("cue {} at {:.2}", effect.name(), volume);
    }
}

/// Volume and mute state in front of a sink
#[derive(Debug)]
pub struct AudioManager<S: CueSink> {
    sink: S,
    master_volume: f32,
    muted: bool,
}

impl<S: CueSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the cue for every event that has one
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
