//! Data-driven game balance
//!
//! Every tunable constant of the simulation lives in one immutable [`Tuning`]
//! value handed to the session at construction. Defaults reproduce the
//! classic game feel; a JSON override file may replace any subset.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence;

/// Effects quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

/// A quality name that isn't one of the presets
#[derive(Debug, Error, PartialEq)]
#[error("unknown quality preset {0:?} (expected low, medium or high)")]
pub struct UnknownPreset(pub String);

impl FromStr for QualityPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        };
        f.write_str(name)
    }
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Per-tick physics constants for one kind of body.
///
/// Values are per fixed tick, not per second: gravity is subtracted from the
/// vertical velocity once per tick and friction multiplies the horizontal
/// velocity once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTuning {
    pub gravity: f32,
    /// Horizontal damping factor (1.0 = none)
    pub friction: f32,
    /// Fraction of velocity kept (and inverted) when bouncing off a wall
    pub bounce: f32,
    /// Both velocity components are clamped to `[-max_speed, max_speed]`
    pub max_speed: f32,
}

impl BodyTuning {
    /// Generic physics object (patrolling creatures)
    pub const CREATURE: Self = Self {
        gravity: 0.5,
        friction: 0.8,
        bounce: 0.5,
        max_speed: 10.0,
    };

    /// Player body: stronger gravity, no damping, fast enough to jump
    pub const PLAYER: Self = Self {
        gravity: 1.0,
        friction: 1.0,
        bounce: 0.0,
        max_speed: 18.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub body: BodyTuning,
    /// Horizontal speed while a move intent is held
    pub walk_speed: f32,
    /// Vertical velocity applied by a grounded jump
    pub jump_speed: f32,
    /// Vertical velocity while climbing a ladder
    pub climb_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            body: BodyTuning::PLAYER,
            walk_speed: 5.0,
            jump_speed: 18.0,
            climb_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolTuning {
    pub body: BodyTuning,
    /// Direction reversal interval is sampled from `[min_interval, max_interval)`
    pub min_interval: f32,
    pub max_interval: f32,
    /// Chance per grounded tick of a hop
    pub hop_chance: f64,
    /// Hop impulse is sampled from `[hop_min, hop_max)`
    pub hop_min: f32,
    pub hop_max: f32,
    pub mouse_speed: f32,
    pub frog_speed: f32,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            body: BodyTuning::CREATURE,
            min_interval: 1.0,
            max_interval: 3.0,
            hop_chance: 0.01,
            hop_min: 3.0,
            hop_max: 6.0,
            mouse_speed: 0.8,
            frog_speed: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardTuning {
    pub max_hp: u32,
    pub spike_damage: u32,
    /// Seconds a spike stays harmless after hurting the player
    pub spike_cooldown: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            max_hp: 100,
            spike_damage: 10,
            spike_cooldown: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleTuning {
    /// Particles only advance once this much time has accumulated
    pub update_interval: f32,
    /// Velocity multiplier per update
    pub drag: f32,
    /// Downward pull subtracted from velocity per update
    pub gravity: f32,
    /// Movement is scaled by `dt * frame_rate`
    pub frame_rate: f32,
    pub quality: QualityPreset,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            update_interval: 1.0 / 60.0,
            drag: 0.95,
            gravity: 0.5,
            frame_rate: 60.0,
            quality: QualityPreset::Medium,
        }
    }
}

impl ParticleTuning {
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub patrol: PatrolTuning,
    pub hazards: HazardTuning,
    pub particles: ParticleTuning,
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Self::default();
        }
        match persistence::read_json::<Tuning>(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Apply an effects preset
    pub fn with_quality(mut self, preset: QualityPreset) -> Self {
        self.particles.quality = preset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let t = Tuning::default();
        assert_eq!(t.player.walk_speed, 5.0);
        assert_eq!(t.player.jump_speed, 18.0);
        assert_eq!(t.player.body.gravity, 1.0);
        assert_eq!(t.patrol.body, BodyTuning::CREATURE);
        assert_eq!(t.hazards.spike_damage, 10);
        assert_eq!(t.hazards.spike_cooldown, 1.0);
        assert_eq!(t.hazards.max_hp, 100);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{"hazards": {"max_hp": 50, "spike_damage": 25, "spike_cooldown": 0.5}}"#;
        let t: Tuning = serde_json::from_str(json).unwrap();
        assert_eq!(t.hazards.max_hp, 50);
        assert_eq!(t.player, PlayerTuning::default());
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(Tuning::load(&missing), Tuning::default());

        let corrupt = dir.path().join("tuning.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(Tuning::load(&corrupt), Tuning::default());
    }

    #[test]
    fn test_quality_preset() {
        assert_eq!("LOW".parse::<QualityPreset>(), Ok(QualityPreset::Low));
        assert_eq!(
            "ultra".parse::<QualityPreset>(),
            Err(UnknownPreset("ultra".to_string()))
        );
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(preset.to_string().parse::<QualityPreset>(), Ok(preset));
        }
        let t = Tuning::default().with_quality(QualityPreset::Low);
        assert_eq!(t.particles.max_particles(), 100);
    }
}
