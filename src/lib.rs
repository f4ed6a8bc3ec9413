//! Dungeon Platformer - runtime core of a 2D side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, patrol AI, particles, level state)
//! - `records`: Best-result store keyed by level
//! - `persistence`: JSON file helpers with atomic writes
//! - `tuning`: Data-driven game balance
//! - `audio`: Event to sound-cue mapping (playback lives elsewhere)
//! - `game`: Fixed-step driver tying the pieces together
//! - `demo`: Scripted autopilot for headless runs

pub mod audio;
pub mod demo;
pub mod game;
pub mod persistence;
pub mod records;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use records::{LevelKey, RecordEntry, RecordStore, Records, Submission};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the per-tick constants assume)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side length of a square level tile
    pub const TILE: f32 = 64.0;

    /// Player hitbox (adventurer sprite at 0.45 scale)
    pub const PLAYER_WIDTH: f32 = 43.0;
    pub const PLAYER_HEIGHT: f32 = 58.0;

    /// Patrolling creature hitbox
    pub const ENEMY_WIDTH: f32 = 48.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;

    /// Pickup hitboxes
    pub const COIN_SIZE: f32 = 40.0;
    pub const ITEM_SIZE: f32 = 48.0;

    /// File the record store writes to by default
    pub const RECORDS_FILE: &str = "records.json";
    /// Optional tuning override file
    pub const TUNING_FILE: &str = "tuning.json";
}

/// Format whole seconds as `"M m. S s."`, the way the win screens show times
pub fn format_duration(secs: u64) -> String {
    format!("{} m. {} s.", secs / 60, secs % 60)
}

/// Centre of a tile in world coordinates (y grows upward, row 0 is the top row)
#[inline]
pub fn tile_center(col: usize, row: usize, rows: usize) -> Vec2 {
    Vec2::new(
        col as f32 * consts::TILE + consts::TILE / 2.0,
        (rows - row) as f32 * consts::TILE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_center_flips_rows() {
        let top = tile_center(0, 0, 7);
        let bottom = tile_center(0, 6, 7);
        assert_eq!(top, Vec2::new(32.0, 448.0));
        assert_eq!(bottom, Vec2::new(32.0, 64.0));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 m. 0 s.");
        assert_eq!(format_duration(125), "2 m. 5 s.");
    }
}
