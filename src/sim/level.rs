//! Level loading from symbolic tile grids
//!
//! Legend:
//! - `1` `2` `s` `g`: wall          - `L` `T`: ladder
//! - `S`: spikes  `B`: bomb         - `C`: coin  `D`: diamond  `K`: key
//! - `M`: mouse   `F`: frog         - `m`: mushroom (decoration)
//! - `E`: door    `d`: door top     - `P`: player start
//! - `0` or space: empty
//!
//! Row 0 is the top of the level.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Aabb, StaticGeometry};
use super::patrol::RescueKind;
use crate::consts::TILE;
use crate::tile_center;

/// The first level: walls, two coins, a key and a door
pub const LEVEL_1: &[&str] = &[
    "11111111111d1",
    "1P000000000E1",
    "1011101110111",
    "100000C000001",
    "1011110111101",
    "1C00000000K01",
    "1111111111111",
];

/// The second level: ladders, hazards and creatures to rescue
pub const LEVEL_2: &[&str] = &[
    "11111111111111",
    "1000m0s000d001",
    "1000111000E001",
    "10000g00011101",
    "1FD02200C00001",
    "11100001100001",
    "100000C0M00T01",
    "10011111111L01",
    "1m000000000L01",
    "12200000000L01",
    "1000C0000BKL01",
    "10011100011101",
    "1P000mSSS0C001",
    "11111211111111",
];

/// Which rule set a level plays under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelMode {
    /// Coins, a key and a door. No health, no hazards, no ladders.
    Simple,
    /// Health, spikes, bombs, ladders and creatures to rescue
    Hazard,
}

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,

    #[error("unknown tile {symbol:?} at row {row}, column {col}")]
    UnknownTile { symbol: char, row: usize, col: usize },

    #[error("level has no player start")]
    MissingPlayer,

    #[error("second player start at row {row}, column {col}")]
    DuplicatePlayer { row: usize, col: usize },

    #[error("no built-in level {0}")]
    UnknownLevel(u32),
}

/// Everything a session needs to start a level
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub id: u32,
    pub mode: LevelMode,
    pub geometry: StaticGeometry,
    pub player_start: Vec2,
    pub coins: Vec<Vec2>,
    pub diamonds: Vec<Vec2>,
    pub keys: Vec<Vec2>,
    pub doors: Vec<Aabb>,
    pub spikes: Vec<Vec2>,
    pub bombs: Vec<Vec2>,
    pub creatures: Vec<(RescueKind, Vec2)>,
    pub decorations: Vec<Vec2>,
    /// World size in pixels
    pub size: Vec2,
}

/// Look up one of the shipped levels by number
pub fn builtin(id: u32) -> Result<LevelLayout, LevelError> {
    match id {
        1 => parse_level(1, LevelMode::Simple, LEVEL_1),
        2 => parse_level(2, LevelMode::Hazard, LEVEL_2),
        other => Err(LevelError::UnknownLevel(other)),
    }
}

/// Parse a tile grid into terrain and entity placements
pub fn parse_level<S: AsRef<str>>(
    id: u32,
    mode: LevelMode,
    rows: &[S],
) -> Result<LevelLayout, LevelError> {
    if rows.is_empty() {
        return Err(LevelError::Empty);
    }
    let height = rows.len();
    let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);

    let mut walls = Vec::new();
    let mut ladders = Vec::new();
    let mut player_start = None;
    let mut layout = LevelLayout {
        id,
        mode,
        geometry: StaticGeometry::default(),
        player_start: Vec2::ZERO,
        coins: Vec::new(),
        diamonds: Vec::new(),
        keys: Vec::new(),
        doors: Vec::new(),
        spikes: Vec::new(),
        bombs: Vec::new(),
        creatures: Vec::new(),
        decorations: Vec::new(),
        size: Vec2::new(width as f32 * TILE, height as f32 * TILE),
    };

    for (row, line) in rows.iter().enumerate() {
        for (col, symbol) in line.as_ref().chars().enumerate() {
            let pos = tile_center(col, row, height);
            match symbol {
                '0' | ' ' => {}
                '1' | '2' | 's' | 'g' => walls.push(Aabb::tile(pos)),
                'L' | 'T' => ladders.push(Aabb::tile(pos)),
                'S' => layout.spikes.push(pos),
                'B' => layout.bombs.push(pos),
                'C' => layout.coins.push(pos),
                'D' => layout.diamonds.push(pos),
                'K' => layout.keys.push(pos),
                'M' => layout.creatures.push((RescueKind::Mouse, pos)),
                'F' => layout.creatures.push((RescueKind::Frog, pos)),
                'm' => layout.decorations.push(pos),
                'E' => layout.doors.push(Aabb::tile(pos)),
                'd' => match mode {
                    // The simple level's door top is set into the ceiling
                    LevelMode::Simple => {
                        walls.push(Aabb::tile(pos));
                        layout
                            .doors
                            .push(Aabb::tile(pos - Vec2::new(0.0, TILE / 6.0)));
                    }
                    LevelMode::Hazard => layout.doors.push(Aabb::tile(pos)),
                },
                'P' => {
                    if player_start.is_some() {
                        return Err(LevelError::DuplicatePlayer { row, col });
                    }
                    player_start = Some(pos);
                }
                symbol => return Err(LevelError::UnknownTile { symbol, row, col }),
            }
        }
    }

    layout.player_start = player_start.ok_or(LevelError::MissingPlayer)?;
    layout.geometry = StaticGeometry::new(walls, ladders);

    log::info!(
        "Level {} parsed: {}x{} tiles, {} walls, {} ladders, {} coins",
        id,
        width,
        height,
        layout.geometry.walls().len(),
        layout.geometry.ladders().len(),
        layout.coins.len()
    );

    Ok(layout)
}
