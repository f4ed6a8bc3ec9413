//! Axis-aligned boxes and immutable level terrain
//!
//! Terrain is built once per level and never mutated, so every body in the
//! session can query it through a shared reference.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE;

/// Axis-aligned bounding box stored as centre + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// A full tile centred at `center`
    pub fn tile(center: Vec2) -> Self {
        Self::new(center, Vec2::splat(TILE))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }
}

/// Uniform grid over box indices, one cell per tile
#[derive(Debug, Clone, Default)]
struct GridIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl GridIndex {
    fn cell_range(aabb: &Aabb) -> (i32, i32, i32, i32) {
        (
            (aabb.left() / TILE).floor() as i32,
            (aabb.right() / TILE).floor() as i32,
            (aabb.bottom() / TILE).floor() as i32,
            (aabb.top() / TILE).floor() as i32,
        )
    }

    fn build(boxes: &[Aabb]) -> Self {
        let mut index = Self::default();
        for (i, aabb) in boxes.iter().enumerate() {
            let (x0, x1, y0, y1) = Self::cell_range(aabb);
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    index.cells.entry((cx, cy)).or_default().push(i);
                }
            }
        }
        index
    }

    /// Candidate indices, sorted so iteration order is stable
    fn candidates(&self, aabb: &Aabb) -> Vec<usize> {
        let (x0, x1, y0, y1) = Self::cell_range(aabb);
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(ids);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

/// Immutable collision geometry for one level
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    walls: Vec<Aabb>,
    ladders: Vec<Aabb>,
    wall_index: GridIndex,
    ladder_index: GridIndex,
}

impl StaticGeometry {
    pub fn new(walls: Vec<Aabb>, ladders: Vec<Aabb>) -> Self {
        let wall_index = GridIndex::build(&walls);
        let ladder_index = GridIndex::build(&ladders);
        Self {
            walls,
            ladders,
            wall_index,
            ladder_index,
        }
    }

    pub fn walls(&self) -> &[Aabb] {
        &self.walls
    }

    pub fn ladders(&self) -> &[Aabb] {
        &self.ladders
    }

    /// Walls overlapping `aabb`, in construction order
    pub fn walls_overlapping(&self, aabb: &Aabb) -> Vec<Aabb> {
        self.wall_index
            .candidates(aabb)
            .into_iter()
            .map(|i| self.walls[i])
            .filter(|w| w.overlaps(aabb))
            .collect()
    }

    pub fn overlaps_wall(&self, aabb: &Aabb) -> bool {
        self.wall_index
            .candidates(aabb)
            .into_iter()
            .any(|i| self.walls[i].overlaps(aabb))
    }

    pub fn overlaps_ladder(&self, aabb: &Aabb) -> bool {
        self.ladder_index
            .candidates(aabb)
            .into_iter()
            .any(|i| self.ladders[i].overlaps(aabb))
    }
}
