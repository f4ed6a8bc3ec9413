//! Fixed-step physics and box collision resolution
//!
//! Bodies are integrated with flat per-tick constants (gravity, friction) and
//! then separated from every wall they overlap. Separation is axis-dominant:
//! the centre-to-centre offset decides whether a contact is treated as a
//! side hit or a floor/ceiling hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, StaticGeometry};
use crate::tuning::BodyTuning;

/// Upper bound on separation passes per tick
const MAX_RESOLVE_PASSES: usize = 4;

/// Below this horizontal speed a body counts as standing still
const MOVING_EPSILON: f32 = 0.01;

/// A moving box subject to gravity and collisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half: Vec2,
    pub on_ground: bool,
    pub on_ladder: bool,
}

impl DynamicBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half: size * 0.5,
            on_ground: false,
            on_ladder: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            center: self.pos,
            half: self.half,
        }
    }

    /// Renderer-facing motion state
    pub fn signals(&self) -> BodySignals {
        BodySignals {
            grounded: self.on_ground,
            airborne: !self.on_ground && !self.on_ladder,
            on_ladder: self.on_ladder,
            moving: self.vel.x.abs() > MOVING_EPSILON,
        }
    }
}

/// Discrete motion signals a presentation layer maps to animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodySignals {
    pub grounded: bool,
    pub airborne: bool,
    pub on_ladder: bool,
    pub moving: bool,
}

/// Which axis a contact is resolved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Pick the separation axis from centre offsets. An exact tie is vertical.
#[inline]
pub fn separation_axis(dx: f32, dy: f32) -> Axis {
    if dx.abs() > dy.abs() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Advance a body by one fixed tick.
///
/// `ladder_climb` enables ladder handling: while the body overlaps ladder
/// geometry gravity is suppressed and the vertical velocity is set to the
/// given value. Bodies that ignore ladders pass `None`.
pub fn step_body(
    body: &mut DynamicBody,
    geometry: &StaticGeometry,
    tuning: &BodyTuning,
    ladder_climb: Option<f32>,
) {
    let on_ladder = ladder_climb.is_some() && geometry.overlaps_ladder(&body.aabb());
    body.on_ladder = on_ladder;

    match ladder_climb {
        Some(climb) if on_ladder => body.vel.y = climb,
        _ => body.vel.y -= tuning.gravity,
    }
    body.vel.x *= tuning.friction;

    body.pos += body.vel;

    resolve_walls(body, geometry, tuning);

    body.vel = body
        .vel
        .clamp(Vec2::splat(-tuning.max_speed), Vec2::splat(tuning.max_speed));
}

/// Push a body out of every wall it overlaps and update `on_ground`
pub fn resolve_walls(body: &mut DynamicBody, geometry: &StaticGeometry, tuning: &BodyTuning) {
    body.on_ground = false;

    for _ in 0..MAX_RESOLVE_PASSES {
        let hits = geometry.walls_overlapping(&body.aabb());
        if hits.is_empty() {
            break;
        }

        for wall in hits {
            // An earlier correction this pass may already have cleared it
            if !body.aabb().overlaps(&wall) {
                continue;
            }
            separate(body, &wall, tuning.bounce);
        }
    }
}

fn separate(body: &mut DynamicBody, wall: &Aabb, bounce: f32) {
    let offset = body.pos - wall.center;

    match separation_axis(offset.x, offset.y) {
        Axis::Horizontal => {
            if offset.x > 0.0 {
                body.pos.x = wall.right() + body.half.x;
            } else {
                body.pos.x = wall.left() - body.half.x;
            }
            body.vel.x = -body.vel.x * bounce;
        }
        Axis::Vertical => {
            if offset.y > 0.0 {
                // Landed on top
                body.pos.y = wall.top() + body.half.y;
                body.vel.y = 0.0;
                body.on_ground = true;
            } else {
                // Hit the underside
                body.pos.y = wall.bottom() - body.half.y;
                body.vel.y = -body.vel.y * bounce;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn floor(from: i32, to: i32) -> Vec<Aabb> {
        (from..to)
            .map(|i| Aabb::tile(Vec2::new(32.0 + 64.0 * i as f32, 32.0)))
            .collect()
    }

    fn body_at(x: f32, y: f32) -> DynamicBody {
        DynamicBody::new(Vec2::new(x, y), Vec2::new(40.0, 40.0))
    }

    #[test]
    fn test_separation_axis_tie_is_vertical() {
        assert_eq!(separation_axis(10.0, 10.0), Axis::Vertical);
        assert_eq!(separation_axis(-10.0, 10.0), Axis::Vertical);
        assert_eq!(separation_axis(10.1, 10.0), Axis::Horizontal);
        assert_eq!(separation_axis(0.0, 0.0), Axis::Vertical);
    }

    #[test]
    fn test_gravity_and_friction_are_per_tick() {
        let geo = StaticGeometry::default();
        let mut body = body_at(100.0, 500.0);
        body.vel = Vec2::new(5.0, 0.0);

        step_body(&mut body, &geo, &BodyTuning::CREATURE, None);

        assert_eq!(body.vel, Vec2::new(4.0, -0.5));
        assert_eq!(body.pos, Vec2::new(104.0, 499.5));
        assert!(!body.on_ground);
    }

    #[test]
    fn test_lands_on_floor() {
        let geo = StaticGeometry::new(floor(0, 5), Vec::new());
        // Bottom edge 2 units above the floor top, falling fast
        let mut body = body_at(160.0, 86.0);
        body.vel.y = -8.0;

        step_body(&mut body, &geo, &BodyTuning::CREATURE, None);

        assert!(body.on_ground);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.aabb().bottom(), 64.0);
        assert!(body.signals().grounded);
        assert!(!body.signals().airborne);
    }

    #[test]
    fn test_resting_body_stays_grounded() {
        let geo = StaticGeometry::new(floor(0, 5), Vec::new());
        let mut body = body_at(160.0, 84.0);

        for _ in 0..10 {
            step_body(&mut body, &geo, &BodyTuning::PLAYER, None);
            assert!(body.on_ground);
            assert_eq!(body.pos.y, 84.0);
        }
    }

    #[test]
    fn test_side_hit_bounces_horizontally() {
        let wall = Aabb::tile(Vec2::new(232.0, 100.0));
        let geo = StaticGeometry::new(vec![wall], Vec::new());
        // Right edge at 198, moving right into the wall at x=200
        let mut body = body_at(178.0, 100.0);
        body.vel = Vec2::new(8.0, 0.0);

        let tuning = BodyTuning {
            gravity: 0.0,
            friction: 1.0,
            bounce: 0.5,
            max_speed: 10.0,
        };
        step_body(&mut body, &geo, &tuning, None);

        assert_eq!(body.aabb().right(), wall.left());
        assert_eq!(body.vel.x, -4.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_ceiling_hit_inverts_and_dampens() {
        let ceiling = Aabb::tile(Vec2::new(100.0, 200.0));
        let geo = StaticGeometry::new(vec![ceiling], Vec::new());
        let mut body = body_at(100.0, 140.0);
        body.vel.y = 9.0;

        step_body(&mut body, &geo, &BodyTuning::CREATURE, None);

        assert_eq!(body.aabb().top(), ceiling.bottom());
        assert_eq!(body.vel.y, -4.25);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_exact_tie_resolves_vertically() {
        // After moving, the body centre sits exactly on the wall's diagonal
        let wall = Aabb::tile(Vec2::new(0.0, 0.0));
        let geo = StaticGeometry::new(vec![wall], Vec::new());
        let mut body = body_at(50.0, 50.0);
        let tuning = BodyTuning {
            gravity: 0.0,
            friction: 1.0,
            bounce: 0.0,
            max_speed: 100.0,
        };

        step_body(&mut body, &geo, &tuning, None);

        assert!(body.on_ground);
        assert_eq!(body.pos, Vec2::new(50.0, 52.0));
    }

    #[test]
    fn test_velocity_clamped() {
        let geo = StaticGeometry::default();
        let mut body = body_at(0.0, 1000.0);
        body.vel = Vec2::new(50.0, -50.0);
        step_body(&mut body, &geo, &BodyTuning::CREATURE, None);
        assert_eq!(body.vel, Vec2::new(10.0, -10.0));
    }

    #[test]
    fn test_ladder_suppresses_gravity() {
        let ladder = Aabb::tile(Vec2::new(100.0, 300.0));
        let geo = StaticGeometry::new(Vec::new(), vec![ladder]);

        let mut climber = body_at(100.0, 300.0);
        step_body(&mut climber, &geo, &BodyTuning::PLAYER, Some(5.0));
        assert!(climber.on_ladder);
        assert_eq!(climber.vel.y, 5.0);
        assert_eq!(climber.pos.y, 305.0);
        assert!(climber.signals().on_ladder);
        assert!(!climber.signals().airborne);

        let mut hanging = body_at(100.0, 300.0);
        step_body(&mut hanging, &geo, &BodyTuning::PLAYER, Some(0.0));
        assert_eq!(hanging.pos.y, 300.0);

        // Bodies without ladder handling fall straight through
        let mut walker = body_at(100.0, 300.0);
        step_body(&mut walker, &geo, &BodyTuning::PLAYER, None);
        assert!(!walker.on_ladder);
        assert_eq!(walker.vel.y, -1.0);
    }

    proptest! {
        #[test]
        fn prop_no_wall_overlap_after_step(
            x in 100.0f32..500.0,
            y in 93.0f32..300.0,
            vx in -18.0f32..18.0,
            vy in -18.0f32..18.0,
        ) {
            let mut walls = floor(0, 10);
            walls.push(Aabb::tile(Vec2::new(544.0, 96.0)));
            let geo = StaticGeometry::new(walls, Vec::new());

            let mut body = DynamicBody::new(Vec2::new(x, y), Vec2::new(43.0, 58.0));
            body.vel = Vec2::new(vx, vy);
            step_body(&mut body, &geo, &BodyTuning::PLAYER, None);

            // Allow for float rounding when snapping to an edge
            let shrunk = Aabb { center: body.pos, half: body.half - Vec2::splat(1e-3) };
            prop_assert!(!geo.overlaps_wall(&shrunk));
        }

        #[test]
        fn prop_speed_bounded(
            vx in -100.0f32..100.0,
            vy in -100.0f32..100.0,
            y in 93.0f32..300.0,
        ) {
            let geo = StaticGeometry::new(floor(0, 10), Vec::new());
            let tuning = BodyTuning::CREATURE;
            let mut body = body_at(320.0, y);
            body.vel = Vec2::new(vx, vy);
            step_body(&mut body, &geo, &tuning, None);
            prop_assert!(body.vel.x.abs() <= tuning.max_speed);
            prop_assert!(body.vel.y.abs() <= tuning.max_speed);
        }
    }
}
