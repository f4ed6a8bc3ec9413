//! Patrol AI for wandering creatures
//!
//! A creature walks in one direction until a randomly sampled interval
//! elapses, then turns around. Grounded creatures occasionally hop.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{DynamicBody, step_body};
use super::geometry::StaticGeometry;
use crate::consts::{ENEMY_HEIGHT, ENEMY_WIDTH};
use crate::tuning::PatrolTuning;

/// Which creature this is; each kind has its own rescue flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RescueKind {
    Mouse,
    Frog,
}

impl RescueKind {
    pub fn move_speed(&self, tuning: &PatrolTuning) -> f32 {
        match self {
            RescueKind::Mouse => tuning.mouse_speed,
            RescueKind::Frog => tuning.frog_speed,
        }
    }
}

/// A patrolling creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: RescueKind,
    pub body: DynamicBody,
    /// +1 walks right, -1 walks left
    pub direction: f32,
    pub timer: f32,
    pub interval: f32,
    pub move_speed: f32,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        kind: RescueKind,
        pos: Vec2,
        tuning: &PatrolTuning,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            kind,
            body: DynamicBody::new(pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)),
            direction: 1.0,
            timer: 0.0,
            interval: sample_interval(tuning, rng),
            move_speed: kind.move_speed(tuning),
        }
    }
}

fn sample_interval<R: Rng + ?Sized>(tuning: &PatrolTuning, rng: &mut R) -> f32 {
    if tuning.max_interval > tuning.min_interval {
        rng.random_range(tuning.min_interval..tuning.max_interval)
    } else {
        tuning.min_interval
    }
}

/// Advance one creature by a tick: patrol timer, physics, then maybe a hop
pub fn update_ai<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    dt: f32,
    geometry: &StaticGeometry,
    tuning: &PatrolTuning,
    rng: &mut R,
) {
    enemy.timer += dt;
    if enemy.timer >= enemy.interval {
        enemy.direction = -enemy.direction;
        enemy.timer = 0.0;
        enemy.interval = sample_interval(tuning, rng);
    }

    enemy.body.vel.x = enemy.move_speed * enemy.direction;
    step_body(&mut enemy.body, geometry, &tuning.body, None);

    if enemy.body.on_ground && rng.random_bool(tuning.hop_chance.clamp(0.0, 1.0)) {
        enemy.body.vel.y = if tuning.hop_max > tuning.hop_min {
            rng.random_range(tuning.hop_min..tuning.hop_max)
        } else {
            tuning.hop_min
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Aabb;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn flat_floor() -> StaticGeometry {
        let walls = (0..20)
            .map(|i| Aabb::tile(Vec2::new(32.0 + 64.0 * i as f32, 32.0)))
            .collect();
        StaticGeometry::new(walls, Vec::new())
    }

    fn resting_enemy(rng: &mut Pcg32, tuning: &PatrolTuning) -> Enemy {
        Enemy::new(1, RescueKind::Mouse, Vec2::new(640.0, 84.0), tuning, rng)
    }

    #[test]
    fn test_interval_in_range() {
        let tuning = PatrolTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let i = sample_interval(&tuning, &mut rng);
            assert!((1.0..3.0).contains(&i));
        }
    }

    #[test]
    fn test_direction_flips_when_timer_elapses() {
        let tuning = PatrolTuning {
            hop_chance: 0.0,
            ..Default::default()
        };
        let geo = flat_floor();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = resting_enemy(&mut rng, &tuning);
        enemy.interval = 0.45;

        for _ in 0..4 {
            update_ai(&mut enemy, 0.1, &geo, &tuning, &mut rng);
        }
        assert_eq!(enemy.direction, 1.0);
        assert!(enemy.body.pos.x > 640.0);

        update_ai(&mut enemy, 0.1, &geo, &tuning, &mut rng);
        assert_eq!(enemy.direction, -1.0);
        assert_eq!(enemy.timer, 0.0);
        assert!((1.0..3.0).contains(&enemy.interval));
        assert!(enemy.body.vel.x < 0.0);
    }

    #[test]
    fn test_velocity_follows_direction_and_speed() {
        let tuning = PatrolTuning {
            hop_chance: 0.0,
            ..Default::default()
        };
        let geo = flat_floor();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::new(1, RescueKind::Frog, Vec2::new(640.0, 84.0), &tuning, &mut rng);

        update_ai(&mut enemy, 1.0 / 60.0, &geo, &tuning, &mut rng);

        // 1.2 damped once by friction 0.8
        assert!((enemy.body.vel.x - 0.96).abs() < 1e-6);
        assert!(enemy.body.on_ground);
    }

    #[test]
    fn test_grounded_creature_hops_when_chance_is_certain() {
        let tuning = PatrolTuning {
            hop_chance: 1.0,
            ..Default::default()
        };
        let geo = flat_floor();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemy = resting_enemy(&mut rng, &tuning);

        update_ai(&mut enemy, 1.0 / 60.0, &geo, &tuning, &mut rng);
        assert!((3.0..6.0).contains(&enemy.body.vel.y));

        // Airborne next tick, so no second hop
        update_ai(&mut enemy, 1.0 / 60.0, &geo, &tuning, &mut rng);
        assert!(!enemy.body.on_ground);
    }

    #[test]
    fn test_hop_rate_matches_chance() {
        let tuning = PatrolTuning {
            hop_chance: 0.01,
            ..Default::default()
        };
        let geo = flat_floor();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut enemy = resting_enemy(&mut rng, &tuning);

        let mut hops = 0;
        for _ in 0..10_000 {
            enemy.body.pos = Vec2::new(640.0, 84.0);
            enemy.body.vel = Vec2::ZERO;
            enemy.body.on_ground = true;
            update_ai(&mut enemy, 1.0 / 60.0, &geo, &tuning, &mut rng);
            if enemy.body.vel.y > 0.0 {
                assert!((3.0..6.0).contains(&enemy.body.vel.y));
                hops += 1;
            }
        }
        // About one grounded tick in a hundred
        assert!((60..=140).contains(&hops), "{hops} hops");
    }

    #[test]
    fn test_same_seed_same_patrol() {
        let tuning = PatrolTuning::default();
        let geo = flat_floor();
        let run = |seed: u64| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemy = resting_enemy(&mut rng, &tuning);
            for _ in 0..600 {
                update_ai(&mut enemy, 1.0 / 60.0, &geo, &tuning, &mut rng);
            }
            enemy
        };
        assert_eq!(run(42), run(42));
    }
}
