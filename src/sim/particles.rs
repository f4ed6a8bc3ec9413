//! Particle system for visual effects
//!
//! Purely cosmetic: nothing here feeds back into gameplay. Particles are
//! advanced in batches once enough time has accumulated, so the cadence is
//! independent of how often the caller ticks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::ParticleTuning;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const ORANGE_RED: Rgb = Rgb(255, 69, 0);
    pub const GOLD: Rgb = Rgb(255, 215, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
}

/// Burst presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    Explosion,
    Sparkle,
}

impl BurstKind {
    pub fn default_color(&self) -> Rgb {
        match self {
            BurstKind::Explosion => Rgb::ORANGE,
            BurstKind::Sparkle => Rgb::GOLD,
        }
    }

    pub fn default_count(&self) -> usize {
        match self {
            BurstKind::Explosion => 20,
            BurstKind::Sparkle => 10,
        }
    }

    /// Inclusive size range in pixels
    fn size_range(&self) -> (u32, u32) {
        match self {
            BurstKind::Explosion => (2, 5),
            BurstKind::Sparkle => (1, 3),
        }
    }

    fn lifetime_range(&self) -> (f32, f32) {
        match self {
            BurstKind::Explosion => (0.5, 1.5),
            BurstKind::Sparkle => (0.3, 0.8),
        }
    }

    fn speed_range(&self) -> (f32, f32) {
        match self {
            BurstKind::Explosion => (10.0, 30.0),
            BurstKind::Sparkle => (10.0, 30.0),
        }
    }

    /// Longest lifetime a particle of this kind can get
    pub fn max_lifetime(&self) -> f32 {
        self.lifetime_range().1
    }
}

/// A single particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub color: Rgb,
    pub size: f32,
}

impl Particle {
    /// Opacity fades linearly from 255 to 0 over the lifetime
    pub fn alpha(&self) -> u8 {
        let t = if self.lifetime > 0.0 {
            self.age / self.lifetime
        } else {
            1.0
        };
        (255.0 * (1.0 - t)).clamp(0.0, 255.0) as u8
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Advance by `dt`. Returns false once expired.
    fn advance(&mut self, dt: f32, tuning: &ParticleTuning) -> bool {
        self.age += dt;
        if self.is_expired() {
            return false;
        }
        self.vel *= tuning.drag;
        self.vel.y -= tuning.gravity;
        self.pos += self.vel * dt * tuning.frame_rate;
        true
    }
}

/// Read-only view handed to renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: Rgb,
    pub size: f32,
    pub alpha: u8,
}

/// Owns every live particle
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    since_last_update: f32,
    tuning: ParticleTuning,
}

impl ParticleSystem {
    pub fn new(tuning: ParticleTuning) -> Self {
        Self {
            particles: Vec::new(),
            since_last_update: 0.0,
            tuning,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.since_last_update = 0.0;
    }

    /// Spawn one particle. `velocity: None` picks a random direction and a
    /// speed from the kind's range.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        kind: BurstKind,
        origin: Vec2,
        color: Rgb,
        size: f32,
        lifetime: f32,
        velocity: Option<Vec2>,
        rng: &mut R,
    ) -> bool {
        if self.particles.len() >= self.tuning.max_particles() {
            return false;
        }
        let vel = velocity.unwrap_or_else(|| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let (lo, hi) = kind.speed_range();
            Vec2::from_angle(angle) * rng.random_range(lo..hi)
        });
        self.particles.push(Particle {
            pos: origin,
            vel,
            age: 0.0,
            lifetime,
            color,
            size,
        });
        true
    }

    /// Spawn `count` particles of `kind` at `origin`. Returns how many fit
    /// under the particle cap.
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        kind: BurstKind,
        origin: Vec2,
        color: Option<Rgb>,
        count: usize,
        rng: &mut R,
    ) -> usize {
        let color = color.unwrap_or_else(|| kind.default_color());
        let (size_lo, size_hi) = kind.size_range();
        let (life_lo, life_hi) = kind.lifetime_range();

        let mut spawned = 0;
        for _ in 0..count {
            let size = rng.random_range(size_lo..=size_hi) as f32;
            let lifetime = rng.random_range(life_lo..life_hi);
            if !self.spawn(kind, origin, color, size, lifetime, None, rng) {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Accumulate `dt`; once a full update interval has built up, advance
    /// every particle by the accumulated time and drop the expired ones.
    pub fn update(&mut self, dt: f32) {
        self.since_last_update += dt;
        if self.since_last_update < self.tuning.update_interval {
            return;
        }
        let step = self.since_last_update;
        let tuning = self.tuning;
        self.particles.retain_mut(|p| p.advance(step, &tuning));
        self.since_last_update = 0.0;
    }

    /// Visit every live particle
    pub fn for_each_live<F: FnMut(ParticleView)>(&self, mut visitor: F) {
        for p in &self.particles {
            visitor(ParticleView {
                pos: p.pos,
                color: p.color,
                size: p.size,
                alpha: p.alpha(),
            });
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
