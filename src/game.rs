//! Fixed-step game driver
//!
//! Owns one level session plus its cosmetic particles and runs the frame
//! loop: queued intents → simulation substeps → record submission →
//! particle update. Presentation reads [`Game::snapshot`] and
//! [`Game::for_each_particle`] after each frame.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::records::{RecordStore, Submission};
use crate::sim::{
    BurstKind, GameEvent, Intent, LevelError, LevelLayout, LevelMode, LevelSession, ParticleSystem,
    ParticleView, Rgb, SessionStatus, Snapshot, TickInput, builtin, tick,
};
use crate::tuning::Tuning;

/// Longest frame the driver will simulate; longer gaps are dropped
const MAX_FRAME_DT: f32 = 0.1;

/// Particles in a bomb blast
const BOMB_PARTICLES: usize = 30;

/// Per-frame chance of a celebration sparkle on the win screen
const CELEBRATE_CHANCE: f64 = 0.3;
const SIMPLE_CELEBRATION: Celebration = Celebration {
    colors: &[Rgb::GOLD, Rgb::YELLOW, Rgb::ORANGE],
    min_count: 3,
    max_count: 8,
};
const HAZARD_CELEBRATION: Celebration = Celebration {
    colors: &[Rgb::GOLD, Rgb::YELLOW, Rgb::ORANGE, Rgb::CYAN],
    min_count: 5,
    max_count: 15,
};

/// Win-screen sparkle style
struct Celebration {
    colors: &'static [Rgb],
    min_count: usize,
    max_count: usize,
}

impl Celebration {
    fn for_mode(mode: LevelMode) -> &'static Celebration {
        match mode {
            LevelMode::Simple => &SIMPLE_CELEBRATION,
            LevelMode::Hazard => &HAZARD_CELEBRATION,
        }
    }
}

pub struct Game {
    session: LevelSession,
    layout: LevelLayout,
    particles: ParticleSystem,
    store: RecordStore,
    tuning: Tuning,
    /// Cosmetic randomness, kept apart from the simulation stream
    fx_rng: Pcg32,
    accumulator: f32,
    pending: Vec<Intent>,
    last_submission: Option<Submission>,
}

impl Game {
    /// Start one of the built-in levels
    pub fn new(level_id: u32, tuning: Tuning, store: RecordStore, seed: u64) -> Result<Self, LevelError> {
        Ok(Self::from_layout(builtin(level_id)?, tuning, store, seed))
    }

    pub fn from_layout(layout: LevelLayout, tuning: Tuning, store: RecordStore, seed: u64) -> Self {
        Self {
            session: LevelSession::new(layout.clone(), tuning, seed),
            layout,
            particles: ParticleSystem::new(tuning.particles),
            store,
            tuning,
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            accumulator: 0.0,
            pending: Vec::new(),
            last_submission: None,
        }
    }

    /// Queue an intent for the next simulation step
    pub fn push_intent(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    /// Advance by one rendered frame. Returns the events of every substep.
    pub fn update(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        // NaN would stick in the accumulator forever
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // Intents are one-shot: the first substep consumes them
            let input = TickInput::new(self.pending.drain(..));
            let step_events = tick(&mut self.session, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in &step_events {
                self.react(event);
            }
            events.extend(step_events);
        }
        // Don't carry a backlog past the substep cap
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        if self.session.status == SessionStatus::Won {
            self.celebrate();
        }
        self.particles.update(dt);

        events
    }

    fn react(&mut self, event: &GameEvent) {
        let rng = &mut self.fx_rng;
        match event {
            GameEvent::CoinCollected { pos }
            | GameEvent::DiamondCollected { pos }
            | GameEvent::KeyCollected { pos } => {
                let kind = BurstKind::Sparkle;
                self.particles
                    .spawn_burst(kind, *pos, None, kind.default_count(), rng);
            }
            GameEvent::BombExploded { pos, .. } => {
                self.particles.spawn_burst(
                    BurstKind::Explosion,
                    *pos,
                    Some(Rgb::ORANGE_RED),
                    BOMB_PARTICLES,
                    rng,
                );
            }
            GameEvent::Won { level_id, result } => {
                let submission = self.store.submit(*level_id, result.clone());
                if let Some(err) = &submission.write_error {
                    log::warn!("Record for level {level_id} not saved: {err}");
                }
                self.last_submission = Some(submission);
            }
            _ => {}
        }
    }

    /// Random sparkles around the player once the level is won
    fn celebrate(&mut self) {
        let style = Celebration::for_mode(self.session.mode);
        let rng = &mut self.fx_rng;
        if !rng.random_bool(CELEBRATE_CHANCE) {
            return;
        }
        let around = self.session.player.body.pos
            + glam::Vec2::new(rng.random_range(-200.0..200.0), rng.random_range(-120.0..120.0));
        let color = style.colors.choose(rng).copied();
        let count = rng.random_range(style.min_count..=style.max_count);
        self.particles
            .spawn_burst(BurstKind::Sparkle, around, color, count, rng);
    }

    /// Throw away the session and start the same level over
    pub fn restart(&mut self, seed: u64) {
        self.session = LevelSession::new(self.layout.clone(), self.tuning, seed);
        self.particles.clear();
        self.accumulator = 0.0;
        self.pending.clear();
        self.last_submission = None;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn for_each_particle<F: FnMut(ParticleView)>(&self, visitor: F) {
        self.particles.for_each_live(visitor);
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Result of the record submission made when the level was won
    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}
