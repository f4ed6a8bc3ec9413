//! Fixed timestep simulation tick
//!
//! Advances one level session deterministically. Phase order per tick:
//! input → hazard cooldowns → player physics → creature AI → pickups →
//! hazards → terminal checks.

use super::collision::step_body;
use super::patrol::{RescueKind, update_ai};
use super::state::{EntityKind, GameEvent, Intent, LevelSession, SessionStatus};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents received since the previous tick, in arrival order
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
        }
    }
}

impl From<Intent> for TickInput {
    fn from(intent: Intent) -> Self {
        Self {
            intents: vec![intent],
        }
    }
}

/// Advance the session by one fixed timestep and return what happened
pub fn tick(session: &mut LevelSession, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Terminal states absorb everything
    if session.status.is_terminal() {
        return events;
    }

    apply_input(session, input, &mut events);

    // --- HAZARD COOLDOWNS ---
    for entity in &mut session.entities {
        if let EntityKind::Spike { cooldown } = &mut entity.kind {
            *cooldown = (*cooldown - dt).max(0.0);
        }
    }
    session.elapsed += dt;

    // --- MOVEMENT ---
    let player_tuning = session.tuning.player;
    // Ladders are only climbable on hazard levels
    let ladders = session.has_hazards();
    let player = &mut session.player;
    player.body.vel.x = player.intent.horizontal() * player_tuning.walk_speed;
    let climb = ladders.then(|| {
        if player.intent.up {
            player_tuning.climb_speed
        } else {
            0.0
        }
    });
    step_body(&mut player.body, &session.geometry, &player_tuning.body, climb);

    for enemy in &mut session.enemies {
        update_ai(enemy, dt, &session.geometry, &session.tuning.patrol, &mut session.rng);
    }

    collect_pickups(session, &mut events);

    if session.has_hazards() {
        resolve_hazards(session, &mut events);
    }

    check_terminal(session, &mut events);

    events
}

fn apply_input(session: &mut LevelSession, input: &TickInput, events: &mut Vec<GameEvent>) {
    let jump_speed = session.tuning.player.jump_speed;
    let player = &mut session.player;

    for intent in &input.intents {
        match intent {
            Intent::MoveLeftStart => player.intent.left = true,
            Intent::MoveLeftStop => player.intent.left = false,
            Intent::MoveRightStart => player.intent.right = true,
            Intent::MoveRightStop => player.intent.right = false,
            Intent::JumpOrClimbUp => {
                player.intent.up = true;
                if player.body.on_ladder {
                    events.push(GameEvent::Climbed);
                } else if player.body.on_ground {
                    player.body.vel.y = jump_speed;
                    player.body.on_ground = false;
                    events.push(GameEvent::Jumped);
                }
            }
            Intent::JumpOrClimbRelease => player.intent.up = false,
        }
    }
}

fn collect_pickups(session: &mut LevelSession, events: &mut Vec<GameEvent>) {
    let player_box = session.player.body.aabb();

    let mut i = 0;
    while i < session.entities.len() {
        let entity = &session.entities[i];
        if !entity.aabb.overlaps(&player_box) {
            i += 1;
            continue;
        }
        let pos = entity.aabb.center;
        match entity.kind {
            EntityKind::Coin => {
                session.coins += 1;
                events.push(GameEvent::CoinCollected { pos });
            }
            EntityKind::Diamond => {
                session.diamonds += 1;
                events.push(GameEvent::DiamondCollected { pos });
            }
            EntityKind::Key => {
                session.has_key = true;
                events.push(GameEvent::KeyCollected { pos });
            }
            _ => {
                i += 1;
                continue;
            }
        }
        // Removal is immediate, so nothing is counted twice
        session.entities.remove(i);
    }
}

fn resolve_hazards(session: &mut LevelSession, events: &mut Vec<GameEvent>) {
    let player_box = session.player.body.aabb();
    let hazards = session.tuning.hazards;

    // Spikes
    for entity in &mut session.entities {
        if let EntityKind::Spike { cooldown } = &mut entity.kind {
            if *cooldown <= 0.0 && entity.aabb.overlaps(&player_box) {
                session.hp = session.hp.saturating_sub(hazards.spike_damage);
                *cooldown = hazards.spike_cooldown;
                events.push(GameEvent::SpikeHit {
                    pos: entity.aabb.center,
                    hp: session.hp,
                });
            }
        }
    }

    // Bombs
    let mut i = 0;
    while i < session.entities.len() {
        let entity = &session.entities[i];
        if let EntityKind::Bomb { active: true } = entity.kind {
            if entity.aabb.overlaps(&player_box) {
                session.hp /= 2;
                events.push(GameEvent::BombExploded {
                    pos: entity.aabb.center,
                    hp: session.hp,
                });
                session.entities.remove(i);
                continue;
            }
        }
        i += 1;
    }

    // Creatures
    let mut i = 0;
    while i < session.enemies.len() {
        let enemy = &session.enemies[i];
        if !enemy.body.aabb().overlaps(&player_box) {
            i += 1;
            continue;
        }
        let (kind, pos) = (enemy.kind, enemy.body.pos);
        let flag = match kind {
            RescueKind::Mouse => &mut session.saved_mouse,
            RescueKind::Frog => &mut session.saved_frog,
        };
        if !*flag {
            *flag = true;
            events.push(GameEvent::Rescued { kind, pos });
        }
        session.enemies.remove(i);
    }
}

fn check_terminal(session: &mut LevelSession, events: &mut Vec<GameEvent>) {
    if session.has_hazards() && session.hp == 0 {
        session.status = SessionStatus::Lost;
        log::info!(
            "Level {} lost after {:.1}s",
            session.level_id,
            session.elapsed
        );
        events.push(GameEvent::Lost);
        return;
    }

    if !session.has_key {
        return;
    }
    let player_box = session.player.body.aabb();
    let at_door = session
        .entities
        .iter()
        .any(|e| e.kind == EntityKind::Door && e.aabb.overlaps(&player_box));
    if at_door {
        session.status = SessionStatus::Won;
        let result = session.result();
        log::info!(
            "Level {} won: score {} in {}s",
            session.level_id,
            result.score(),
            result.time
        );
        events.push(GameEvent::Won {
            level_id: session.level_id,
            result,
        });
    }
}
