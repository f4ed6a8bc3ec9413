//! Level session state and core simulation types
//!
//! One [`LevelSession`] exists per level attempt. It owns the player, the
//! creatures, every pickup and hazard, and the progression counters.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{BodySignals, DynamicBody};
use super::geometry::{Aabb, StaticGeometry};
use super::level::{LevelLayout, LevelMode};
use super::patrol::{Enemy, RescueKind};
use crate::consts::*;
use crate::records::{RecordEntry, ScoreRule};
use crate::tuning::Tuning;

/// Progression status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Playing,
    /// Reached the door holding the key
    Won,
    /// Health ran out
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Playing)
    }
}

/// Discrete input intents from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    /// Jump when grounded, climb while held on a ladder
    JumpOrClimbUp,
    JumpOrClimbRelease,
}

/// Held input state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl MoveIntent {
    /// -1, 0 or +1
    pub fn horizontal(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: DynamicBody,
    pub intent: MoveIntent,
}

/// Static-position entities that the player can touch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Coin,
    Diamond,
    Key,
    /// Hurts on contact, then stays harmless for `cooldown` seconds
    Spike { cooldown: f32 },
    /// Halves health once, then disappears
    Bomb { active: bool },
    Door,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub aabb: Aabb,
}

/// Notifications for presentation and audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { pos: Vec2 },
    DiamondCollected { pos: Vec2 },
    KeyCollected { pos: Vec2 },
    Jumped,
    Climbed,
    SpikeHit { pos: Vec2, hp: u32 },
    BombExploded { pos: Vec2, hp: u32 },
    Rescued { kind: RescueKind, pos: Vec2 },
    /// Carries the finished run, ready for the record store
    Won { level_id: u32, result: RecordEntry },
    Lost,
}

/// Tag of every kind of thing a renderer may draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    Enemy(RescueKind),
    Coin,
    Diamond,
    Key,
    Bomb,
    Spike,
    Door,
}

/// Read-only view of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub tag: EntityTag,
    pub pos: Vec2,
    pub size: Vec2,
    pub signals: BodySignals,
}

/// Per-tick snapshot for renderers and HUDs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub level_id: u32,
    pub status: SessionStatus,
    pub hp: u32,
    pub score: u64,
    pub coins: u32,
    pub diamonds: u32,
    pub has_key: bool,
    pub saved_mouse: bool,
    pub saved_frog: bool,
    pub elapsed: f32,
    pub player: EntityView,
    pub entities: Vec<EntityView>,
    pub decorations: Vec<Vec2>,
}

/// One attempt at one level
#[derive(Debug, Clone)]
pub struct LevelSession {
    pub level_id: u32,
    pub mode: LevelMode,
    pub geometry: StaticGeometry,
    pub player: Player,
    /// Active creatures (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Active pickups, hazards and doors (sorted by id)
    pub entities: Vec<Entity>,
    pub decorations: Vec<Vec2>,
    pub coins: u32,
    pub diamonds: u32,
    pub has_key: bool,
    pub saved_mouse: bool,
    pub saved_frog: bool,
    pub hp: u32,
    /// Seconds since the session started
    pub elapsed: f32,
    pub status: SessionStatus,
    pub tuning: Tuning,
    pub rng: Pcg32,
    next_id: u32,
}

impl LevelSession {
    /// Start a session on a parsed level
    pub fn new(layout: LevelLayout, tuning: Tuning, seed: u64) -> Self {
        let mut session = Self {
            level_id: layout.id,
            mode: layout.mode,
            geometry: layout.geometry,
            player: Player {
                body: DynamicBody::new(
                    layout.player_start,
                    Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                ),
                intent: MoveIntent::default(),
            },
            enemies: Vec::new(),
            entities: Vec::new(),
            decorations: layout.decorations,
            coins: 0,
            diamonds: 0,
            has_key: false,
            saved_mouse: false,
            saved_frog: false,
            hp: tuning.hazards.max_hp,
            elapsed: 0.0,
            status: SessionStatus::Playing,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        for pos in layout.coins {
            session.add_entity(EntityKind::Coin, Aabb::new(pos, Vec2::splat(COIN_SIZE)));
        }
        for pos in layout.diamonds {
            session.add_entity(EntityKind::Diamond, Aabb::new(pos, Vec2::splat(ITEM_SIZE)));
        }
        for pos in layout.keys {
            session.add_entity(EntityKind::Key, Aabb::new(pos, Vec2::splat(ITEM_SIZE)));
        }
        for pos in layout.spikes {
            session.add_entity(EntityKind::Spike { cooldown: 0.0 }, spike_box(pos));
        }
        for pos in layout.bombs {
            session.add_entity(
                EntityKind::Bomb { active: true },
                Aabb::new(pos, Vec2::splat(ITEM_SIZE)),
            );
        }
        for door in layout.doors {
            session.add_entity(EntityKind::Door, door);
        }
        for (kind, pos) in layout.creatures {
            let id = session.next_entity_id();
            let enemy = Enemy::new(id, kind, pos, &session.tuning.patrol, &mut session.rng);
            session.enemies.push(enemy);
        }

        log::info!(
            "Level {} started ({:?}): {} entities, {} creatures",
            session.level_id,
            session.mode,
            session.entities.len(),
            session.enemies.len()
        );

        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_entity(&mut self, kind: EntityKind, aabb: Aabb) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity { id, kind, aabb });
        id
    }

    /// Whether health, hazards and rescues are in play
    pub fn has_hazards(&self) -> bool {
        self.mode == LevelMode::Hazard
    }

    pub fn score_rule(&self) -> ScoreRule {
        match self.mode {
            LevelMode::Simple => ScoreRule::CoinsOnly,
            LevelMode::Hazard => ScoreRule::Full,
        }
    }

    /// Running HUD score: coins collected on simple levels, the full
    /// formula on hazard levels
    pub fn score(&self) -> u64 {
        match self.mode {
            LevelMode::Simple => self.coins as u64,
            LevelMode::Hazard => self.result().score(),
        }
    }

    /// The run as it stands, scored with this level's rule
    pub fn result(&self) -> RecordEntry {
        RecordEntry::new(
            self.score_rule(),
            self.coins,
            self.diamonds,
            self.saved_mouse,
            self.saved_frog,
            self.elapsed_secs(),
        )
    }

    /// Whole seconds elapsed
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.max(0.0) as u64
    }

    pub fn count(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.entities.iter().filter(|e| pred(&e.kind)).count()
    }

    pub fn snapshot(&self) -> Snapshot {
        let player = EntityView {
            id: 0,
            tag: EntityTag::Player,
            pos: self.player.body.pos,
            size: self.player.body.half * 2.0,
            signals: self.player.body.signals(),
        };

        let mut entities: Vec<EntityView> = self
            .entities
            .iter()
            .map(|e| EntityView {
                id: e.id,
                tag: match e.kind {
                    EntityKind::Coin => EntityTag::Coin,
                    EntityKind::Diamond => EntityTag::Diamond,
                    EntityKind::Key => EntityTag::Key,
                    EntityKind::Spike { .. } => EntityTag::Spike,
                    EntityKind::Bomb { .. } => EntityTag::Bomb,
                    EntityKind::Door => EntityTag::Door,
                },
                pos: e.aabb.center,
                size: e.aabb.size(),
                signals: BodySignals::default(),
            })
            .collect();
        entities.extend(self.enemies.iter().map(|enemy| EntityView {
            id: enemy.id,
            tag: EntityTag::Enemy(enemy.kind),
            pos: enemy.body.pos,
            size: enemy.body.half * 2.0,
            signals: enemy.body.signals(),
        }));
        entities.sort_by_key(|v| v.id);

        Snapshot {
            level_id: self.level_id,
            status: self.status,
            hp: self.hp,
            score: self.score(),
            coins: self.coins,
            diamonds: self.diamonds,
            has_key: self.has_key,
            saved_mouse: self.saved_mouse,
            saved_frog: self.saved_frog,
            elapsed: self.elapsed,
            player,
            entities,
            decorations: self.decorations.clone(),
        }
    }
}

/// Spikes only hurt in the lower half of their tile
fn spike_box(tile_center: Vec2) -> Aabb {
    Aabb::new(
        tile_center - Vec2::new(0.0, TILE / 4.0),
        Vec2::new(TILE, TILE / 2.0),
    )
}
