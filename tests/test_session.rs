//! End-to-end runs through the public driver

use dungeon_platformer::consts::SIM_DT;
use dungeon_platformer::demo::{Autopilot, LEVEL_1_ROUTE};
use dungeon_platformer::sim::{GameEvent, Intent, LevelMode, RescueKind, SessionStatus, parse_level};
use dungeon_platformer::{Game, RecordStore, Tuning};

/// Everything on one corridor: coin, diamond, spike, bomb, mouse, key, door
const GAUNTLET: &[&str] = &[
    "111111111111",
    "1PCDSBMK0E01",
    "111111111111",
];

/// Seven bombs in a row halve 100 hp down to nothing
const MINEFIELD: &[&str] = &[
    "111111111111",
    "1PBBBBBBB0E1",
    "111111111111",
];

fn start(rows: &[&str], store: RecordStore, seed: u64) -> Game {
    let layout = parse_level(3, LevelMode::Hazard, rows).unwrap();
    Game::from_layout(layout, Tuning::default(), store, seed)
}

/// Settle, then hold right until the level ends
fn walk_right(game: &mut Game) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..20 {
        events.extend(game.update(SIM_DT));
    }
    game.push_intent(Intent::MoveRightStart);
    for _ in 0..600 {
        events.extend(game.update(SIM_DT));
        if game.status().is_terminal() {
            break;
        }
    }
    events
}

#[test]
fn test_gauntlet_win() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("records.json"));
    let mut game = start(GAUNTLET, store, 1);

    let events = walk_right(&mut game);
    assert_eq!(game.status(), SessionStatus::Won);

    let snap = game.snapshot();
    assert_eq!(snap.coins, 1);
    assert_eq!(snap.diamonds, 1);
    assert!(snap.saved_mouse);
    assert!(!snap.saved_frog);
    // One spike hit, then the bomb halves what is left
    assert_eq!(snap.hp, 45);
    assert_eq!(snap.score, 160);

    let spike_hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::SpikeHit { .. }))
        .count();
    assert_eq!(spike_hits, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Rescued {
            kind: RescueKind::Mouse,
            ..
        }
    )));

    let sub = game.last_submission().unwrap();
    assert!(sub.is_new_record);
    assert_eq!(sub.entry.score(), 160);

    let text = std::fs::read_to_string(dir.path().join("records.json")).unwrap();
    assert!(text.starts_with("{\n    \"level_3\": {\n        \"score\": 160,"));
}

#[test]
fn test_record_survives_worse_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    let mut first = start(GAUNTLET, RecordStore::new(&path), 1);
    walk_right(&mut first);
    let best = first.last_submission().unwrap().entry.clone();

    // Same route, but skip the diamond
    let mut rows: Vec<String> = GAUNTLET.iter().map(|r| r.to_string()).collect();
    rows[1] = rows[1].replace('D', "0");
    let layout = parse_level(3, LevelMode::Hazard, &rows).unwrap();
    let mut second = Game::from_layout(layout, Tuning::default(), RecordStore::new(&path), 2);
    walk_right(&mut second);

    assert_eq!(second.status(), SessionStatus::Won);
    let sub = second.last_submission().unwrap();
    assert!(!sub.is_new_record);
    assert_eq!(sub.entry, best);
    assert_eq!(RecordStore::new(&path).get(3), Some(best));
}

#[test]
fn test_minefield_loses_and_stays_lost() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = start(MINEFIELD, RecordStore::new(dir.path().join("r.json")), 4);

    let events = walk_right(&mut game);
    assert_eq!(game.status(), SessionStatus::Lost);
    assert_eq!(game.snapshot().hp, 0);
    assert_eq!(events.last(), Some(&GameEvent::Lost));
    assert!(game.last_submission().is_none());

    // Nothing moves once lost
    let before = game.snapshot();
    for _ in 0..30 {
        assert!(game.update(SIM_DT).is_empty());
    }
    assert_eq!(game.snapshot(), before);
    assert!(!dir.path().join("r.json").exists());
}

#[test]
fn test_builtin_levels_replay_identically() {
    let dir = tempfile::tempdir().unwrap();
    let run = || {
        let store = RecordStore::new(dir.path().join("r.json"));
        let mut game = Game::new(2, Tuning::default(), store, 99).unwrap();
        game.push_intent(Intent::MoveRightStart);
        for frame in 0..400 {
            if frame % 40 == 0 {
                game.push_intent(Intent::JumpOrClimbUp);
            }
            game.update(SIM_DT);
        }
        game.snapshot()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_autopilot_wins_level_1() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let mut game = Game::new(1, Tuning::default(), RecordStore::new(&path), 1).unwrap();
    let mut pilot = Autopilot::new(LEVEL_1_ROUTE);

    let mut events = Vec::new();
    for _ in 0..1200 {
        for intent in pilot.next_intents(&game.snapshot()) {
            game.push_intent(intent);
        }
        events.extend(game.update(SIM_DT));
        if game.status().is_terminal() {
            break;
        }
    }

    assert_eq!(game.status(), SessionStatus::Won);
    let snap = game.snapshot();
    assert!(snap.has_key);
    assert_eq!(snap.coins, 1);
    assert_eq!(events.iter().filter(|e| **e == GameEvent::Jumped).count(), 2);

    let sub = game.last_submission().unwrap();
    assert!(sub.is_new_record);
    assert_eq!(sub.entry.score(), 10);
    assert_eq!(RecordStore::new(&path).get(1), Some(sub.entry.clone()));
}
