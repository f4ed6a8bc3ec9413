//! Dungeon Platformer - headless runner
//!
//! Plays a scripted run of each built-in level through the fixed-step driver
//! and logs what happened. Levels with a known route are played by the
//! autopilot; the rest get a walk-and-hop script. Set `RUST_LOG=debug` to
//! also see sound cues.
//!
//! Usage: `dungeon-platformer [level] [low|medium|high]`

use dungeon_platformer::audio::{AudioManager, LogSink};
use dungeon_platformer::consts::{RECORDS_FILE, SIM_DT, TUNING_FILE};
use dungeon_platformer::demo::{self, Autopilot};
use dungeon_platformer::sim::{GameEvent, Intent, SessionStatus};
use dungeon_platformer::tuning::QualityPreset;
use dungeon_platformer::{Game, RecordStore, Tuning, format_duration};

/// Give up on a scripted run after this many frames
const MAX_FRAMES: u32 = 60 * 120;

/// Frames between jumps in the scripted input
const JUMP_EVERY: u32 = 45;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Dungeon Platformer (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level_arg = args.next();
    let quality_arg = args.next();

    let mut tuning = Tuning::load(TUNING_FILE);
    if let Some(arg) = quality_arg {
        match arg.parse::<QualityPreset>() {
            Ok(preset) => tuning = tuning.with_quality(preset),
            Err(e) => {
                log::error!("{e}");
                std::process::exit(2);
            }
        }
    }
    log::info!("Particle quality: {}", tuning.particles.quality);

    let store = RecordStore::new(RECORDS_FILE);

    let levels: Vec<u32> = match level_arg {
        Some(arg) => match arg.parse() {
            Ok(id) => vec![id],
            Err(_) => {
                log::error!("Not a level number: {arg}");
                std::process::exit(2);
            }
        },
        None => vec![1, 2],
    };

    let mut audio = AudioManager::new(LogSink);
    for level_id in levels {
        let mut game = match Game::new(level_id, tuning, store.clone(), level_id as u64) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Cannot start level {level_id}: {e}");
                continue;
            }
        };
        play(&mut game, &mut audio);
    }

    log::info!("Records in {}:", store.path().display());
    for (key, entry) in store.load() {
        log::info!(
            "Record {key}: {} points, {}",
            entry.score(),
            format_duration(entry.time)
        );
    }
}

/// Play until the level ends or time runs out
fn play(game: &mut Game, audio: &mut AudioManager<LogSink>) {
    let mut pilot = demo::route(game.snapshot().level_id).map(Autopilot::new);
    if pilot.is_none() {
        game.push_intent(Intent::MoveRightStart);
    }

    for frame in 0..MAX_FRAMES {
        match pilot.as_mut() {
            Some(pilot) => {
                for intent in pilot.next_intents(&game.snapshot()) {
                    game.push_intent(intent);
                }
            }
            // Walk right, hopping now and then
            None if frame % JUMP_EVERY == 0 => game.push_intent(Intent::JumpOrClimbUp),
            None if frame % JUMP_EVERY == JUMP_EVERY / 2 => {
                game.push_intent(Intent::JumpOrClimbRelease)
            }
            None => {}
        }

        let events = game.update(SIM_DT);
        audio.handle_events(&events);
        for event in &events {
            match event {
                GameEvent::SpikeHit { hp, .. } | GameEvent::BombExploded { hp, .. } => {
                    log::info!("Ouch! hp {hp}")
                }
                GameEvent::Rescued { kind, .. } => log::info!("Rescued the {kind:?}"),
                _ => {}
            }
        }

        if game.status() != SessionStatus::Playing {
            break;
        }
    }

    let snap = game.snapshot();
    match snap.status {
        SessionStatus::Won => {
            if let Some(sub) = game.last_submission() {
                log::info!(
                    "Level {} won with {} points{}",
                    snap.level_id,
                    sub.entry.score(),
                    if sub.is_new_record { " (new record!)" } else { "" }
                );
            }
        }
        SessionStatus::Lost => log::info!("Level {} lost", snap.level_id),
        SessionStatus::Playing => log::info!(
            "Level {} unfinished after {}: {} coins, key {}",
            snap.level_id,
            format_duration(snap.elapsed as u64),
            snap.coins,
            if snap.has_key { "held" } else { "missing" }
        ),
    }
}
