//! Best-result store, one record per level
//!
//! Persisted as pretty JSON keyed by `"level_<n>"`. A record is replaced only
//! by a strictly better run: higher score, or equal score in less time.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::RECORDS_FILE;
use crate::persistence;

/// Which terms count toward a level's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRule {
    /// Ten points per coin
    CoinsOnly,
    /// Coins, diamonds and rescues
    Full,
}

impl ScoreRule {
    pub const COIN_POINTS: u64 = 10;
    pub const DIAMOND_POINTS: u64 = 50;
    pub const RESCUE_POINTS: u64 = 100;

    pub fn score(&self, coins: u32, diamonds: u32, saved_mouse: bool, saved_frog: bool) -> u64 {
        let coin_score = coins as u64 * Self::COIN_POINTS;
        match self {
            ScoreRule::CoinsOnly => coin_score,
            ScoreRule::Full => {
                coin_score
                    + diamonds as u64 * Self::DIAMOND_POINTS
                    + (saved_mouse as u64 + saved_frog as u64) * Self::RESCUE_POINTS
            }
        }
    }
}

/// A finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    score: u64,
    pub coins: u32,
    pub diamonds: u32,
    pub saved_mouse: bool,
    pub saved_frog: bool,
    /// Whole seconds
    pub time: u64,
}

impl RecordEntry {
    pub fn new(
        rule: ScoreRule,
        coins: u32,
        diamonds: u32,
        saved_mouse: bool,
        saved_frog: bool,
        time: u64,
    ) -> Self {
        Self {
            score: rule.score(coins, diamonds, saved_mouse, saved_frog),
            coins,
            diamonds,
            saved_mouse,
            saved_frog,
            time,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Whether this run should replace `other` as the record
    pub fn beats(&self, other: &RecordEntry) -> bool {
        self.score > other.score || (self.score == other.score && self.time < other.time)
    }
}

/// Storage key for a level, written as `"level_<n>"`
///
/// Orders by level number, so `level_10` sorts after `level_2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LevelKey(pub u32);

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level_{}", self.0)
    }
}

impl FromStr for LevelKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("level_")
            .and_then(|n| n.parse().ok())
            .map(LevelKey)
            .ok_or_else(|| format!("bad level key {s:?}"))
    }
}

impl Serialize for LevelKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LevelKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Every level's record, in level order
pub type Records = BTreeMap<LevelKey, RecordEntry>;

/// Outcome of submitting a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The record now held for the level
    pub entry: RecordEntry,
    pub is_new_record: bool,
    /// Set when a new record could not be written to disk
    pub write_error: Option<String>,
}

/// File-backed record store
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(RECORDS_FILE)
    }
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. Missing or unreadable files give an empty map.
    pub fn load(&self) -> Records {
        if !self.path.exists() {
            log::info!("No records at {}, starting fresh", self.path.display());
            return Records::new();
        }
        match persistence::read_json::<Records>(&self.path) {
            Ok(records) => {
                log::info!("Loaded {} records", records.len());
                records
            }
            Err(e) => {
                log::warn!("Ignoring unreadable records file: {e}");
                Records::new()
            }
        }
    }

    /// Best stored run for one level
    pub fn get(&self, level_id: u32) -> Option<RecordEntry> {
        self.load().remove(&LevelKey(level_id))
    }

    /// Compare a finished run against the stored record and keep the better
    pub fn submit(&self, level_id: u32, candidate: RecordEntry) -> Submission {
        let mut records = self.load();
        let key = LevelKey(level_id);

        if let Some(existing) = records.get(&key) {
            if !candidate.beats(existing) {
                return Submission {
                    entry: existing.clone(),
                    is_new_record: false,
                    write_error: None,
                };
            }
        }

        records.insert(key, candidate.clone());
        let write_error = match persistence::write_json(&self.path, &records) {
            Ok(()) => {
                log::info!(
                    "New record for {}: score {} in {}s",
                    key,
                    candidate.score(),
                    candidate.time
                );
                None
            }
            Err(e) => {
                log::warn!("Failed to save record for {key}: {e}");
                Some(e.to_string())
            }
        };

        Submission {
            entry: candidate,
            is_new_record: true,
            write_error,
        }
    }
}
