//! High score table and its persistence
//!
//! The table keeps the best [`MAX_ENTRIES`] results in descending order of
//! score. Equal scores keep their arrival order, so an earlier result
//! stays ahead of a later one with the same points. Stores rewrite the whole
//! table on every record.

use std::{
    cmp::Reverse,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::leaderboard::{DEFAULT_FILE, MAX_ENTRIES};

/// One line of the high score table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Name the player entered at the end of the race
    #[serde(alias = "nombre")]
    pub name: String,
    /// Final score of the race
    #[serde(alias = "puntaje")]
    pub score: u32,
}

impl ScoreEntry {
    /// Creates an entry
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Ranked list of the best results
///
/// Whatever list it is built from is re-sorted and truncated, so a hand
/// edited or oversized score file still yields a well-formed table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ScoreEntry>", into = "Vec<ScoreEntry>")]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl From<Vec<ScoreEntry>> for Leaderboard {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .sorted_by_key(|entry| Reverse(entry.score))
                .take(MAX_ENTRIES)
                .collect_vec(),
        }
    }
}

impl From<Leaderboard> for Vec<ScoreEntry> {
    fn from(leaderboard: Leaderboard) -> Self {
        leaderboard.entries
    }
}

impl Leaderboard {
    /// Adds a result to the table
    ///
    /// # Returns
    ///
    /// The 0-based position the entry took, or `None` if it did not make
    /// the table
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .take_while(|existing| existing.score >= entry.score)
            .count();

        if position >= MAX_ENTRIES {
            return None;
        }

        self.entries.insert(position, entry);
        self.entries.truncate(MAX_ENTRIES);

        Some(position)
    }

    /// The entries from best to worst
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Errors that can occur while persisting the score table
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The table could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable storage for the high score table
pub trait ScoreStore {
    /// Returns the stored table, best first
    ///
    /// A store that does not exist yet, or cannot be read or parsed, yields
    /// an empty table.
    fn load(&self) -> Vec<ScoreEntry>;

    /// Replaces the stored table with `entries`
    ///
    /// # Errors
    ///
    /// Returns an error if the table could not be written.
    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), Error>;

    /// Adds a result, keeps the best [`MAX_ENTRIES`] and persists the table
    ///
    /// # Returns
    ///
    /// The table as it was written
    ///
    /// # Errors
    ///
    /// Returns an error if the table could not be written.
    fn record(&mut self, entry: ScoreEntry) -> Result<Vec<ScoreEntry>, Error> {
        let mut leaderboard = Leaderboard::from(self.load());

        let name = entry.name.clone();
        let score = entry.score;
        match leaderboard.insert(entry) {
            Some(position) => {
                log::info!("recorded score {score} for {name:?} at position {}", position + 1);
            }
            None => log::info!("score {score} for {name:?} did not make the table"),
        }

        self.save(leaderboard.entries())?;

        Ok(leaderboard.into())
    }
}

/// Score table kept in a JSON file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the score file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_FILE)
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Vec<ScoreEntry> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("cannot read score file {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        match serde_json::from_str::<Leaderboard>(&text) {
            Ok(leaderboard) => leaderboard.into(),
            Err(e) => {
                log::warn!("ignoring malformed score file {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), Error> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, entries)?;
        writer.flush()?;
        Ok(())
    }
}

/// Score table kept in memory, for embedding and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: Vec<ScoreEntry>,
}

impl MemoryStore {
    /// Creates a store holding `entries`
    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self { entries }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), Error> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("carrera_{}_{name}.json", std::process::id()))
    }

    fn descending_entries() -> Vec<ScoreEntry> {
        (1..=10)
            .rev()
            .map(|i| ScoreEntry::new(format!("P{i}"), i * 10))
            .collect()
    }

    #[test]
    fn test_record_then_load_contains_entry() {
        let mut store = MemoryStore::default();
        store.record(ScoreEntry::new("Ana", 80)).unwrap();

        assert_eq!(store.load(), vec![ScoreEntry::new("Ana", 80)]);
    }

    #[test]
    fn test_record_inserts_in_rank_and_drops_lowest() {
        let mut store = MemoryStore::with_entries(descending_entries());
        let entries = store.record(ScoreEntry::new("Bob", 95)).unwrap();

        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0], ScoreEntry::new("P10", 100));
        assert_eq!(entries[1], ScoreEntry::new("Bob", 95));
        assert_eq!(entries[2], ScoreEntry::new("P9", 90));
        assert!(!entries.contains(&ScoreEntry::new("P1", 10)));
        assert_eq!(store.load(), entries);
    }

    #[test]
    fn test_record_below_full_table_is_dropped() {
        let prior = (0..11)
            .map(|i| ScoreEntry::new(format!("P{i}"), 90 + i))
            .collect();
        let mut store = MemoryStore::with_entries(prior);
        let entries = store.record(ScoreEntry::new("Ana", 80)).unwrap();

        assert_eq!(entries.len(), 10);
        assert!(!entries.contains(&ScoreEntry::new("Ana", 80)));
        assert!(!store.load().contains(&ScoreEntry::new("Ana", 80)));
    }

    #[test]
    fn test_equal_scores_keep_arrival_order() {
        let mut leaderboard = Leaderboard::default();
        assert_eq!(leaderboard.insert(ScoreEntry::new("First", 50)), Some(0));
        assert_eq!(leaderboard.insert(ScoreEntry::new("Second", 50)), Some(1));
        assert_eq!(leaderboard.insert(ScoreEntry::new("Best", 60)), Some(0));

        let names = leaderboard
            .entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect_vec();
        assert_eq!(names, vec!["Best", "First", "Second"]);
    }

    #[test]
    fn test_tie_with_last_place_of_full_table_is_dropped() {
        let mut leaderboard = Leaderboard::from(descending_entries());

        assert_eq!(leaderboard.insert(ScoreEntry::new("Late", 10)), None);
        assert_eq!(leaderboard.len(), 10);
        assert_eq!(leaderboard.entries()[9], ScoreEntry::new("P1", 10));
    }

    #[test]
    fn test_leaderboard_from_unsorted_list_normalizes() {
        let mut entries = descending_entries();
        entries.reverse();
        entries.push(ScoreEntry::new("Extra", 55));

        let leaderboard = Leaderboard::from(entries);

        assert_eq!(leaderboard.len(), 10);
        assert_eq!(leaderboard.entries()[0].score, 100);
        assert_eq!(leaderboard.entries()[5], ScoreEntry::new("Extra", 55));
        assert!(leaderboard.entries().iter().all(|e| e.score >= 20));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_store_malformed_file_is_empty() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.load().is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_record_and_load() {
        let path = temp_path("record");
        std::fs::remove_file(&path).ok();

        let mut store = FileStore::new(&path);
        store.record(ScoreEntry::new("Ana", 80)).unwrap();
        store.record(ScoreEntry::new("Bob", 95)).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.load(),
            vec![ScoreEntry::new("Bob", 95), ScoreEntry::new("Ana", 80)]
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_writes_plain_records() {
        let path = temp_path("format");
        let mut store = FileStore::new(&path);
        store.save(&[ScoreEntry::new("Ana", 80)]).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([{ "name": "Ana", "score": 80 }]));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_reads_legacy_field_names() {
        let path = temp_path("legacy");
        std::fs::write(
            &path,
            r#"[{"nombre": "Ana", "puntaje": 40}, {"nombre": "Luz", "puntaje": 70}]"#,
        )
        .unwrap();

        let store = FileStore::new(&path);
        assert_eq!(
            store.load(),
            vec![ScoreEntry::new("Luz", 70), ScoreEntry::new("Ana", 40)]
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_store_save_into_missing_directory_fails() {
        let mut store = FileStore::new(
            std::env::temp_dir()
                .join(format!("carrera_missing_dir_{}", std::process::id()))
                .join("scores.json"),
        );

        let result = store.save(&[ScoreEntry::new("Ana", 80)]);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_file_store_default_path() {
        assert_eq!(FileStore::default().path(), Path::new(DEFAULT_FILE));
    }
}
