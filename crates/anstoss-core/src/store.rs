//! Speichergrenze für Gewichtstabelle und Audit-Logs.
//!
//! [`FileStore`] legt alles unterhalb eines explizit übergebenen
//! Wurzelverzeichnisses ab: die Tabelle als JSON-Array, die beiden Logs als
//! JSON Lines. [`MemoryStore`] hält denselben Zustand im Speicher, etwa für
//! Tests oder eingebettete Aufrufer.
//!
//! Beide Implementierungen sind für genau einen schreibenden Aufrufer gedacht.
//! Die Sequenz Laden → Ändern → Speichern ist über zwei I/O-Aufrufe verteilt
//! und damit nicht atomar; parallele Schreiber können Updates verlieren.

use crate::error::{Result, StorageError};
use crate::record::{
    default_suggestions, iso8601_now, FeedbackEvent, ImprovementRecord, Suggestion, WEIGHT_MAX,
    WEIGHT_MIN,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_ROOT: &str = "data";
const WEIGHTS_FILE: &str = "weights.json";
const FEEDBACK_FILE: &str = "feedback.jsonl";
const IMPROVEMENTS_FILE: &str = "improvement_log.jsonl";

/// Dauerhafte Ablage für Vorschläge, Feedback und Gewichtsänderungen.
pub trait WeightStore {
    /// Lädt die Tabelle in Dateireihenfolge. Existiert noch keine, wird sie
    /// vorher mit [`default_suggestions`] angelegt.
    fn load_weights(&self) -> Result<Vec<Suggestion>>;

    /// Ersetzt die komplette Tabelle. Leser sehen entweder die alte oder die
    /// neue Tabelle, nie einen Zwischenstand.
    fn save_weights(&self, table: &[Suggestion]) -> Result<()>;

    /// Hängt ein Feedback-Ereignis mit aktuellem Zeitstempel an. Der Reward
    /// wird nicht geprüft.
    fn log_feedback(
        &self,
        suggestion_id: &str,
        user_context_text: &str,
        suggestion_text: &str,
        reward: i32,
    ) -> Result<FeedbackEvent>;

    /// Hängt einen Verbesserungs-Eintrag an.
    fn log_improvement(
        &self,
        suggestion_id: &str,
        previous_weight: f64,
        reward: i32,
        new_weight: f64,
    ) -> Result<ImprovementRecord>;

    fn load_feedback(&self) -> Result<Vec<FeedbackEvent>>;

    fn load_improvements(&self) -> Result<Vec<ImprovementRecord>>;
}

/// Wurzelverzeichnis des Datei-Stores; die Dateinamen darunter sind fest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn weights_path(&self) -> PathBuf {
        self.root.join(WEIGHTS_FILE)
    }

    #[must_use]
    pub fn feedback_path(&self) -> PathBuf {
        self.root.join(FEEDBACK_FILE)
    }

    #[must_use]
    pub fn improvements_path(&self) -> PathBuf {
        self.root.join(IMPROVEMENTS_FILE)
    }
}

/// Datei-basierter Store unterhalb von [`StoreConfig::root`].
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn bootstrap(&self, path: &Path) -> Result<()> {
        let seeds = default_suggestions();
        write_table_atomic(path, &seeds)?;
        info!(
            path = %path.display(),
            suggestions = seeds.len(),
            "seeded weight table"
        );
        Ok(())
    }
}

impl WeightStore for FileStore {
    fn load_weights(&self) -> Result<Vec<Suggestion>> {
        let path = self.config.weights_path();
        if !path.exists() {
            self.bootstrap(&path)?;
        }
        let file = File::open(&path).map_err(|e| StorageError::io(&path, e))?;
        let table: Vec<Suggestion> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                StorageError::Corrupt {
                    line: source.line(),
                    path: path.clone(),
                    source,
                }
            })?;
        validate_table(&table)?;
        Ok(table)
    }

    fn save_weights(&self, table: &[Suggestion]) -> Result<()> {
        validate_table(table)?;
        let path = self.config.weights_path();
        write_table_atomic(&path, table)?;
        debug!(path = %path.display(), suggestions = table.len(), "saved weight table");
        Ok(())
    }

    fn log_feedback(
        &self,
        suggestion_id: &str,
        user_context_text: &str,
        suggestion_text: &str,
        reward: i32,
    ) -> Result<FeedbackEvent> {
        let event = FeedbackEvent {
            timestamp: iso8601_now(),
            suggestion_id: suggestion_id.to_string(),
            user_context_text: user_context_text.to_string(),
            suggestion_text: suggestion_text.to_string(),
            reward,
        };
        append_record(&self.config.feedback_path(), &event)?;
        Ok(event)
    }

    fn log_improvement(
        &self,
        suggestion_id: &str,
        previous_weight: f64,
        reward: i32,
        new_weight: f64,
    ) -> Result<ImprovementRecord> {
        let record = ImprovementRecord {
            timestamp: iso8601_now(),
            suggestion_id: suggestion_id.to_string(),
            previous_weight,
            reward,
            new_weight,
        };
        append_record(&self.config.improvements_path(), &record)?;
        Ok(record)
    }

    fn load_feedback(&self) -> Result<Vec<FeedbackEvent>> {
        read_records(&self.config.feedback_path())
    }

    fn load_improvements(&self) -> Result<Vec<ImprovementRecord>> {
        read_records(&self.config.improvements_path())
    }
}

/// Store im Speicher. Ohne vorgegebene Tabelle wird beim ersten Laden der
/// Start-Pool angelegt, wie beim [`FileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RefCell<Option<Vec<Suggestion>>>,
    feedback: RefCell<Vec<FeedbackEvent>>,
    improvements: RefCell<Vec<ImprovementRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store mit fester Tabelle; eine leere Tabelle bleibt leer.
    #[must_use]
    pub fn with_table(table: Vec<Suggestion>) -> Self {
        Self {
            table: RefCell::new(Some(table)),
            ..Self::default()
        }
    }
}

impl WeightStore for MemoryStore {
    fn load_weights(&self) -> Result<Vec<Suggestion>> {
        let mut table = self.table.borrow_mut();
        let table = table.get_or_insert_with(default_suggestions);
        validate_table(table)?;
        Ok(table.clone())
    }

    fn save_weights(&self, table: &[Suggestion]) -> Result<()> {
        validate_table(table)?;
        *self.table.borrow_mut() = Some(table.to_vec());
        Ok(())
    }

    fn log_feedback(
        &self,
        suggestion_id: &str,
        user_context_text: &str,
        suggestion_text: &str,
        reward: i32,
    ) -> Result<FeedbackEvent> {
        let event = FeedbackEvent {
            timestamp: iso8601_now(),
            suggestion_id: suggestion_id.to_string(),
            user_context_text: user_context_text.to_string(),
            suggestion_text: suggestion_text.to_string(),
            reward,
        };
        self.feedback.borrow_mut().push(event.clone());
        Ok(event)
    }

    fn log_improvement(
        &self,
        suggestion_id: &str,
        previous_weight: f64,
        reward: i32,
        new_weight: f64,
    ) -> Result<ImprovementRecord> {
        let record = ImprovementRecord {
            timestamp: iso8601_now(),
            suggestion_id: suggestion_id.to_string(),
            previous_weight,
            reward,
            new_weight,
        };
        self.improvements.borrow_mut().push(record.clone());
        Ok(record)
    }

    fn load_feedback(&self) -> Result<Vec<FeedbackEvent>> {
        Ok(self.feedback.borrow().clone())
    }

    fn load_improvements(&self) -> Result<Vec<ImprovementRecord>> {
        Ok(self.improvements.borrow().clone())
    }
}

/// Prüft eindeutige IDs und Gewichte innerhalb der Grenzen.
fn validate_table(table: &[Suggestion]) -> Result<()> {
    let mut seen = HashSet::with_capacity(table.len());
    for suggestion in table {
        if !seen.insert(suggestion.id.as_str()) {
            return Err(StorageError::DuplicateId {
                id: suggestion.id.clone(),
            });
        }
        if !(WEIGHT_MIN..=WEIGHT_MAX).contains(&suggestion.weight) {
            return Err(StorageError::WeightOutOfBounds {
                id: suggestion.id.clone(),
                weight: suggestion.weight,
            });
        }
    }
    Ok(())
}

/// Schreibt in eine Nachbardatei und benennt sie dann über das Ziel um.
fn write_table_atomic(path: &Path, table: &[Suggestion]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let json = serde_json::to_vec_pretty(table)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json).map_err(|e| StorageError::io(&temp_path, e))?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::io(path, err));
    }
    Ok(())
}

fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::io(path, e))?;
    file.write_all(line.as_bytes())
        .map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StorageError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
