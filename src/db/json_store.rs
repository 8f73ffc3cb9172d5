// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Whole-store JSON snapshots for the training store.
//!
//! Both documents are rewritten in full on every flush. Each file is written
//! to a temporary file in the same directory and renamed into place, so a
//! crash mid-write leaves the previous snapshot intact. Updates made between
//! the last flush and a crash are lost.

use crate::db::files;
use crate::models::{Participant, TrainingSession};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// In-memory contents of the two snapshot documents.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrainingSnapshot {
    pub sessions: HashMap<String, TrainingSession>,
    pub participants: HashMap<String, Vec<Participant>>,
}

/// Reads and writes [`TrainingSnapshot`]s under a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load both documents. Missing files are treated as empty.
    pub fn load(&self) -> Result<TrainingSnapshot, PersistError> {
        let sessions = read_document(&self.dir.join(files::TRAININGS))?;
        let participants = read_document(&self.dir.join(files::PARTICIPANTS))?;

        tracing::info!(
            dir = %self.dir.display(),
            sessions = sessions.len(),
            "Loaded training snapshot"
        );

        Ok(TrainingSnapshot {
            sessions,
            participants,
        })
    }

    /// Write both documents, replacing the previous snapshot.
    pub fn save(&self, snapshot: &TrainingSnapshot) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Sorted keys keep the files diffable.
        let sessions: BTreeMap<_, _> = snapshot.sessions.iter().collect();
        let participants: BTreeMap<_, _> = snapshot.participants.iter().collect();

        write_document(&self.dir.join(files::TRAININGS), &sessions)?;
        write_document(&self.dir.join(files::PARTICIPANTS), &participants)?;

        tracing::debug!(
            dir = %self.dir.display(),
            sessions = sessions.len(),
            "Flushed training snapshot"
        );
        Ok(())
    }
}

fn read_document<T>(path: &Path) -> Result<HashMap<String, T>, PersistError>
where
    T: DeserializeOwned,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(source) => {
            return Err(PersistError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }

    serde_json::from_str(&raw).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| PersistError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Errors from snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(id: &str) -> TrainingSession {
        TrainingSession {
            id: id.to_string(),
            user_id: 1,
            title: "Интервалы на стадионе".to_string(),
            description: String::new(),
            sport: "бег".to_string(),
            lat: 55.7,
            lng: 37.6,
            start_time: "2024-09-15T10:00".to_string(),
            end_time: None,
            comment: String::new(),
            auto_accept: true,
            created_at: Utc.with_ymd_and_hms(2024, 9, 15, 9, 0, 0).unwrap(),
            username: "owner".to_string(),
            photo_url: None,
            is_premium: false,
        }
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), TrainingSnapshot::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut snapshot = TrainingSnapshot::default();
        snapshot.sessions.insert("a".to_string(), session("a"));
        snapshot.participants.insert(
            "a".to_string(),
            vec![Participant {
                user_id: 1,
                username: "owner".to_string(),
                photo_url: None,
                joined_at: Utc.with_ymd_and_hms(2024, 9, 15, 9, 0, 0).unwrap(),
            }],
        );
        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), snapshot);

        // Human-readable, UTF-8, keyed by session id.
        let raw = fs::read_to_string(dir.path().join(files::TRAININGS)).unwrap();
        assert!(raw.contains("Интервалы на стадионе"));
        assert!(raw.contains("\n  \"a\": {"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(files::TRAININGS), "{not json").unwrap();

        let err = JsonStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, PersistError::Json { .. }));
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store.save(&TrainingSnapshot::default()).unwrap();
        store.save(&TrainingSnapshot::default()).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![files::PARTICIPANTS, files::TRAININGS]);
    }
}
