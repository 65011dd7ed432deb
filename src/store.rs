use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One completed practice attempt, append-only once written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Completion time, epoch milliseconds.
    pub timestamp: i64,
    pub wpm: f64,
    pub accuracy: f64,
}

#[derive(Debug)]
pub enum StoreError {
    /// The persisted log exists but cannot be parsed. Callers fall back to
    /// an empty history and warn.
    Corrupt(String),
    /// The persisted log could not be read at all (permissions, I/O).
    Read(io::Error),
    /// The append could not be durably persisted. The in-memory copy keeps
    /// the record for the rest of the process.
    Write(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Corrupt(msg) => write!(f, "session log is corrupt: {msg}"),
            StoreError::Read(err) => write!(f, "failed to read session log: {err}"),
            StoreError::Write(err) => write!(f, "failed to persist session log: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Corrupt(_) => None,
            StoreError::Read(err) | StoreError::Write(err) => Some(err),
        }
    }
}

/// Append-only log of completed sessions.
pub trait SessionStore {
    /// Read the full persisted log, replacing the in-memory view. A missing
    /// log is an empty history, not an error.
    fn load(&mut self) -> Result<Vec<SessionRecord>, StoreError>;

    /// Append one record and persist. Either the record is durably visible
    /// to the next `load` or the error says it is not; on a write failure
    /// the in-memory view still carries the record.
    fn append(&mut self, record: SessionRecord) -> Result<(), StoreError>;

    /// Current in-memory view, chronological order.
    fn records(&self) -> &[SessionRecord];
}

/// Session log persisted as a single JSON list on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<SessionRecord>,
}

impl JsonFileStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typometer") {
            pd.data_dir().join("sessions.json")
        } else {
            PathBuf::from("typometer_sessions.json")
        };
        Self {
            path,
            records: Vec::new(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole log through a temp file and rename, so a failed
    /// write never leaves a half-written log behind.
    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StoreError::Write)?;
            }
        }

        let data = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| StoreError::Write(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).map_err(StoreError::Write)?;
        fs::rename(&tmp_path, &self.path).map_err(StoreError::Write)?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<SessionRecord>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.records.clear();
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::Read(e)),
        };

        let records: Vec<SessionRecord> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        self.records = records.clone();
        Ok(records)
    }

    fn append(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.records.push(record);
        self.persist()
    }

    fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}

/// In-memory store with the same contract, for tests and history-less runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }
}

impl SessionStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn append(&mut self, record: SessionRecord) -> Result<(), StoreError> {
        self.records.push(record);
        Ok(())
    }

    fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}
