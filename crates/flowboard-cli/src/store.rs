//! Directory-backed diagram and lock store.
//!
//! Each diagram is a JSON record in `<id>.json`; its lock, when held, sits
//! next to it in `<id>.lock.json`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use log::{debug, info};

use flowboard::{
    FlowboardError,
    model::{DiagramRecord, DiagramType, LockInfo},
    persist::{DiagramService, LockService, User},
};

const RECORD_EXTENSION: &str = "json";
const LOCK_SUFFIX: &str = ".lock.json";

/// A directory of diagram records and their locks.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FlowboardError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(path = root.display().to_string(); "Diagram store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, diagram_id: u64) -> PathBuf {
        self.root.join(format!("{diagram_id}.{RECORD_EXTENSION}"))
    }

    fn lock_path(&self, diagram_id: u64) -> PathBuf {
        self.root.join(format!("{diagram_id}{LOCK_SUFFIX}"))
    }

    /// Ids of all stored diagrams, ascending.
    pub fn ids(&self) -> Result<Vec<u64>, FlowboardError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u64>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Creates an empty diagram under the next free id.
    pub fn create(
        &mut self,
        name: &str,
        diagram_type: DiagramType,
    ) -> Result<DiagramRecord, FlowboardError> {
        let id = self.ids()?.last().map_or(1, |last| last + 1);
        let record = DiagramRecord::new(id, name, diagram_type);
        self.write_record(&record)?;
        info!(diagram_id = id, name, diagram_type:% = diagram_type; "Diagram created");
        Ok(record)
    }

    fn write_record(&self, record: &DiagramRecord) -> Result<(), FlowboardError> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(record.id), json)?;
        Ok(())
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>, FlowboardError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs().to_string())
        .unwrap_or_default()
}

impl DiagramService for DirectoryStore {
    fn fetch(&mut self, diagram_id: u64) -> Result<DiagramRecord, FlowboardError> {
        let text = read_if_exists(&self.record_path(diagram_id))?
            .ok_or(FlowboardError::NotFound(diagram_id))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn update(&mut self, diagram_id: u64, content: &str) -> Result<(), FlowboardError> {
        let mut record = self.fetch(diagram_id)?;
        record.content = Some(content.to_string());
        self.write_record(&record)?;
        debug!(diagram_id, bytes = content.len(); "Diagram content written");
        Ok(())
    }
}

impl LockService for DirectoryStore {
    fn current(&mut self, diagram_id: u64) -> Result<Option<LockInfo>, FlowboardError> {
        read_if_exists(&self.lock_path(diagram_id))?
            .map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(FlowboardError::from)
    }

    fn acquire(&mut self, diagram_id: u64, user: &User) -> Result<LockInfo, FlowboardError> {
        if !self.record_path(diagram_id).exists() {
            return Err(FlowboardError::NotFound(diagram_id));
        }
        if let Some(existing) = self.current(diagram_id)? {
            if existing.is_held_by_other(user.id()) {
                return Err(FlowboardError::LockConflict {
                    diagram_id,
                    holder: existing.username,
                });
            }
        }

        let lock = LockInfo {
            diagram_id,
            user_id: user.id().to_string(),
            username: user.username().to_string(),
            locked_at: timestamp(),
        };
        fs::write(self.lock_path(diagram_id), serde_json::to_string_pretty(&lock)?)?;
        Ok(lock)
    }

    fn release(&mut self, diagram_id: u64, user: &User) -> Result<(), FlowboardError> {
        match self.current(diagram_id)? {
            Some(existing) if existing.is_held_by_other(user.id()) => {
                Err(FlowboardError::LockConflict {
                    diagram_id,
                    holder: existing.username,
                })
            }
            Some(_) => {
                fs::remove_file(self.lock_path(diagram_id))?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}
