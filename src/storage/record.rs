//! Persistence for the all-time record
//!
//! The record is a single non-negative integer. A missing or unreadable
//! record file counts as a record of zero; writing it may fail, and callers
//! decide how loud that should be.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

/// Storage for the best score ever reached
pub trait RecordStore {
    /// Current stored record, or 0 when there is none
    fn load(&self) -> u32;

    /// Overwrite the stored record
    fn save(&mut self, record: u32) -> Result<()>;
}

/// Record kept as decimal text in a plain file
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self) -> u32 {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                debug!("no record loaded from {:?}: {}", self.path, err);
                return 0;
            }
        };

        match text.trim().parse() {
            Ok(record) => record,
            Err(err) => {
                debug!("ignoring malformed record file {:?}: {}", self.path, err);
                0
            }
        }
    }

    fn save(&mut self, record: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        std::fs::write(&self.path, record.to_string())
            .with_context(|| format!("Failed to write record to {:?}", self.path))?;

        Ok(())
    }
}

/// In-memory record, used when no file should be touched
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    record: u32,
    saves: usize,
    fail_saves: bool,
}

impl MemoryRecordStore {
    pub fn new(record: u32) -> Self {
        Self {
            record,
            ..Default::default()
        }
    }

    /// A store whose every save fails, for exercising the warning path
    pub fn failing(record: u32) -> Self {
        Self {
            record,
            fail_saves: true,
            ..Default::default()
        }
    }

    pub fn record(&self) -> u32 {
        self.record
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> u32 {
        self.record
    }

    fn save(&mut self, record: u32) -> Result<()> {
        if self.fail_saves {
            anyhow::bail!("record store is read-only");
        }
        self.record = record;
        self.saves += 1;
        Ok(())
    }
}
