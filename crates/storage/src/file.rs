// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON document store
//!
//! The whole pipeline lives in one JSON document. Every operation holds an
//! exclusive advisory lock on a sidecar `<file>.lock` for its full
//! read-modify-write, and writes go to a temp file that is renamed over the
//! document, so readers in other processes never see a torn write.

use crate::mutation::Mutation;
use crate::store::StateStore;
use fs2::FileExt;
use pp_core::{
    Clock, PatternMetadata, PatternState, PersistenceError, PipelineError, PipelineStateFile,
    STATE_FILE_VERSION,
};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// State store backed by a single JSON file
pub struct JsonFileStore<C: Clock> {
    path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
    clock: C,
    // flock is per open file description; this keeps threads of one process in line too
    local: Mutex<()>,
}

impl<C: Clock> JsonFileStore<C> {
    /// Open a store at `path`, creating parent directories
    ///
    /// The document itself is created on first write.
    pub fn open(path: impl Into<PathBuf>, clock: C) -> Result<Self, PipelineError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PersistenceError::from)?;
        }
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        Ok(Self {
            path,
            lock_path,
            lock_timeout: Duration::from_secs(10),
            clock,
            local: Mutex::new(()),
        })
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the document while holding the lock
    ///
    /// The document is written back only when `f` returns `Ok(_, true)`.
    fn locked<T>(
        &self,
        f: impl FnOnce(&mut PipelineStateFile) -> Result<(T, bool), PipelineError>,
    ) -> Result<T, PipelineError> {
        let _local = self.local.lock().unwrap_or_else(|e| e.into_inner());
        let _lock = self.acquire_lock()?;

        let mut doc = self.read_document()?;
        let (value, dirty) = f(&mut doc)?;
        if dirty {
            doc.last_updated = self.clock.now();
            self.write_document(&doc)?;
        }
        Ok(value)
    }

    fn acquire_lock(&self) -> Result<File, PersistenceError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;

        let start = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(file),
                Err(e) if is_contended(&e) => {
                    let waited = start.elapsed();
                    if waited >= self.lock_timeout {
                        return Err(PersistenceError::LockTimeout {
                            path: self.lock_path.clone(),
                            waited,
                        });
                    }
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_document(&self) -> Result<PipelineStateFile, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(PipelineStateFile::new(self.clock.now()));
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(PipelineStateFile::new(self.clock.now()));
        }

        let doc: PipelineStateFile = serde_json::from_str(&content)?;
        check_version(&doc.version)?;
        Ok(doc)
    }

    fn write_document(&self, doc: &PipelineStateFile) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, doc)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Accept any document with the same major version as ours
fn check_version(found: &str) -> Result<(), PersistenceError> {
    let unsupported = || PersistenceError::UnsupportedVersion {
        found: found.to_string(),
        expected: STATE_FILE_VERSION.to_string(),
    };
    let ours = semver::Version::parse(STATE_FILE_VERSION).map_err(|_| unsupported())?;
    let theirs = semver::Version::parse(found).map_err(|_| unsupported())?;
    if theirs.major == ours.major {
        Ok(())
    } else {
        Err(unsupported())
    }
}

impl<C: Clock> StateStore for JsonFileStore<C> {
    fn initialize_pattern(
        &self,
        id: &str,
        metadata: PatternMetadata,
    ) -> Result<PatternState, PipelineError> {
        let now = self.clock.now();
        self.locked(|doc| {
            if doc.patterns.contains_key(id) {
                return Err(PipelineError::DuplicatePattern { id: id.to_string() });
            }
            let state = PatternState::new(id, metadata, now);
            doc.patterns.insert(id.to_string(), state.clone());
            Ok((state, true))
        })
    }

    fn get_pattern_state(&self, id: &str) -> Result<PatternState, PipelineError> {
        self.locked(|doc| {
            let state = doc
                .patterns
                .get(id)
                .cloned()
                .ok_or_else(|| PipelineError::not_found(id))?;
            Ok((state, false))
        })
    }

    fn apply(&self, id: &str, mutation: Mutation) -> Result<PatternState, PipelineError> {
        let now = self.clock.now();
        self.locked(|doc| {
            let mut next = doc
                .patterns
                .get(id)
                .cloned()
                .ok_or_else(|| PipelineError::not_found(id))?;
            mutation.apply(&mut next, now)?;
            doc.patterns.insert(id.to_string(), next.clone());
            if let Some(step) = mutation.history_step() {
                doc.global.record(id, step);
            }
            Ok((next, true))
        })
    }

    fn get_all_patterns(&self) -> Result<BTreeMap<String, PatternState>, PipelineError> {
        self.locked(|doc| Ok((std::mem::take(&mut doc.patterns), false)))
    }

    fn snapshot(&self) -> Result<PipelineStateFile, PipelineError> {
        self.locked(|doc| Ok((doc.clone(), false)))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
