// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory state store with per-pattern locking

use crate::mutation::Mutation;
use crate::store::StateStore;
use chrono::{DateTime, Utc};
use pp_core::{
    Clock, GlobalState, PatternMetadata, PatternState, PipelineError, PipelineStateFile,
    STATE_FILE_VERSION,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Debug)]
struct DocumentMeta {
    last_updated: DateTime<Utc>,
    global: GlobalState,
}

/// State store kept in process memory
///
/// Each pattern sits behind its own mutex, so writers on different ids never
/// wait on each other. The id map is only write-locked to insert new ids.
pub struct MemoryStore<C: Clock> {
    clock: C,
    patterns: RwLock<HashMap<String, Arc<Mutex<PatternState>>>>,
    meta: Mutex<DocumentMeta>,
}

impl<C: Clock> MemoryStore<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            patterns: RwLock::new(HashMap::new()),
            meta: Mutex::new(DocumentMeta {
                last_updated: now,
                global: GlobalState::default(),
            }),
        }
    }

    fn touch(&self, now: DateTime<Utc>, history: Option<(&str, pp_core::WorkflowStep)>) {
        let mut meta = self.meta.lock().unwrap_or_else(|e| e.into_inner());
        meta.last_updated = now;
        if let Some((id, step)) = history {
            meta.global.record(id, step);
        }
    }

    fn entry(&self, id: &str) -> Result<Arc<Mutex<PatternState>>, PipelineError> {
        self.patterns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| PipelineError::not_found(id))
    }
}

impl<C: Clock> StateStore for MemoryStore<C> {
    fn initialize_pattern(
        &self,
        id: &str,
        metadata: PatternMetadata,
    ) -> Result<PatternState, PipelineError> {
        let now = self.clock.now();
        let state = {
            let mut patterns = self.patterns.write().unwrap_or_else(|e| e.into_inner());
            if patterns.contains_key(id) {
                return Err(PipelineError::DuplicatePattern { id: id.to_string() });
            }
            let state = PatternState::new(id, metadata, now);
            patterns.insert(id.to_string(), Arc::new(Mutex::new(state.clone())));
            state
        };
        self.touch(now, None);
        Ok(state)
    }

    fn get_pattern_state(&self, id: &str) -> Result<PatternState, PipelineError> {
        let entry = self.entry(id)?;
        let state = entry.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Ok(state)
    }

    fn apply(&self, id: &str, mutation: Mutation) -> Result<PatternState, PipelineError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().unwrap_or_else(|e| e.into_inner());

        let now = self.clock.now();
        let mut next = guard.clone();
        mutation.apply(&mut next, now)?;
        *guard = next.clone();

        self.touch(now, mutation.history_step().map(|step| (id, step)));
        Ok(next)
    }

    fn get_all_patterns(&self) -> Result<BTreeMap<String, PatternState>, PipelineError> {
        let entries: Vec<_> = self
            .patterns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(id, entry)| (id.clone(), Arc::clone(entry)))
            .collect();

        Ok(entries
            .into_iter()
            .map(|(id, entry)| {
                let state = entry.lock().unwrap_or_else(|e| e.into_inner()).clone();
                (id, state)
            })
            .collect())
    }

    fn snapshot(&self) -> Result<PipelineStateFile, PipelineError> {
        let patterns = self.get_all_patterns()?;
        let meta = self.meta.lock().unwrap_or_else(|e| e.into_inner());
        Ok(PipelineStateFile {
            version: STATE_FILE_VERSION.to_string(),
            last_updated: meta.last_updated,
            patterns,
            global: meta.global.clone(),
        })
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
