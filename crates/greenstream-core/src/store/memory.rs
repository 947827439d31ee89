// ── In-memory footprint history ──
//
// Concurrent per-caller storage. Nothing survives the process; used when
// embedding the core and in tests.

use dashmap::DashMap;

use crate::error::CoreError;
use crate::model::{HistoryEntry, Scope};
use crate::ports::{HistorySink, HistoryStore};

/// History kept in a `DashMap` keyed by caller id.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    by_caller: DashMap<String, Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all callers.
    pub fn len(&self) -> usize {
        self.by_caller.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySink for MemoryHistory {
    fn record(&self, entry: HistoryEntry) -> Result<(), CoreError> {
        self.by_caller
            .entry(entry.caller.clone())
            .or_default()
            .push(entry);
        Ok(())
    }
}

impl HistoryStore for MemoryHistory {
    fn entries(&self, scope: &Scope) -> Result<Vec<HistoryEntry>, CoreError> {
        let mut out: Vec<HistoryEntry> = match scope {
            Scope::Caller(id) => self
                .by_caller
                .get(id)
                .map(|e| e.value().clone())
                .unwrap_or_default(),
            Scope::All => self
                .by_caller
                .iter()
                .flat_map(|e| e.value().clone())
                .collect(),
        };
        out.sort_by_key(|e| e.requested_at);
        Ok(out)
    }

    fn clear(&self, scope: &Scope) -> Result<usize, CoreError> {
        let removed = match scope {
            Scope::Caller(id) => self.by_caller.remove(id).map_or(0, |(_, v)| v.len()),
            Scope::All => {
                let count = self.len();
                self.by_caller.clear();
                count
            }
        };
        Ok(removed)
    }
}
