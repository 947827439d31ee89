// ── JSON-lines footprint history ──
//
// One `HistoryEntry` per line. Appends are serialized through a mutex;
// clearing rewrites the file with the surviving entries.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{HistoryEntry, Scope};
use crate::ports::{HistorySink, HistoryStore};

/// History persisted to a JSON-lines file.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    lock: Mutex<()>,
}

fn io_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::History {
        message: format!("{}: {err}", path.display()),
    }
}

impl FileHistory {
    /// Open (without creating) the history file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_all(&self) -> Result<Vec<HistoryEntry>, CoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(&self.path, &err)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| io_error(&self.path, &e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %err,
                    "skipping unreadable history line"
                ),
            }
        }
        Ok(entries)
    }

    fn write_all(&self, entries: &[HistoryEntry]) -> Result<(), CoreError> {
        let file = File::create(&self.path).map_err(|e| io_error(&self.path, &e))?;
        let mut out = BufWriter::new(file);
        for entry in entries {
            write_line(&mut out, entry).map_err(|e| io_error(&self.path, &e))?;
        }
        out.flush().map_err(|e| io_error(&self.path, &e))
    }
}

fn write_line(out: &mut impl Write, entry: &HistoryEntry) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, entry)?;
    out.write_all(b"\n")
}

impl HistorySink for FileHistory {
    fn record(&self, entry: HistoryEntry) -> Result<(), CoreError> {
        let _guard = self.guard();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, &e))?;
        write_line(&mut file, &entry).map_err(|e| io_error(&self.path, &e))?;
        debug!(path = %self.path.display(), id = %entry.id, "history entry recorded");
        Ok(())
    }
}

impl HistoryStore for FileHistory {
    fn entries(&self, scope: &Scope) -> Result<Vec<HistoryEntry>, CoreError> {
        let _guard = self.guard();
        let mut entries: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|e| scope.includes(&e.caller))
            .collect();
        entries.sort_by_key(|e| e.requested_at);
        Ok(entries)
    }

    fn clear(&self, scope: &Scope) -> Result<usize, CoreError> {
        let _guard = self.guard();
        let all = self.read_all()?;
        let before = all.len();
        let kept: Vec<_> = all.into_iter().filter(|e| !scope.includes(&e.caller)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.write_all(&kept)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::model::{ConnectionType, DeviceClass, Resolution};

    fn entry(caller: &str, footprint: f64) -> HistoryEntry {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        HistoryEntry {
            id: Uuid::new_v4(),
            caller: caller.into(),
            requested_at: at,
            duration_minutes: 45,
            start: at,
            resolution: Resolution::new(1080),
            device: DeviceClass::Computer,
            connection: ConnectionType::Cable,
            city: "Berlin".into(),
            country: Some("Germany".into()),
            footprint,
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistory::new(dir.path().join("history.jsonl"));
        assert!(store.entries(&Scope::All).unwrap().is_empty());
        assert_eq!(store.clear(&Scope::All).unwrap(), 0);
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.jsonl");
        let first = FileHistory::new(&path);
        first.record(entry("alice", 1.5)).unwrap();
        first.record(entry("bob", 2.5)).unwrap();

        let reopened = FileHistory::new(&path);
        let alice = reopened.entries(&Scope::Caller("alice".into())).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].country.as_deref(), Some("Germany"));
    }

    #[test]
    fn clear_keeps_other_callers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistory::new(dir.path().join("history.jsonl"));
        store.record(entry("alice", 1.0)).unwrap();
        store.record(entry("alice", 2.0)).unwrap();
        store.record(entry("bob", 3.0)).unwrap();

        assert_eq!(store.clear(&Scope::Caller("alice".into())).unwrap(), 2);
        assert_eq!(store.footprints(&Scope::All).unwrap(), vec![3.0]);
    }

    #[test]
    fn corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = FileHistory::new(&path);
        store.record(entry("alice", 4.0)).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{not json}\n").unwrap();

        assert_eq!(store.footprints(&Scope::All).unwrap(), vec![4.0]);
    }
}
