//! Append-only Phoenix recovery log: one JSON line per recorded event,
//! never rewritten or truncated.

use std::io::Write;
use std::path::PathBuf;

use aegis_core::MeshTimestamp;
use parking_lot::Mutex;

#[derive(Debug, Clone, serde::Serialize)]
pub struct RecoveryLogEntry {
    pub phase: &'static str,
    pub detail: String,
    pub timestamp: MeshTimestamp,
}

pub struct RecoveryLog {
    path: PathBuf,
    /// In-memory mirror for callers (e.g. `/health/deep`) that want the
    /// latest entries without re-reading the file.
    recent: Mutex<Vec<RecoveryLogEntry>>,
}

impl RecoveryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recent: Mutex::new(Vec::new()),
        }
    }

    pub fn append(&self, phase: &'static str, detail: impl Into<String>) {
        let entry = RecoveryLogEntry {
            phase,
            detail: detail.into(),
            timestamp: MeshTimestamp::now(),
        };

        if let Ok(line) = serde_json::to_string(&entry) {
            if let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(&self.path) {
                let _ = writeln!(file, "{line}");
            } else {
                tracing::warn!(path = %self.path.display(), "failed to open recovery log for append");
            }
        }

        let mut recent = self.recent.lock();
        recent.push(entry);
        if recent.len() > 200 {
            recent.remove(0);
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<RecoveryLogEntry> {
        let recent = self.recent.lock();
        recent.iter().rev().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_visible_via_recent() {
        let dir = std::env::temp_dir().join(format!("aegis-watchdog-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let log = RecoveryLog::new(dir.join("recovery.log"));
        log.append("diagnose", "service-a down");
        log.append("drain", "flushed 3 ops");
        let recent = log.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].phase, "drain");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
