//! Decision audit log
//!
//! Appends one JSON line per gate decision to `<dir>/decisions.jsonl`.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AgentAction, AgentPermissionResult, GateResult};

/// File name of the decision log inside the audit directory
const DECISIONS_FILE: &str = "decisions.jsonl";

/// One recorded decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: AgentAction,
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditRecord {
    /// Record a decision taken now
    pub fn new(action: &AgentAction, result: &AgentPermissionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: action.clone(),
            allowed: result.allowed,
            reason: result.reason.clone(),
        }
    }
}

/// Append-only JSONL decision log
///
/// Clones share one writer lock, so concurrent appends never interleave.
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl AuditLog {
    /// Create an audit log writing into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the decisions file
    pub fn path(&self) -> PathBuf {
        self.dir.join(DECISIONS_FILE)
    }

    /// Append a decision
    pub fn record(
        &self,
        action: &AgentAction,
        result: &AgentPermissionResult,
    ) -> GateResult<AuditRecord> {
        let record = AuditRecord::new(action, result);
        self.append(&record)?;
        Ok(record)
    }

    /// Append a prepared record
    pub fn append(&self, record: &AuditRecord) -> GateResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        // Lines are written whole, so a poisoned lock is still usable
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;

        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// Load every recorded decision, oldest first
    pub fn load_records(&self) -> GateResult<Vec<AuditRecord>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("audit"));

        let nav = AgentAction::navigate("/app/settings");
        let click = AgentAction::click("#capa-new-button");
        log.record(&nav, &AgentPermissionResult::deny("restricted")).unwrap();
        log.record(&click, &AgentPermissionResult::allow()).unwrap();

        let records = log.load_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, nav);
        assert!(!records[0].allowed);
        assert_eq!(records[0].reason.as_deref(), Some("restricted"));
        assert!(records[1].allowed);
        assert!(records[1].reason.is_none());
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn test_load_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        assert!(log.load_records().unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        log.record(&AgentAction::navigate("/app"), &AgentPermissionResult::allow())
            .unwrap();

        let mut file = fs::OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "   ").unwrap();

        assert_eq!(log.load_records().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_appends_stay_line_aligned() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        let threads = 8;
        let per_thread = 250;

        std::thread::scope(|scope| {
            for t in 0..threads {
                let log = log.clone();
                scope.spawn(move || {
                    let action = AgentAction::navigate(format!("/app/incidents/{}", t));
                    for _ in 0..per_thread {
                        log.record(&action, &AgentPermissionResult::allow()).unwrap();
                    }
                });
            }
        });

        let records = log.load_records().unwrap();
        assert_eq!(records.len(), threads * per_thread);
    }
}
