//! AuditLog — append-only, newline-delimited JSON event log rolling at the
//! local-day boundary.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state_store::StorageError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    Decision,
    Action,
    Learning,
    Rollback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub kind: AuditEventKind,
    pub timestamp: i64,
    pub datetime: DateTime<Utc>,
    pub payload: serde_json::Value,
}

pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path_for(&self, datetime: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!("audit_{}.jsonl", datetime.format("%Y%m%d")))
    }

    /// Append one event as a single JSON line. Rolls to a new file on the
    /// next local-day boundary automatically, since the file name is
    /// derived from the event's own timestamp.
    pub fn append(&self, event: &AuditEvent) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::Io(self.dir.clone(), e))?;
        let path = self.file_path_for(event.datetime);
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StorageError::Io(path.clone(), e))?;
        let line = serde_json::to_string(event)?;
        writeln!(file, "{line}").map_err(|e| StorageError::Io(path, e))?;
        Ok(())
    }

    /// Read every event from the day's file, in file order.
    pub fn read_day(&self, datetime: DateTime<Utc>) -> Result<Vec<AuditEvent>, StorageError> {
        let path = self.file_path_for(datetime);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| StorageError::Io(path, e))?;
        let events = raw
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_event(kind: AuditEventKind, datetime: DateTime<Utc>) -> AuditEvent {
        AuditEvent {
            id: "evt-1".to_string(),
            kind,
            timestamp: datetime.timestamp_millis(),
            datetime,
            payload: serde_json::json!({ "note": "test" }),
        }
    }

    #[test]
    fn append_and_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        let when = Utc.with_ymd_and_hms(2026, 7, 27, 12, 0, 0).unwrap();
        log.append(&make_event(AuditEventKind::Decision, when)).unwrap();
        log.append(&make_event(AuditEventKind::Action, when)).unwrap();

        let events = log.read_day(when).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, AuditEventKind::Decision);
    }

    #[test]
    fn rolls_to_a_new_file_on_day_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        let day1 = Utc.with_ymd_and_hms(2026, 7, 27, 23, 59, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 7, 28, 0, 1, 0).unwrap();
        log.append(&make_event(AuditEventKind::Decision, day1)).unwrap();
        log.append(&make_event(AuditEventKind::Decision, day2)).unwrap();

        assert_eq!(log.read_day(day1).unwrap().len(), 1);
        assert_eq!(log.read_day(day2).unwrap().len(), 1);
    }

    #[test]
    fn read_day_with_no_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());
        let when = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(log.read_day(when).unwrap().is_empty());
    }
}
