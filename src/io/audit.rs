//! Append-only audit/feedback sink.
//!
//! Events are `(id, ts, actor, action, payload)` records. Ids are assigned by the
//! sink in insertion order; `recent` lists newest first.
//!
//! Two implementations:
//! - `MemoryAuditSink`: mutex-guarded vector (tests, one-shot runs)
//! - `JsonlAuditSink`: one JSON object per line in an append-only file

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::SinkError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: u64,
    pub ts: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub payload: Value,
}

/// Destination for audit and feedback events.
///
/// Implementations serialize their own writes; callers may share one sink across
/// threads.
pub trait AuditSink: Send + Sync {
    /// Durably append one event and return it as stored.
    fn append(&self, actor: &str, action: &str, payload: Value) -> Result<AuditEvent, SinkError>;

    /// Up to `limit` events, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<AuditEvent>, SinkError>;
}

#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// All events in insertion order.
    pub fn snapshot(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, actor: &str, action: &str, payload: Value) -> Result<AuditEvent, SinkError> {
        let mut events = self.events.lock();
        let event = AuditEvent {
            id: events.len() as u64 + 1,
            ts: Utc::now(),
            actor: actor.to_string(),
            action: action.to_string(),
            payload,
        };
        events.push(event.clone());
        Ok(event)
    }

    fn recent(&self, limit: usize) -> Result<Vec<AuditEvent>, SinkError> {
        let events = self.events.lock();
        Ok(events.iter().rev().take(limit).cloned().collect())
    }
}

/// NDJSON file sink. The next id is recovered from the file on open.
///
/// Opening never fails: an unreadable file starts ids from 1 and the failure
/// shows up again on the first `append`, where callers decide what to do.
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    next_id: Mutex<u64>,
}

impl JsonlAuditSink {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_id = match read_events(&path) {
            Ok(events) => events.iter().map(|e| e.id).max().unwrap_or(0),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "audit log unreadable; ids restart at 1");
                0
            }
        };
        Self {
            path,
            next_id: Mutex::new(last_id + 1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, actor: &str, action: &str, payload: Value) -> Result<AuditEvent, SinkError> {
        // Held across the write so ids and line order agree.
        let mut next_id = self.next_id.lock();
        let event = AuditEvent {
            id: *next_id,
            ts: Utc::now(),
            actor: actor.to_string(),
            action: action.to_string(),
            payload,
        };

        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        let mut file = OpenOptions::new().create(true).read(true).append(true).open(&self.path)?;
        // A torn earlier write must not swallow this record.
        if ends_mid_line(&mut file)? {
            line.insert(0, b'\n');
        }
        file.write_all(&line)?;
        file.flush()?;

        *next_id += 1;
        Ok(event)
    }

    fn recent(&self, limit: usize) -> Result<Vec<AuditEvent>, SinkError> {
        let _guard = self.next_id.lock();
        let mut events = read_events(&self.path)?;
        events.reverse();
        events.truncate(limit);
        Ok(events)
    }
}

fn ends_mid_line(file: &mut File) -> Result<bool, SinkError> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Parse every well-formed line; corrupt lines are logged and skipped.
fn read_events(path: &Path) -> Result<Vec<AuditEvent>, SinkError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).split(b'\n').enumerate() {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice(&line) {
            Ok(event) => out.push(event),
            Err(err) => warn!(path = %path.display(), line = idx + 1, error = %err, "skipping corrupt audit line"),
        }
    }
    Ok(out)
}
