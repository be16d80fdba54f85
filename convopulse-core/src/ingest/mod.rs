//! Interaction-log normalization
//!
//! Reads raw interaction logs (CSV export with JSON message envelopes) and
//! produces the normalized [`Event`] collection the metrics engine consumes.
//!
//! The normalizer is resilient at the row level: a malformed row is skipped
//! with a warning rather than failing the run. Only structural problems (a
//! missing file, a header without the required columns) are fatal.

use crate::csv;
use crate::error::{Error, Result};
use crate::types::{AuthorRole, Event};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::path::Path;

// Raw export header names, matched case-insensitively.
const COL_ID: &str = "id";
const COL_DATE: &str = "event date";
const COL_USER: &str = "user id";
const COL_THREAD: &str = "thread id";
const COL_MESSAGE: &str = "message";

/// JSON envelope carried in the `Message` column.
#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Outcome of one normalization run.
#[derive(Debug)]
pub struct NormalizeResult {
    /// Events in chronological order
    pub events: Vec<Event>,
    /// Data rows seen in the input (excluding the header)
    pub rows_read: usize,
    /// Rows dropped as malformed or incomplete
    pub rows_skipped: usize,
    /// One message per skipped row
    pub warnings: Vec<String>,
}

/// Normalizes raw interaction-log exports into [`Event`]s.
pub struct CsvNormalizer;

impl CsvNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Read and normalize a log file.
    pub fn normalize_file(&self, path: &Path) -> Result<NormalizeResult> {
        let text = std::fs::read_to_string(path)?;
        self.normalize_str(&text, &path.display().to_string())
    }

    /// Normalize log text. `source` names the input in errors and warnings.
    pub fn normalize_str(&self, text: &str, source: &str) -> Result<NormalizeResult> {
        let records = csv::parse_records(text);
        let mut rows = records.into_iter();

        let header = rows.next().ok_or_else(|| Error::Parse {
            path: source.to_string(),
            message: "empty input, no header row".to_string(),
        })?;
        let columns = ColumnMap::from_header(&header, source)?;

        let mut events = Vec::new();
        let mut warnings = Vec::new();
        let mut rows_read = 0usize;

        for (row_number, record) in rows.enumerate() {
            // Header is row 1.
            let row_number = row_number + 2;
            rows_read += 1;
            match columns.parse_row(&record) {
                Ok(event) => events.push(event),
                Err(reason) => {
                    let warning = format!("row {}: {}", row_number, reason);
                    tracing::warn!(source, "Skipping malformed row: {}", warning);
                    warnings.push(warning);
                }
            }
        }

        events.sort_by_key(|e| e.ts);

        let rows_skipped = warnings.len();
        tracing::info!(
            source,
            rows_read,
            rows_skipped,
            events = events.len(),
            "Normalized interaction log"
        );

        Ok(NormalizeResult {
            events,
            rows_read,
            rows_skipped,
            warnings,
        })
    }
}

impl Default for CsvNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

struct ColumnMap {
    id: usize,
    date: usize,
    user: usize,
    thread: usize,
    message: usize,
}

impl ColumnMap {
    fn from_header(header: &[String], source: &str) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::Parse {
                    path: source.to_string(),
                    message: format!("missing required column: {}", name),
                })
        };

        Ok(Self {
            id: find(COL_ID)?,
            date: find(COL_DATE)?,
            user: find(COL_USER)?,
            thread: find(COL_THREAD)?,
            message: find(COL_MESSAGE)?,
        })
    }

    fn parse_row(&self, record: &[String]) -> std::result::Result<Event, String> {
        let field = |index: usize, name: &str| -> std::result::Result<&str, String> {
            record
                .get(index)
                .map(|s| s.trim())
                .ok_or_else(|| format!("missing {} field", name))
        };

        let raw_id = field(self.id, "id")?;
        let id: i64 = raw_id
            .parse()
            .map_err(|_| format!("invalid id: {:?}", raw_id))?;

        let raw_ts = field(self.date, "event date")?;
        let ts = parse_timestamp(raw_ts).ok_or_else(|| format!("invalid timestamp: {:?}", raw_ts))?;

        let user_id = field(self.user, "user id")?;
        if user_id.is_empty() {
            return Err("empty user id".to_string());
        }
        let thread_id = field(self.thread, "thread id")?;
        if thread_id.is_empty() {
            return Err("empty thread id".to_string());
        }

        let raw_message = field(self.message, "message")?;
        let envelope: MessageEnvelope = serde_json::from_str(raw_message)
            .map_err(|e| format!("invalid message envelope: {}", e))?;

        let role = AuthorRole::from_envelope(envelope.role.as_deref());
        let content = envelope.content.unwrap_or_default();

        Ok(Event::new(
            id,
            ts,
            user_id.to_string(),
            thread_id.to_string(),
            role,
            content,
        ))
    }
}

/// Parse the export's `YYYY-MM-DD HH:MM:SS` timestamps, with an RFC 3339
/// fallback for newer exports.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
