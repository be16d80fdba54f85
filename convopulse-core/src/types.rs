//! Core domain types for convopulse
//!
//! These types represent the normalized data model shared by the normalizer,
//! the metrics engine, and the report writers.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Event** | One normalized, timestamped chat message |
//! | **Thread** | A conversation grouping of events; treated as a session |
//! | **DAU/MAU** | Distinct-user counts per calendar day / month |
//! | **Retention period** | Day offset used to test whether a user returned after first activity |
//! | **Churn threshold** | Day offset from the latest observed date beyond which a user counts as churned |
//!
//! Events are produced once by the normalizer and never mutated afterwards.
//! The calendar projections (`date`, `hour`, `month`) are derived from the
//! timestamp at construction so the engine never re-parses time values.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

// ============================================
// Author roles
// ============================================

/// Role of the message author, derived from the raw message envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRole {
    /// Real person sending queries
    Human,
    /// The conversational product replying
    Assistant,
    /// Envelope carried no recognizable role
    Unknown,
}

impl AuthorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorRole::Human => "human",
            AuthorRole::Assistant => "assistant",
            AuthorRole::Unknown => "unknown",
        }
    }

    /// Map a raw envelope role to an [`AuthorRole`].
    ///
    /// Source logs label assistant turns either "ai" or "assistant" depending
    /// on the exporter version; anything unrecognized becomes `Unknown` so
    /// the row is kept rather than dropped.
    pub fn from_envelope(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("human") => AuthorRole::Human,
            Some("ai") | Some("assistant") => AuthorRole::Assistant,
            _ => AuthorRole::Unknown,
        }
    }
}

impl std::fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuthorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(AuthorRole::Human),
            "ai" | "assistant" => Ok(AuthorRole::Assistant),
            "unknown" => Ok(AuthorRole::Unknown),
            _ => Err(format!("unknown author role: {}", s)),
        }
    }
}

// ============================================
// Month bucket
// ============================================

/// A year-month bucket used for monthly grouping.
///
/// Ordered chronologically; serializes as `YYYY-MM` so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================
// Events
// ============================================

/// One normalized chat-interaction event (the core unit of activity).
///
/// Every event carries a valid timestamp by construction: rows whose
/// timestamp fails to parse never leave the normalizer, so the engine has no
/// "invalid time" branch anywhere.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Opaque identifier, unique per event
    pub id: i64,
    /// Absolute point in time of the event
    pub ts: DateTime<Utc>,
    /// User who participated in the interaction
    pub user_id: String,
    /// Conversation thread this event belongs to
    pub thread_id: String,
    /// Who authored the message
    pub role: AuthorRole,
    /// Free-text content; may be empty
    pub content: String,
    /// Date-only projection of `ts`, for daily grouping
    pub date: NaiveDate,
    /// Hour-of-day projection of `ts`
    pub hour: u32,
    /// Year-month projection of `ts`, for monthly grouping
    pub month: MonthKey,
}

impl Event {
    /// Build an event, deriving the calendar projections from the timestamp.
    pub fn new(
        id: i64,
        ts: DateTime<Utc>,
        user_id: String,
        thread_id: String,
        role: AuthorRole,
        content: String,
    ) -> Self {
        let date = ts.date_naive();
        Self {
            id,
            user_id,
            thread_id,
            role,
            content,
            date,
            hour: ts.hour(),
            month: MonthKey::from_date(date),
            ts,
        }
    }

    /// Whether this event is a human-authored query.
    pub fn is_query(&self) -> bool {
        self.role == AuthorRole::Human
    }
}

// ============================================
// Metrics result
// ============================================

/// The full set of engagement statistics for one run.
///
/// Computed once per invocation and immutable afterwards. Every field is
/// defined even for empty input: mappings are empty and averages are 0, so
/// downstream rendering only ever needs "is this mapping empty" checks.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementMetrics {
    /// Distinct active users per calendar date
    pub daily_active_users: BTreeMap<NaiveDate, u64>,
    /// Distinct active users per month
    pub monthly_active_users: BTreeMap<MonthKey, u64>,
    /// Mean of the daily counts (0 if no days)
    pub avg_daily_active_users: f64,
    /// Mean of the monthly counts (0 if no months)
    pub avg_monthly_active_users: f64,
    /// Per-thread durations in minutes, one entry per thread with >= 2 events
    pub session_durations: Vec<f64>,
    /// Mean of `session_durations` (0 if empty)
    pub avg_session_duration: f64,
    /// Mean distinct threads per user
    pub avg_sessions_per_user: f64,
    /// Mean human messages per thread, over threads with at least one human message
    pub avg_queries_per_session: f64,
    /// Human-message counts per configured feature, in declaration order
    pub feature_usage: IndexMap<String, u64>,
    /// Fraction of users retained per configured period, keyed `"{P}_day"`
    pub retention_rates: IndexMap<String, f64>,
    /// Fraction of users whose last activity predates the churn cutoff
    pub churn_rate: f64,
    /// Distinct users observed in the input
    pub total_users: u64,
    /// Total events observed in the input
    pub total_events: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_role_from_envelope() {
        assert_eq!(AuthorRole::from_envelope(Some("human")), AuthorRole::Human);
        assert_eq!(AuthorRole::from_envelope(Some("ai")), AuthorRole::Assistant);
        assert_eq!(
            AuthorRole::from_envelope(Some("assistant")),
            AuthorRole::Assistant
        );
        assert_eq!(AuthorRole::from_envelope(Some("bot")), AuthorRole::Unknown);
        assert_eq!(AuthorRole::from_envelope(None), AuthorRole::Unknown);
    }

    #[test]
    fn test_month_key_ordering_and_display() {
        let jan = MonthKey { year: 2025, month: 1 };
        let dec_prev = MonthKey { year: 2024, month: 12 };
        assert!(dec_prev < jan);
        assert_eq!(jan.to_string(), "2025-01");
    }

    #[test]
    fn test_event_projections() {
        let ts = "2025-03-07T14:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let event = Event::new(
            1,
            ts,
            "user_0001".to_string(),
            "thread_1".to_string(),
            AuthorRole::Human,
            "Find my documents".to_string(),
        );

        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        assert_eq!(event.hour, 14);
        assert_eq!(event.month, MonthKey { year: 2025, month: 3 });
        assert!(event.is_query());
    }
}
