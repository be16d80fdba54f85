//! Session duration and frequency statistics
//!
//! A thread is treated as one session. Durations are wall-clock span from a
//! thread's earliest to latest event, in fractional minutes; single-event
//! threads have no measurable span and are excluded entirely.

use crate::types::Event;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Per-thread durations in minutes for threads with at least two events.
///
/// Two events at the same instant still form a measurable session of length
/// 0; only singleton threads are excluded.
pub fn session_durations(events: &[Event]) -> Vec<f64> {
    let mut spans: HashMap<&str, (DateTime<Utc>, DateTime<Utc>, usize)> = HashMap::new();

    for event in events {
        spans
            .entry(event.thread_id.as_str())
            .and_modify(|(min, max, count)| {
                if event.ts < *min {
                    *min = event.ts;
                }
                if event.ts > *max {
                    *max = event.ts;
                }
                *count += 1;
            })
            .or_insert((event.ts, event.ts, 1));
    }

    // Sort by thread id so the reported vector is stable across runs.
    let mut spans: Vec<(&str, (DateTime<Utc>, DateTime<Utc>, usize))> =
        spans.into_iter().collect();
    spans.sort_by_key(|(thread, _)| *thread);

    spans
        .into_iter()
        .filter(|(_, (_, _, count))| *count >= 2)
        .map(|(_, (min, max, _))| (max - min).num_milliseconds() as f64 / 60_000.0)
        .collect()
}

/// Mean number of distinct threads each user participated in.
pub fn avg_sessions_per_user(events: &[Event]) -> f64 {
    let mut threads_per_user: HashMap<&str, HashSet<&str>> = HashMap::new();
    for event in events {
        threads_per_user
            .entry(event.user_id.as_str())
            .or_default()
            .insert(event.thread_id.as_str());
    }
    super::mean_counts(threads_per_user.values().map(|t| t.len() as u64))
}

/// Mean human messages per thread, over threads with at least one human
/// message.
///
/// Threads containing only assistant or unknown-role events contribute
/// neither to the numerator nor the denominator, so assistant-only threads
/// cannot drag the average toward zero.
pub fn avg_queries_per_session(events: &[Event]) -> f64 {
    let mut queries_per_thread: HashMap<&str, u64> = HashMap::new();
    for event in events {
        if event.is_query() {
            *queries_per_thread.entry(event.thread_id.as_str()).or_insert(0) += 1;
        }
    }
    super::mean_counts(queries_per_thread.values().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::event;
    use crate::types::AuthorRole;

    #[test]
    fn test_duration_is_minutes_between_extremes() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T10:02:30Z", "a", "t1", AuthorRole::Assistant, "a"),
            event(3, "2025-01-01T10:07:00Z", "a", "t1", AuthorRole::Human, "q"),
        ];
        let durations = session_durations(&events);
        assert_eq!(durations, vec![7.0]);
    }

    #[test]
    fn test_single_event_thread_excluded() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T11:00:00Z", "a", "t2", AuthorRole::Human, "q"),
            event(3, "2025-01-01T11:30:00Z", "a", "t2", AuthorRole::Assistant, "a"),
        ];
        let durations = session_durations(&events);
        assert_eq!(durations, vec![30.0]);
    }

    #[test]
    fn test_simultaneous_pair_is_zero_length_session() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Assistant, "a"),
        ];
        assert_eq!(session_durations(&events), vec![0.0]);
    }

    #[test]
    fn test_sub_minute_span_is_fractional() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T10:00:30Z", "a", "t1", AuthorRole::Assistant, "a"),
        ];
        let durations = session_durations(&events);
        assert_eq!(durations, vec![0.5]);
    }

    #[test]
    fn test_sessions_per_user() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T11:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(3, "2025-01-02T10:00:00Z", "a", "t2", AuthorRole::Human, "q"),
            event(4, "2025-01-02T10:00:00Z", "a", "t3", AuthorRole::Human, "q"),
            event(5, "2025-01-02T12:00:00Z", "b", "t4", AuthorRole::Human, "q"),
        ];
        // a: 3 threads, b: 1 thread -> mean 2.0
        assert_eq!(avg_sessions_per_user(&events), 2.0);
    }

    #[test]
    fn test_queries_per_session_counts_human_only() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T10:01:00Z", "a", "t1", AuthorRole::Assistant, "a"),
            event(3, "2025-01-01T10:02:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(4, "2025-01-01T11:00:00Z", "b", "t2", AuthorRole::Human, "q"),
            event(5, "2025-01-01T11:01:00Z", "b", "t2", AuthorRole::Assistant, "a"),
        ];
        // t1: 2 queries, t2: 1 query -> mean 1.5
        assert_eq!(avg_queries_per_session(&events), 1.5);
    }

    #[test]
    fn test_assistant_only_thread_excluded_from_query_average() {
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "q"),
            event(2, "2025-01-01T10:01:00Z", "a", "t1", AuthorRole::Human, "q"),
            // System-initiated notification thread, no human turn.
            event(3, "2025-01-01T12:00:00Z", "b", "t2", AuthorRole::Assistant, "update"),
            event(4, "2025-01-01T12:01:00Z", "b", "t2", AuthorRole::Assistant, "update"),
        ];
        assert_eq!(avg_queries_per_session(&events), 2.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(session_durations(&[]).is_empty());
        assert_eq!(avg_sessions_per_user(&[]), 0.0);
        assert_eq!(avg_queries_per_session(&[]), 0.0);
    }
}
