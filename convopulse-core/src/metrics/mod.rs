//! Engagement metrics engine
//!
//! Transforms a collection of normalized [`Event`]s into a single
//! [`EngagementMetrics`] result:
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────────────────┐     ┌────────────────────┐
//! │  Normalized  │ ──► │         MetricsEngine          │ ──► │ EngagementMetrics  │
//! │   events     │     │  ├─ activity   (DAU/MAU)       │     │ (one immutable     │
//! └──────────────┘     │  ├─ sessions   (duration, freq)│     │  result per run)   │
//!                      │  ├─ features   (classification)│     └────────────────────┘
//!                      │  └─ retention  (curves, churn) │
//!                      └────────────────────────────────┘
//! ```
//!
//! Each aggregation is a pure function of the event slice; none mutates
//! shared state or depends on another's output. The engine tolerates events
//! in any temporal order and produces a fully-defined zero-valued result for
//! empty input.
//!
//! The engine carries no default configuration: feature rules, retention
//! periods, and the churn threshold are injected at construction (see
//! [`crate::config`] for the loader that owns the defaults).

pub mod activity;
pub mod features;
pub mod retention;
pub mod sessions;

use crate::types::{EngagementMetrics, Event};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================
// Engine configuration
// ============================================

/// One feature-classification rule: a name plus its keyword set.
///
/// Rules are matched in declaration order; the first rule whose keyword set
/// matches an event's content wins. The order of a `Vec<FeatureRule>` is
/// therefore part of the engine's contract, which is why the configuration
/// uses an explicit sequence rather than a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRule {
    /// Feature name reported in `feature_usage`
    pub name: String,
    /// Case-insensitive substring keywords
    pub keywords: Vec<String>,
}

/// Configuration injected into the engine at construction.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Ordered feature-classification rules
    pub features: Vec<FeatureRule>,
    /// Retention periods to compute, in days
    pub retention_periods: Vec<u32>,
    /// Days of inactivity (relative to the dataset's latest date) before a
    /// user counts as churned
    pub churn_threshold_days: u32,
}

// ============================================
// Engine
// ============================================

/// Computes the full engagement-metrics result for an event collection.
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Run every aggregation over the event collection.
    ///
    /// Pure and single-threaded; the caller bounds total work by bounding
    /// input size.
    pub fn compute(&self, events: &[Event]) -> EngagementMetrics {
        let total_users = distinct_users(events);
        let total_events = events.len() as u64;

        let activity = activity::active_users(events);
        let session_durations = sessions::session_durations(events);
        let avg_session_duration = mean_f64(&session_durations);
        let avg_sessions_per_user = sessions::avg_sessions_per_user(events);
        let avg_queries_per_session = sessions::avg_queries_per_session(events);
        let feature_usage = features::feature_usage(events, &self.config.features);
        let retention_rates =
            retention::retention_rates(events, &self.config.retention_periods);
        let churn_rate = retention::churn_rate(events, self.config.churn_threshold_days);

        tracing::debug!(
            events = events.len(),
            users = total_users,
            days = activity.daily.len(),
            "Computed engagement metrics"
        );

        EngagementMetrics {
            daily_active_users: activity.daily,
            monthly_active_users: activity.monthly,
            avg_daily_active_users: activity.avg_daily,
            avg_monthly_active_users: activity.avg_monthly,
            session_durations,
            avg_session_duration,
            avg_sessions_per_user,
            avg_queries_per_session,
            feature_usage,
            retention_rates,
            churn_rate,
            total_users,
            total_events,
        }
    }
}

fn distinct_users(events: &[Event]) -> u64 {
    events
        .iter()
        .map(|e| e.user_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}

// ============================================
// Shared mean guards
// ============================================

// Every averaging operation in the engine goes through one of these so the
// empty-denominator case is 0, never NaN.

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub(crate) fn mean_counts<I>(values: I) -> f64
where
    I: IntoIterator<Item = u64>,
{
    let mut sum = 0u64;
    let mut n = 0u64;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::AuthorRole;
    use chrono::{DateTime, Utc};

    pub(crate) fn event(
        id: i64,
        ts: &str,
        user: &str,
        thread: &str,
        role: AuthorRole,
        content: &str,
    ) -> Event {
        Event::new(
            id,
            ts.parse::<DateTime<Utc>>().expect("valid timestamp"),
            user.to_string(),
            thread.to_string(),
            role,
            content.to_string(),
        )
    }

    fn test_config() -> MetricsConfig {
        MetricsConfig {
            features: vec![
                FeatureRule {
                    name: "search".to_string(),
                    keywords: vec!["search".to_string(), "find".to_string()],
                },
                FeatureRule {
                    name: "help".to_string(),
                    keywords: vec!["help".to_string()],
                },
            ],
            retention_periods: vec![1, 7, 30],
            churn_threshold_days: 30,
        }
    }

    #[test]
    fn test_empty_input_yields_zeroed_result() {
        let engine = MetricsEngine::new(test_config());
        let metrics = engine.compute(&[]);

        assert!(metrics.daily_active_users.is_empty());
        assert!(metrics.monthly_active_users.is_empty());
        assert_eq!(metrics.avg_daily_active_users, 0.0);
        assert_eq!(metrics.avg_monthly_active_users, 0.0);
        assert!(metrics.session_durations.is_empty());
        assert_eq!(metrics.avg_session_duration, 0.0);
        assert_eq!(metrics.avg_sessions_per_user, 0.0);
        assert_eq!(metrics.avg_queries_per_session, 0.0);
        assert_eq!(metrics.churn_rate, 0.0);
        assert_eq!(metrics.total_users, 0);
        assert_eq!(metrics.total_events, 0);

        // Configured features and periods still appear, zero-valued.
        assert_eq!(metrics.feature_usage.get("search"), Some(&0));
        assert_eq!(metrics.feature_usage.get("help"), Some(&0));
        assert_eq!(metrics.retention_rates.get("7_day"), Some(&0.0));
    }

    #[test]
    fn test_result_is_order_independent() {
        let engine = MetricsEngine::new(test_config());
        let mut events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "help me"),
            event(2, "2025-01-01T10:05:00Z", "a", "t1", AuthorRole::Assistant, "sure"),
            event(3, "2025-01-08T09:00:00Z", "a", "t2", AuthorRole::Human, "find files"),
            event(4, "2025-01-02T12:00:00Z", "b", "t3", AuthorRole::Human, "search docs"),
        ];

        let forward = engine.compute(&events);
        events.reverse();
        let reversed = engine.compute(&events);

        assert_eq!(forward.daily_active_users, reversed.daily_active_users);
        assert_eq!(forward.avg_session_duration, reversed.avg_session_duration);
        assert_eq!(forward.feature_usage, reversed.feature_usage);
        assert_eq!(forward.retention_rates, reversed.retention_rates);
        assert_eq!(forward.churn_rate, reversed.churn_rate);
    }

    #[test]
    fn test_dau_consistency_property() {
        let engine = MetricsEngine::new(test_config());
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "hi"),
            event(2, "2025-01-01T11:00:00Z", "b", "t2", AuthorRole::Human, "hi"),
            event(3, "2025-01-02T10:00:00Z", "a", "t3", AuthorRole::Human, "hi"),
        ];
        let metrics = engine.compute(&events);

        let sum: u64 = metrics.daily_active_users.values().sum();
        let max = metrics.daily_active_users.values().copied().max().unwrap();
        assert!(sum >= max);
        for &count in metrics.daily_active_users.values() {
            assert!(count <= metrics.total_users);
        }
    }

    #[test]
    fn test_mean_guards() {
        assert_eq!(mean_f64(&[]), 0.0);
        assert_eq!(mean_f64(&[2.0, 4.0]), 3.0);
        assert_eq!(mean_counts(std::iter::empty()), 0.0);
        assert_eq!(mean_counts([1u64, 2, 3]), 2.0);
    }
}
