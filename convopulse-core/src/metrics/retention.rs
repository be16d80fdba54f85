//! Retention curves and churn
//!
//! Both statistics are anchored to observed dates only: retention to each
//! user's first active date, churn to the latest date in the dataset. Neither
//! consults the wall clock, so a fixed input always produces the same result.

use crate::types::Event;
use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

fn active_dates(events: &[Event]) -> HashMap<&str, BTreeSet<NaiveDate>> {
    let mut dates: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
    for event in events {
        dates.entry(event.user_id.as_str()).or_default().insert(event.date);
    }
    dates
}

/// Fraction of users active on any day at or after `first_date + period`,
/// for each configured period. Keys are `"{period}_day"`, in configured
/// order.
pub fn retention_rates(events: &[Event], periods: &[u32]) -> IndexMap<String, f64> {
    let dates = active_dates(events);
    let total = dates.len();

    periods
        .iter()
        .map(|&period| {
            let label = format!("{}_day", period);
            if total == 0 {
                return (label, 0.0);
            }
            let retained = dates
                .values()
                .filter(|user_dates| {
                    // BTreeSet is non-empty by construction.
                    let first = match user_dates.iter().next() {
                        Some(first) => *first,
                        None => return false,
                    };
                    match first.checked_add_days(Days::new(period as u64)) {
                        Some(target) => user_dates.range(target..).next().is_some(),
                        None => false,
                    }
                })
                .count();
            (label, retained as f64 / total as f64)
        })
        .collect()
}

/// Fraction of users whose last active date is strictly before
/// `latest_date - threshold_days`.
///
/// A user last seen exactly at the cutoff is not churned.
pub fn churn_rate(events: &[Event], threshold_days: u32) -> f64 {
    let dates = active_dates(events);
    if dates.is_empty() {
        return 0.0;
    }

    let latest = match events.iter().map(|e| e.date).max() {
        Some(latest) => latest,
        None => return 0.0,
    };
    let cutoff = match latest.checked_sub_days(Days::new(threshold_days as u64)) {
        Some(cutoff) => cutoff,
        // Threshold reaches past the representable calendar: nobody churns.
        None => return 0.0,
    };

    let churned = dates
        .values()
        .filter(|user_dates| match user_dates.iter().next_back() {
            Some(last) => *last < cutoff,
            None => false,
        })
        .count();

    churned as f64 / dates.len() as f64
}
