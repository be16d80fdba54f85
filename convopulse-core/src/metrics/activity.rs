//! Daily and monthly active-user counts

use crate::types::{Event, MonthKey};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Active-user counts per calendar bucket, plus their means.
pub struct ActiveUsers {
    pub daily: BTreeMap<NaiveDate, u64>,
    pub monthly: BTreeMap<MonthKey, u64>,
    pub avg_daily: f64,
    pub avg_monthly: f64,
}

/// Count distinct users per calendar date and per month.
///
/// A user appearing multiple times in one bucket counts once; only dates and
/// months with at least one event appear in the mappings, so the averages are
/// over observed buckets, not calendar spans.
pub fn active_users(events: &[Event]) -> ActiveUsers {
    let mut daily_sets: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
    let mut monthly_sets: BTreeMap<MonthKey, HashSet<&str>> = BTreeMap::new();

    for event in events {
        daily_sets
            .entry(event.date)
            .or_default()
            .insert(event.user_id.as_str());
        monthly_sets
            .entry(event.month)
            .or_default()
            .insert(event.user_id.as_str());
    }

    let daily: BTreeMap<NaiveDate, u64> = daily_sets
        .into_iter()
        .map(|(date, users)| (date, users.len() as u64))
        .collect();
    let monthly: BTreeMap<MonthKey, u64> = monthly_sets
        .into_iter()
        .map(|(month, users)| (month, users.len() as u64))
        .collect();

    let avg_daily = super::mean_counts(daily.values().copied());
    let avg_monthly = super::mean_counts(monthly.values().copied());

    ActiveUsers {
        daily,
        monthly,
        avg_daily,
        avg_monthly,
    }
}
