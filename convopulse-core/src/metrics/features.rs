//! Keyword-based feature classification
//!
//! Attributes each human message to at most one configured feature. Rules
//! are evaluated in declaration order and the first rule with a matching
//! keyword wins, so a message containing keywords of several features is
//! counted once, under the earliest rule.

use super::FeatureRule;
use crate::types::Event;
use indexmap::IndexMap;

/// Count human messages per feature, first matching rule wins.
///
/// Matching is case-insensitive substring search over the message content.
/// Every configured feature appears in the result even with a zero count;
/// the mapping preserves rule declaration order.
pub fn feature_usage(events: &[Event], rules: &[FeatureRule]) -> IndexMap<String, u64> {
    let mut counts = vec![0u64; rules.len()];

    for event in events {
        if !event.is_query() || event.content.is_empty() {
            continue;
        }
        let content = event.content.to_lowercase();
        let matched = rules.iter().position(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| content.contains(&keyword.to_lowercase()))
        });
        if let Some(index) = matched {
            counts[index] += 1;
        }
    }

    rules
        .iter()
        .zip(counts)
        .map(|(rule, count)| (rule.name.clone(), count))
        .collect()
}
