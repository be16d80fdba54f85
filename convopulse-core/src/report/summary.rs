//! Flat CSV summary of the headline metrics

use crate::csv::escape_field;
use crate::types::EngagementMetrics;

/// Render the `Metric,Value` summary table.
///
/// Percentages are written as 0..100 values with one decimal place, matching
/// how the dashboard displays them.
pub fn render(metrics: &EngagementMetrics) -> String {
    let mut rows: Vec<(String, String)> = vec![
        ("Total Users".to_string(), metrics.total_users.to_string()),
        ("Total Interactions".to_string(), metrics.total_events.to_string()),
        (
            "Average DAU".to_string(),
            format!("{:.1}", metrics.avg_daily_active_users),
        ),
        (
            "Average MAU".to_string(),
            format!("{:.1}", metrics.avg_monthly_active_users),
        ),
        (
            "Avg Session Duration (min)".to_string(),
            format!("{:.1}", metrics.avg_session_duration),
        ),
        (
            "Avg Sessions per User".to_string(),
            format!("{:.1}", metrics.avg_sessions_per_user),
        ),
        (
            "Avg Queries per Session".to_string(),
            format!("{:.1}", metrics.avg_queries_per_session),
        ),
    ];

    for (label, rate) in &metrics.retention_rates {
        rows.push((
            format!("{} Retention (%)", label.replace('_', "-")),
            format!("{:.1}", rate * 100.0),
        ));
    }
    rows.push((
        "Churn Rate (%)".to_string(),
        format!("{:.1}", metrics.churn_rate * 100.0),
    ));

    let mut out = String::from("Metric,Value\n");
    for (metric, value) in rows {
        out.push_str(&escape_field(&metric));
        out.push(',');
        out.push_str(&escape_field(&value));
        out.push('\n');
    }
    out
}
