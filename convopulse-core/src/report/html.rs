//! Self-contained HTML dashboard
//!
//! Single file, inline CSS, no external assets: the report stays readable
//! when mailed around or opened from a file share.

use super::{key_insights, Health};
use crate::types::EngagementMetrics;
use chrono::Utc;

const STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: #f5f7fa; color: #2c3e50; }
    .container { max-width: 1200px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
              color: white; padding: 40px; border-radius: 12px; margin-bottom: 30px;
              box-shadow: 0 8px 32px rgba(0,0,0,0.1); }
    .header h1 { font-size: 2.5em; margin-bottom: 10px; }
    .header p { opacity: 0.9; font-size: 1.1em; }
    .metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
                    gap: 25px; margin-bottom: 40px; }
    .metric-card { background: white; border-radius: 12px; padding: 25px;
                   box-shadow: 0 4px 20px rgba(0,0,0,0.08); border: 1px solid #e3e8ee; }
    .card-title { font-size: 1.2em; font-weight: 600; color: #2c3e50; margin-bottom: 20px; }
    .metric-value { font-size: 2.2em; font-weight: bold; color: #3498db; margin: 10px 0; }
    .metric-label { color: #7f8c8d; font-size: 0.9em; margin-bottom: 8px; }
    .metric-item { display: flex; justify-content: space-between; padding: 8px 0;
                   border-bottom: 1px solid #ecf0f1; }
    .metric-item:last-child { border-bottom: none; }
    .section { background: white; border-radius: 12px; padding: 25px;
               box-shadow: 0 4px 20px rgba(0,0,0,0.08); margin-bottom: 30px; }
    .feature-tags { display: flex; flex-wrap: wrap; gap: 12px; margin-top: 15px; }
    .feature-tag { background: #e8f4f8; color: #2c3e50; padding: 8px 16px;
                   border-radius: 20px; font-weight: 500; border: 1px solid #bee5eb; }
    table { width: 100%; border-collapse: collapse; margin-top: 15px; }
    th { background: #f8f9fa; padding: 15px; text-align: left; font-weight: 600;
         border-bottom: 2px solid #dee2e6; }
    td { padding: 12px 15px; border-bottom: 1px solid #f1f3f4; }
    tr:hover { background: #f8f9fa; }
    .footer { text-align: center; margin-top: 40px; padding: 20px;
              background: white; border-radius: 12px; box-shadow: 0 4px 20px rgba(0,0,0,0.08); }
    .footer p { color: #7f8c8d; }
    .success { color: #27ae60; }
    .warning { color: #f39c12; }
    .danger { color: #e74c3c; }
"#;

/// Render the full dashboard document.
pub fn render(metrics: &EngagementMetrics) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <title>User Engagement Dashboard</title>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

    html.push_str(&format!(
        "<div class=\"header\">\n  <h1>User Engagement Dashboard</h1>\n  <p>Generated on {}</p>\n</div>\n",
        Utc::now().format("%B %d, %Y at %H:%M UTC")
    ));

    render_metric_cards(&mut html, metrics);
    render_insights(&mut html, metrics);
    render_feature_tags(&mut html, metrics);
    render_daily_table(&mut html, metrics);

    html.push_str(
        "<div class=\"footer\">\n  <p><strong>convopulse</strong> &bull; user engagement analytics</p>\n</div>\n",
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_metric_cards(html: &mut String, metrics: &EngagementMetrics) {
    html.push_str("<div class=\"metrics-grid\">\n");

    // User activity
    html.push_str("<div class=\"metric-card\">\n  <div class=\"card-title\">User Activity</div>\n");
    metric_item(html, "Daily Active Users", &format!("{:.1}", metrics.avg_daily_active_users), None);
    metric_item(html, "Monthly Active Users", &format!("{:.1}", metrics.avg_monthly_active_users), None);
    metric_item(html, "Total Users", &metrics.total_users.to_string(), None);
    html.push_str("</div>\n");

    // Session metrics
    html.push_str("<div class=\"metric-card\">\n  <div class=\"card-title\">Session Metrics</div>\n");
    metric_item(
        html,
        "Avg Duration",
        &format!("{:.1}<small style=\"font-size:0.5em\"> min</small>", metrics.avg_session_duration),
        None,
    );
    metric_item(html, "Sessions per User", &format!("{:.1}", metrics.avg_sessions_per_user), None);
    metric_item(html, "Queries per Session", &format!("{:.1}", metrics.avg_queries_per_session), None);
    html.push_str("</div>\n");

    // Retention and health
    html.push_str("<div class=\"metric-card\">\n  <div class=\"card-title\">Retention &amp; Health</div>\n");
    for (label, rate) in &metrics.retention_rates {
        let class = rate_class(*rate);
        metric_item(
            html,
            &format!("{} Retention", label.replace('_', "-")),
            &format!("{:.0}%", rate * 100.0),
            Some(class),
        );
    }
    metric_item(
        html,
        "Churn Rate",
        &format!("{:.0}%", metrics.churn_rate * 100.0),
        Some(churn_class(metrics.churn_rate)),
    );
    html.push_str("</div>\n");

    html.push_str("</div>\n");
}

fn render_insights(html: &mut String, metrics: &EngagementMetrics) {
    html.push_str("<div class=\"section\">\n  <div class=\"card-title\">Key Insights</div>\n");
    for insight in key_insights(metrics) {
        let class = match insight.health {
            Health::Good => "success",
            Health::Moderate => "warning",
            Health::Poor => "danger",
        };
        html.push_str(&format!(
            "  <p class=\"{}\">{}</p>\n",
            class,
            escape_html(insight.text)
        ));
    }
    html.push_str("</div>\n");
}

fn render_feature_tags(html: &mut String, metrics: &EngagementMetrics) {
    html.push_str(
        "<div class=\"section\">\n  <div class=\"card-title\">Feature Usage</div>\n  <div class=\"feature-tags\">\n",
    );

    // Most used first; configuration order breaks ties.
    let mut features: Vec<(&String, &u64)> = metrics.feature_usage.iter().collect();
    features.sort_by(|a, b| b.1.cmp(a.1));
    for (name, count) in features {
        html.push_str(&format!(
            "    <div class=\"feature-tag\"><strong>{}</strong> &bull; {} uses</div>\n",
            escape_html(name),
            count
        ));
    }

    html.push_str("  </div>\n</div>\n");
}

fn render_daily_table(html: &mut String, metrics: &EngagementMetrics) {
    html.push_str("<div class=\"section\">\n  <div class=\"card-title\">Daily User Activity</div>\n");
    html.push_str("  <table>\n    <thead>\n      <tr><th>Date</th><th>Active Users</th><th>Activity Level</th></tr>\n    </thead>\n    <tbody>\n");

    let max_users = metrics.daily_active_users.values().copied().max().unwrap_or(1).max(1);
    for (date, users) in &metrics.daily_active_users {
        let percentage = (*users as f64 / max_users as f64) * 100.0;
        let (level, class) = if percentage > 80.0 {
            ("High", "success")
        } else if percentage > 40.0 {
            ("Medium", "warning")
        } else {
            ("Low", "danger")
        };
        html.push_str(&format!(
            "      <tr><td><strong>{}</strong></td><td>{}</td><td><span class=\"{}\">{}</span></td></tr>\n",
            date, users, class, level
        ));
    }

    html.push_str("    </tbody>\n  </table>\n</div>\n");
}

fn metric_item(html: &mut String, label: &str, value_html: &str, class: Option<&str>) {
    let class_attr = match class {
        Some(c) => format!(" {}", c),
        None => String::new(),
    };
    html.push_str(&format!(
        "  <div class=\"metric-item\"><span class=\"metric-label\">{}</span><span class=\"metric-value{}\">{}</span></div>\n",
        escape_html(label),
        class_attr,
        value_html
    ));
}

fn rate_class(rate: f64) -> &'static str {
    if rate > 0.3 {
        "success"
    } else if rate > 0.15 {
        "warning"
    } else {
        "danger"
    }
}

fn churn_class(rate: f64) -> &'static str {
    if rate < 0.2 {
        "success"
    } else if rate < 0.4 {
        "warning"
    } else {
        "danger"
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::event;
    use crate::metrics::{FeatureRule, MetricsConfig, MetricsEngine};
    use crate::types::AuthorRole;

    fn rendered() -> String {
        let engine = MetricsEngine::new(MetricsConfig {
            features: vec![FeatureRule {
                name: "search".to_string(),
                keywords: vec!["find".to_string()],
            }],
            retention_periods: vec![1, 7],
            churn_threshold_days: 30,
        });
        let events = vec![
            event(1, "2025-01-01T10:00:00Z", "a", "t1", AuthorRole::Human, "find docs"),
            event(2, "2025-01-01T10:05:00Z", "a", "t1", AuthorRole::Assistant, "here"),
            event(3, "2025-01-02T10:00:00Z", "b", "t2", AuthorRole::Human, "hello"),
        ];
        render(&engine.compute(&events))
    }

    #[test]
    fn test_render_is_complete_document() {
        let html = rendered();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("User Engagement Dashboard"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn test_render_includes_metrics_and_features() {
        let html = rendered();
        assert!(html.contains("Daily Active Users"));
        assert!(html.contains("1-day Retention"));
        assert!(html.contains("<strong>search</strong>"));
        assert!(html.contains("2025-01-01"));
        assert!(html.contains("2025-01-02"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
