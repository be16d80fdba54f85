//! Report generation
//!
//! Renders one [`EngagementMetrics`] result into three artifacts in an
//! output directory:
//!
//! - `report.html` — self-contained dashboard for humans
//! - `summary.csv` — flat Metric,Value rows for spreadsheets
//! - `metrics.json` — the full result for downstream tooling
//!
//! Rendering is read-only over the metrics; writers never recompute.

mod html;
mod summary;

use crate::error::Result;
use crate::types::EngagementMetrics;
use std::path::{Path, PathBuf};

/// Paths of the artifacts produced by one [`ReportWriter::write_all`] run.
#[derive(Debug)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub summary: PathBuf,
    pub json: PathBuf,
}

/// Writes all report artifacts for a metrics result.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render every artifact, creating the output directory if needed.
    pub fn write_all(&self, metrics: &EngagementMetrics) -> Result<ReportPaths> {
        std::fs::create_dir_all(&self.output_dir)?;

        let paths = ReportPaths {
            html: self.output_dir.join("report.html"),
            summary: self.output_dir.join("summary.csv"),
            json: self.output_dir.join("metrics.json"),
        };

        std::fs::write(&paths.html, html::render(metrics))?;
        std::fs::write(&paths.summary, summary::render(metrics))?;
        std::fs::write(&paths.json, serde_json::to_string_pretty(metrics)?)?;

        tracing::info!(
            output_dir = %self.output_dir.display(),
            "Wrote report artifacts"
        );

        Ok(paths)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

// ============================================
// Insights
// ============================================

/// Health classification attached to an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Good,
    Moderate,
    Poor,
}

/// One narrative finding derived from the metrics.
#[derive(Debug, Clone)]
pub struct Insight {
    pub health: Health,
    pub text: &'static str,
}

/// Derive the headline findings shown in the dashboard and the CLI summary.
pub fn key_insights(metrics: &EngagementMetrics) -> Vec<Insight> {
    let mut insights = Vec::new();

    let stickiness = if metrics.avg_monthly_active_users > 0.0 {
        metrics.avg_daily_active_users / metrics.avg_monthly_active_users
    } else {
        0.0
    };
    insights.push(if stickiness > 0.3 {
        Insight {
            health: Health::Good,
            text: "Strong daily engagement - users are highly active",
        }
    } else if stickiness > 0.15 {
        Insight {
            health: Health::Moderate,
            text: "Moderate engagement - opportunity for improvement",
        }
    } else {
        Insight {
            health: Health::Poor,
            text: "Low daily engagement - focus on user activation",
        }
    });

    insights.push(if metrics.avg_session_duration > 10.0 {
        Insight {
            health: Health::Good,
            text: "Good session duration - users are engaged",
        }
    } else {
        Insight {
            health: Health::Poor,
            text: "Short sessions - consider improving user experience",
        }
    });

    insights.push(if metrics.churn_rate < 0.2 {
        Insight {
            health: Health::Good,
            text: "Low churn rate - good user retention",
        }
    } else if metrics.churn_rate < 0.4 {
        Insight {
            health: Health::Moderate,
            text: "Moderate churn - monitor user satisfaction",
        }
    } else {
        Insight {
            health: Health::Poor,
            text: "High churn rate - urgent attention needed",
        }
    });

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsConfig, MetricsEngine};
    use indexmap::IndexMap;
    use std::collections::BTreeMap;

    pub(crate) fn sample_metrics() -> EngagementMetrics {
        let engine = MetricsEngine::new(MetricsConfig {
            features: vec![],
            retention_periods: vec![1, 7, 30],
            churn_threshold_days: 30,
        });
        engine.compute(&[])
    }

    fn metrics_with(
        avg_dau: f64,
        avg_mau: f64,
        avg_session_duration: f64,
        churn_rate: f64,
    ) -> EngagementMetrics {
        EngagementMetrics {
            daily_active_users: BTreeMap::new(),
            monthly_active_users: BTreeMap::new(),
            avg_daily_active_users: avg_dau,
            avg_monthly_active_users: avg_mau,
            session_durations: vec![],
            avg_session_duration,
            avg_sessions_per_user: 0.0,
            avg_queries_per_session: 0.0,
            feature_usage: IndexMap::new(),
            retention_rates: IndexMap::new(),
            churn_rate,
            total_users: 0,
            total_events: 0,
        }
    }

    #[test]
    fn test_insights_healthy_product() {
        let insights = key_insights(&metrics_with(40.0, 100.0, 15.0, 0.1));
        assert!(insights.iter().all(|i| i.health == Health::Good));
    }

    #[test]
    fn test_insights_struggling_product() {
        let insights = key_insights(&metrics_with(5.0, 100.0, 3.0, 0.6));
        assert!(insights.iter().all(|i| i.health == Health::Poor));
    }

    #[test]
    fn test_insights_zero_mau_does_not_divide() {
        let insights = key_insights(&metrics_with(0.0, 0.0, 0.0, 0.0));
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].health, Health::Poor);
    }

    #[test]
    fn test_write_all_produces_three_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("reports"));
        let paths = writer.write_all(&sample_metrics()).unwrap();

        assert!(paths.html.exists());
        assert!(paths.summary.exists());
        assert!(paths.json.exists());

        let json = std::fs::read_to_string(&paths.json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_users"], 0);
        assert!(value["retention_rates"]["7_day"].is_number());
    }
}
