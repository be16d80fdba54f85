//! Synthetic interaction-log generation
//!
//! Produces raw log CSV in the same schema the normalizer reads, so a
//! generated file exercises the full pipeline. User behavior is modeled with
//! archetypes (activity level, query volume, stickiness) whose day-to-day
//! activity decays from the join date, with reduced weekend traffic and a
//! business-hours time skew.
//!
//! Generation is deterministic for a given seed.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

use crate::csv::escape_field;

// ============================================
// Scenarios
// ============================================

/// Overall shape of the generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Standard,
    HighEngagement,
    LowRetention,
    RapidGrowth,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Standard => "standard",
            Scenario::HighEngagement => "high_engagement",
            Scenario::LowRetention => "low_retention",
            Scenario::RapidGrowth => "rapid_growth",
        }
    }

    fn params(&self) -> ScenarioParams {
        match self {
            Scenario::Standard => ScenarioParams {
                activity_boost: 1.0,
                decay_rate: 0.995,
                max_sessions: 2,
                business_hours_weight: 0.7,
            },
            Scenario::HighEngagement => ScenarioParams {
                activity_boost: 1.5,
                decay_rate: 0.998,
                max_sessions: 4,
                business_hours_weight: 0.6,
            },
            Scenario::LowRetention => ScenarioParams {
                activity_boost: 0.7,
                decay_rate: 0.990,
                max_sessions: 1,
                business_hours_weight: 0.8,
            },
            Scenario::RapidGrowth => ScenarioParams {
                activity_boost: 1.2,
                decay_rate: 0.997,
                max_sessions: 3,
                business_hours_weight: 0.5,
            },
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Scenario::Standard),
            "high_engagement" => Ok(Scenario::HighEngagement),
            "low_retention" => Ok(Scenario::LowRetention),
            "rapid_growth" => Ok(Scenario::RapidGrowth),
            _ => Err(format!(
                "unknown scenario: {} (expected standard, high_engagement, low_retention, rapid_growth)",
                s
            )),
        }
    }
}

struct ScenarioParams {
    activity_boost: f64,
    decay_rate: f64,
    max_sessions: u32,
    business_hours_weight: f64,
}

// ============================================
// User archetypes
// ============================================

struct Archetype {
    weight: f64,
    queries: (u32, u32),
    stickiness: f64,
}

const ARCHETYPES: [Archetype; 3] = [
    // new
    Archetype {
        weight: 0.3,
        queries: (1, 4),
        stickiness: 0.6,
    },
    // casual
    Archetype {
        weight: 0.4,
        queries: (1, 6),
        stickiness: 0.7,
    },
    // power
    Archetype {
        weight: 0.3,
        queries: (2, 12),
        stickiness: 0.85,
    },
];

const TEMPLATES: [(&str, [&str; 3]); 8] = [
    ("help", ["How do I get started?", "I need help", "Can you guide me?"]),
    ("search", ["Find my documents", "Search for reports", "Locate data"]),
    ("analysis", ["Analyze trends", "Generate insights", "Show patterns"]),
    ("export", ["Export to PDF", "Download report", "Save as Excel"]),
    ("chat", ["Hello there!", "Good morning", "Quick question"]),
    ("api", ["API documentation", "How to integrate?", "Rate limits"]),
    ("reporting", ["Monthly dashboard", "Generate report", "KPI summary"]),
    ("automation", ["Automate workflow", "Schedule reports", "Set alerts"]),
];

struct SimUser {
    id: String,
    archetype: usize,
    join_date: NaiveDate,
    activity: f64,
}

// ============================================
// Simulator
// ============================================

/// Generates synthetic interaction logs.
pub struct Simulator {
    rng: StdRng,
    scenario: Scenario,
}

impl Simulator {
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            scenario,
        }
    }

    /// Generate a log covering `days` days ending at `end_date`, as CSV text
    /// in the raw export schema.
    pub fn generate(&mut self, users: u32, days: u32, end_date: NaiveDate) -> String {
        let params = self.scenario.params();
        let start_date = end_date
            .checked_sub_days(Days::new(days as u64))
            .unwrap_or(end_date);

        let user_list = self.create_users(users, start_date, days, &params);

        let mut out = String::from("ID,Event Date,User ID,Thread ID,Message\n");
        let mut msg_id: i64 = 1;
        let mut rows = 0usize;

        let mut current = start_date;
        while current <= end_date {
            for user_index in 0..user_list.len() {
                let user = &user_list[user_index];
                if current < user.join_date {
                    continue;
                }

                let days_since_join = (current - user.join_date).num_days() as i32;
                let base = ARCHETYPES[user.archetype].stickiness;
                let decay = params.decay_rate.powi(days_since_join);
                let weekend_factor = if is_weekend(current) { 0.3 } else { 1.0 };
                let activity_prob = base * decay * user.activity * weekend_factor;

                if self.rng.gen::<f64>() >= activity_prob {
                    continue;
                }

                let sessions = self.rng.gen_range(0..=params.max_sessions);
                for session in 0..sessions {
                    let thread_id = format!("thread_{}_{}", msg_id, session);
                    let mut session_time = current.and_time(self.session_time(&params));
                    let queries = {
                        let (lo, hi) = ARCHETYPES[user_list[user_index].archetype].queries;
                        self.rng.gen_range(lo..=hi)
                    };

                    for _ in 0..queries {
                        let (feature, prompts) = TEMPLATES[self.rng.gen_range(0..TEMPLATES.len())];
                        let prompt = prompts
                            .choose(&mut self.rng)
                            .copied()
                            .unwrap_or(prompts[0]);

                        push_row(
                            &mut out,
                            msg_id,
                            session_time.format("%Y-%m-%d %H:%M:%S"),
                            &user_list[user_index].id,
                            &thread_id,
                            "human",
                            prompt,
                        );
                        msg_id += 1;
                        rows += 1;
                        session_time += Duration::seconds(self.rng.gen_range(5..=60));

                        let reply = format!(
                            "I can help you with {}. Here's the information you need.",
                            feature
                        );
                        push_row(
                            &mut out,
                            msg_id,
                            session_time.format("%Y-%m-%d %H:%M:%S"),
                            &user_list[user_index].id,
                            &thread_id,
                            "ai",
                            &reply,
                        );
                        msg_id += 1;
                        rows += 1;
                        session_time += Duration::seconds(self.rng.gen_range(30..=180));
                    }
                }
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        tracing::info!(
            scenario = %self.scenario,
            users,
            days,
            rows,
            "Generated synthetic interaction log"
        );

        out
    }

    fn create_users(
        &mut self,
        users: u32,
        start_date: NaiveDate,
        days: u32,
        params: &ScenarioParams,
    ) -> Vec<SimUser> {
        (0..users)
            .map(|i| {
                let archetype = self.pick_archetype();
                // Exponential join-date spread: most users join early, a
                // long tail trickles in over the window.
                let mean = (days as f64 / 4.0).max(1.0);
                let offset = sample_exponential(&mut self.rng, mean).min(days as f64) as u64;
                let join_date = start_date
                    .checked_add_days(Days::new(offset))
                    .unwrap_or(start_date);

                SimUser {
                    id: format!("user_{:04}", i + 1),
                    archetype,
                    join_date,
                    activity: self.rng.gen_range(0.5..1.0) * params.activity_boost,
                }
            })
            .collect()
    }

    fn pick_archetype(&mut self) -> usize {
        let total: f64 = ARCHETYPES.iter().map(|a| a.weight).sum();
        let mut roll = self.rng.gen::<f64>() * total;
        for (index, archetype) in ARCHETYPES.iter().enumerate() {
            if roll < archetype.weight {
                return index;
            }
            roll -= archetype.weight;
        }
        ARCHETYPES.len() - 1
    }

    fn session_time(&mut self, params: &ScenarioParams) -> NaiveTime {
        let hour = if self.rng.gen::<f64>() < params.business_hours_weight {
            self.rng.gen_range(9..=17)
        } else {
            // Off hours: 0-8 or 18-23.
            let h = self.rng.gen_range(0..15);
            if h < 9 {
                h
            } else {
                h + 9
            }
        };
        let minute = self.rng.gen_range(0..60);
        let second = self.rng.gen_range(0..60);
        NaiveTime::from_hms_opt(hour, minute, second)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn sample_exponential(rng: &mut StdRng, mean: f64) -> f64 {
    let u: f64 = rng.gen_range(f64::EPSILON..1.0);
    -mean * u.ln()
}

fn push_row(
    out: &mut String,
    id: i64,
    ts: impl std::fmt::Display,
    user_id: &str,
    thread_id: &str,
    role: &str,
    content: &str,
) {
    let envelope = serde_json::json!({ "role": role, "content": content }).to_string();
    out.push_str(&format!(
        "{},{},{},{},{}\n",
        id,
        ts,
        user_id,
        thread_id,
        escape_field(&envelope)
    ));
}
