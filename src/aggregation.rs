//! Statistics aggregation over canonical sessions
//!
//! A single pass over reconciled sessions produces the complete wrapped
//! report: message/session/project counts, token and cost accounting,
//! model and language rankings, the daily activity calendar, the weekday
//! histogram, and streak data.
//!
//! The aggregator owns no process-wide state; every run is a pure function
//! of its inputs plus the configured timezone, with "now" injectable for
//! tests.

use crate::period::Period;
use crate::pricing::CostCalculator;
use crate::timezone::TimezoneConfig;
use crate::types::{CanonicalSession, DailyDate, ISOTimestamp, MessageRole, ModelName, TokenUsage};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Number of entries kept in the model and language rankings
pub const TOP_K: usize = 5;

/// Weekday labels indexed by days-from-Sunday
const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// File extension to language label
///
/// Unknown extensions contribute nothing to the language ranking.
static EXTENSION_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ts", "TypeScript"),
        ("tsx", "TypeScript"),
        ("js", "JavaScript"),
        ("jsx", "JavaScript"),
        ("py", "Python"),
        ("rs", "Rust"),
        ("go", "Go"),
        ("rb", "Ruby"),
        ("java", "Java"),
        ("cpp", "C++"),
        ("cc", "C++"),
        ("hpp", "C++"),
        ("c", "C"),
        ("md", "Markdown"),
        ("html", "HTML"),
        ("css", "CSS"),
        ("sh", "Shell"),
        ("bash", "Shell"),
        ("zsh", "Shell"),
        ("json", "JSON"),
        ("yaml", "YAML"),
        ("yml", "YAML"),
        ("sql", "SQL"),
        ("swift", "Swift"),
        ("kt", "Kotlin"),
        ("php", "PHP"),
    ])
});

/// Language label for a file path, by extension
pub fn language_for_path(path: &str) -> Option<&'static str> {
    let ext = path.rsplit('.').next()?.to_lowercase();
    EXTENSION_MAP.get(ext.as_str()).copied()
}

/// One entry in the model ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStats {
    /// Model identifier as it appears in the logs
    pub name: ModelName,
    /// Assistant messages produced by this model
    pub count: u64,
    /// Share of all qualifying assistant messages, 0..=100
    pub percentage: f64,
}

/// One entry in the language ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Language label from the extension table
    pub name: String,
    /// Path-bearing tool calls mapped to this language
    pub count: u64,
    /// Share of all language-tagged actions, 0..=100
    pub percentage: f64,
}

/// The single busiest calendar day
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MostActiveDay {
    /// Calendar date in the configured timezone
    pub date: DailyDate,
    /// Messages on that date
    pub count: u64,
}

/// Seven-bucket weekday histogram, indexed by days-from-Sunday
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeekdayActivity {
    /// Message counts per weekday
    pub counts: [u64; 7],
    /// Index of the busiest weekday (lowest index wins ties)
    pub peak_index: usize,
    /// Count in the busiest bucket
    pub max_count: u64,
}

impl WeekdayActivity {
    /// Short label of the busiest weekday
    pub fn peak_day_name(&self) -> &'static str {
        DAY_NAMES[self.peak_index]
    }
}

/// The complete wrapped report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedStats {
    /// Year the report is filed under
    pub year: i32,
    /// Period label ("2024" or "Last 365 Days")
    pub period_label: String,
    /// First date of the analysis window
    pub start_date: DailyDate,
    /// Last date of the analysis window
    pub end_date: DailyDate,
    /// Date of the absolute first session ever recorded, window-independent
    pub first_session_date: Option<DailyDate>,
    /// Whole days since the absolute first session
    pub days_since_first_session: u64,
    /// Canonical sessions in the window
    pub total_sessions: u64,
    /// User plus assistant messages
    pub total_messages: u64,
    /// Distinct project hashes
    pub total_projects: u64,
    /// Tool invocations on assistant messages
    pub total_tool_calls: u64,
    /// Running token totals across all assistant usage blocks
    pub tokens: TokenUsage,
    /// Estimated total cost in USD
    pub total_cost: f64,
    /// Whether any recognized-model usage contributed cost
    pub has_usage_cost: bool,
    /// Top models by assistant-message count
    pub top_models: Vec<ModelStats>,
    /// Top languages by path-bearing tool calls
    pub top_languages: Vec<LanguageStats>,
    /// Message count per calendar date
    pub daily_activity: BTreeMap<DailyDate, u64>,
    /// Busiest single day, if there was any activity
    pub most_active_day: Option<MostActiveDay>,
    /// Weekday histogram
    pub weekday_activity: WeekdayActivity,
    /// Longest run of consecutive active days
    pub max_streak: u64,
    /// Run of consecutive active days ending today or yesterday
    pub current_streak: u64,
    /// The exact dates composing the longest streak
    pub max_streak_days: BTreeSet<DailyDate>,
}

/// Main aggregation engine
pub struct Aggregator {
    cost_calculator: CostCalculator,
    timezone: TimezoneConfig,
}

impl Aggregator {
    /// Create a new Aggregator
    pub fn new(cost_calculator: CostCalculator, timezone: TimezoneConfig) -> Self {
        Self {
            cost_calculator,
            timezone,
        }
    }

    /// Get the timezone configuration
    pub fn timezone_config(&self) -> &TimezoneConfig {
        &self.timezone
    }

    /// Aggregate canonical sessions into the wrapped report
    pub fn aggregate(
        &self,
        sessions: &[CanonicalSession],
        period: &Period,
        absolute_first_session: Option<ISOTimestamp>,
    ) -> WrappedStats {
        self.aggregate_with_now(sessions, period, absolute_first_session, Utc::now())
    }

    /// Aggregate against an explicit "now" (streaks and day-counts depend on it)
    pub fn aggregate_with_now(
        &self,
        sessions: &[CanonicalSession],
        period: &Period,
        absolute_first_session: Option<ISOTimestamp>,
        now: DateTime<Utc>,
    ) -> WrappedStats {
        let tz = self.timezone.tz;

        let mut tokens = TokenUsage::default();
        let mut total_messages = 0u64;
        let mut assistant_messages = 0u64;
        let mut total_tool_calls = 0u64;
        let mut total_cost = 0.0f64;
        let mut projects = BTreeSet::new();
        let mut model_counts: BTreeMap<ModelName, u64> = BTreeMap::new();
        let mut language_counts: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut daily_activity: BTreeMap<DailyDate, u64> = BTreeMap::new();
        let mut weekday_counts = [0u64; 7];
        let mut skipped_messages = 0u64;

        for session in sessions {
            projects.insert(session.project_hash.clone());

            for message in &session.messages {
                if !message.role.is_countable() {
                    skipped_messages += 1;
                    continue;
                }
                // Upstream validation owns malformed records; an undated
                // message is skipped rather than crashing the run
                let Some(timestamp) = message.timestamp else {
                    skipped_messages += 1;
                    continue;
                };

                total_messages += 1;

                let local = timestamp.inner().with_timezone(&tz);
                *daily_activity
                    .entry(DailyDate::new(local.date_naive()))
                    .or_insert(0) += 1;
                weekday_counts[local.weekday().num_days_from_sunday() as usize] += 1;

                if message.role != MessageRole::Assistant {
                    continue;
                }
                assistant_messages += 1;

                if let Some(model) = &message.model {
                    *model_counts.entry(model.clone()).or_insert(0) += 1;
                }

                if let Some(usage) = &message.tokens {
                    tokens += *usage;

                    if let Some(model) = &message.model {
                        // Thought tokens are billed at the output rate
                        let combined_output = usage.output + usage.thoughts;
                        total_cost += self.cost_calculator.calculate(
                            model,
                            usage.input,
                            combined_output,
                            usage.cached,
                        );
                    }
                }

                if let Some(calls) = &message.tool_calls {
                    total_tool_calls += calls.len() as u64;

                    for call in calls {
                        if let Some(lang) = call.path_argument().and_then(language_for_path) {
                            *language_counts.entry(lang).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        if skipped_messages > 0 {
            debug!("Skipped {skipped_messages} messages with unknown role or missing timestamp");
        }

        let top_models = rank(model_counts.into_iter().collect(), assistant_messages)
            .into_iter()
            .map(|(name, count, percentage)| ModelStats {
                name,
                count,
                percentage,
            })
            .collect();

        let language_total: u64 = language_counts.values().sum();
        let top_languages = rank(
            language_counts
                .into_iter()
                .map(|(name, count)| (name.to_string(), count))
                .collect(),
            language_total,
        )
        .into_iter()
        .map(|(name, count, percentage)| LanguageStats {
            name,
            count,
            percentage,
        })
        .collect();

        let most_active_day = daily_activity
            .iter()
            .fold(None::<MostActiveDay>, |best, (&date, &count)| match best {
                Some(b) if b.count >= count => Some(b),
                _ => Some(MostActiveDay { date, count }),
            });

        let weekday_activity = peak_weekday(weekday_counts);

        let active_dates: Vec<NaiveDate> =
            daily_activity.keys().map(|d| *d.inner()).collect();
        let (max_streak, max_streak_days) = longest_streak(&active_dates);

        let today = self.timezone.date_of(&now);
        let current_streak = current_streak(&daily_activity, today);

        let days_since_first_session = absolute_first_session
            .map(|first| (now - *first.inner()).num_days().max(0) as u64)
            .unwrap_or(0);

        WrappedStats {
            year: period.year,
            period_label: period.label.clone(),
            start_date: DailyDate::new(period.start_date),
            end_date: DailyDate::new(period.end_date),
            first_session_date: absolute_first_session.map(|ts| ts.to_daily_date(&tz)),
            days_since_first_session,
            total_sessions: sessions.len() as u64,
            total_messages,
            total_projects: projects.len() as u64,
            total_tool_calls,
            tokens,
            has_usage_cost: total_cost > 0.0,
            total_cost,
            top_models,
            top_languages,
            daily_activity,
            most_active_day,
            weekday_activity,
            max_streak,
            current_streak,
            max_streak_days,
        }
    }
}

/// Sort counters descending and keep the top K with percentages
///
/// A zero denominator yields 0%, not an error. The incoming list is already
/// key-ordered, so equal counts rank alphabetically.
fn rank<N>(mut counters: Vec<(N, u64)>, denominator: u64) -> Vec<(N, u64, f64)> {
    counters.sort_by(|a, b| b.1.cmp(&a.1));
    counters
        .into_iter()
        .take(TOP_K)
        .map(|(name, count)| {
            let percentage = if denominator > 0 {
                count as f64 / denominator as f64 * 100.0
            } else {
                0.0
            };
            (name, count, percentage)
        })
        .collect()
}

fn peak_weekday(counts: [u64; 7]) -> WeekdayActivity {
    let mut peak_index = 0;
    let mut max_count = 0;
    for (i, &count) in counts.iter().enumerate() {
        // Strict comparison keeps the lowest index on ties
        if count > max_count {
            max_count = count;
            peak_index = i;
        }
    }
    WeekdayActivity {
        counts,
        peak_index,
        max_count,
    }
}

/// Longest run of consecutive dates in an ascending-sorted slice
///
/// Tracks the winning run as an index range and materializes the date set
/// once at the end; the first maximal run wins ties.
fn longest_streak(dates: &[NaiveDate]) -> (u64, BTreeSet<DailyDate>) {
    if dates.is_empty() {
        return (0, BTreeSet::new());
    }

    let mut best_start = 0usize;
    let mut best_len = 1usize;
    let mut run_start = 0usize;

    for i in 1..dates.len() {
        if (dates[i] - dates[i - 1]).num_days() == 1 {
            let run_len = i - run_start + 1;
            if run_len > best_len {
                best_len = run_len;
                best_start = run_start;
            }
        } else {
            run_start = i;
        }
    }

    let days = dates[best_start..best_start + best_len]
        .iter()
        .map(|d| DailyDate::new(*d))
        .collect();
    (best_len as u64, days)
}

/// Consecutive active days ending today, or yesterday if today is quiet
fn current_streak(daily_activity: &BTreeMap<DailyDate, u64>, today: NaiveDate) -> u64 {
    let yesterday = today - Duration::days(1);

    let anchor = if daily_activity.contains_key(&DailyDate::new(today)) {
        today
    } else if daily_activity.contains_key(&DailyDate::new(yesterday)) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0u64;
    let mut day = anchor;
    while daily_activity.contains_key(&DailyDate::new(day)) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, MessageId, ProjectHash, SessionId, ToolCall};
    use chrono::TimeZone;

    fn ts(s: &str) -> ISOTimestamp {
        ISOTimestamp::new(
            DateTime::parse_from_rfc3339(s)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn user_msg(id: &str, timestamp: &str) -> Message {
        Message {
            id: MessageId::new(id),
            timestamp: Some(ts(timestamp)),
            role: MessageRole::User,
            content: String::new(),
            model: None,
            tokens: None,
            tool_calls: None,
        }
    }

    fn assistant_msg(id: &str, timestamp: &str, model: &str) -> Message {
        Message {
            id: MessageId::new(id),
            timestamp: Some(ts(timestamp)),
            role: MessageRole::Assistant,
            content: String::new(),
            model: Some(ModelName::new(model)),
            tokens: None,
            tool_calls: None,
        }
    }

    fn session(id: &str, project: &str, messages: Vec<Message>) -> CanonicalSession {
        let start = messages
            .iter()
            .filter_map(|m| m.timestamp)
            .min()
            .unwrap_or_else(|| ts("2025-01-01T00:00:00Z"));
        let end = messages
            .iter()
            .filter_map(|m| m.timestamp)
            .max()
            .unwrap_or(start);
        CanonicalSession {
            session_id: SessionId::new(id),
            project_hash: ProjectHash::new(project),
            start_time: start,
            last_updated: end,
            messages,
        }
    }

    fn utc_aggregator() -> Aggregator {
        Aggregator::new(
            CostCalculator::new(),
            TimezoneConfig::from_cli(Some("UTC"), false).unwrap(),
        )
    }

    fn test_period() -> Period {
        Period::resolve_at(Some(2025), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
    }

    fn noon(y: i32, m: u32, d: u32) -> String {
        format!("{y:04}-{m:02}-{d:02}T12:00:00Z")
    }

    #[test]
    fn test_empty_input_yields_zero_result() {
        let stats = utc_aggregator().aggregate_with_now(
            &[],
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_messages, 0);
        assert_eq!(stats.total_projects, 0);
        assert_eq!(stats.tokens.total, 0);
        assert_eq!(stats.total_cost, 0.0);
        assert!(!stats.has_usage_cost);
        assert!(stats.top_models.is_empty());
        assert!(stats.most_active_day.is_none());
        assert_eq!(stats.max_streak, 0);
        assert_eq!(stats.current_streak, 0);
        assert!(stats.max_streak_days.is_empty());
    }

    #[test]
    fn test_counts_and_token_totals() {
        let mut reply = assistant_msg("m2", &noon(2025, 3, 1), "gemini-2.5-flash-lite");
        reply.tokens = Some(TokenUsage {
            input: 1_000_000,
            output: 500_000,
            cached: 0,
            thoughts: 500_000,
            total: 2_000_000,
        });

        let sessions = vec![
            session("s1", "p1", vec![user_msg("m1", &noon(2025, 3, 1)), reply]),
            session("s2", "p2", vec![user_msg("m3", &noon(2025, 3, 2))]),
        ];

        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_messages, 3);
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.tokens.input, 1_000_000);
        assert_eq!(stats.tokens.thoughts, 500_000);
        assert_eq!(stats.tokens.total, 2_000_000);

        // flash-lite: 1M fresh input * 0.10 + (500k output + 500k thoughts) * 0.40
        assert!((stats.total_cost - 0.50).abs() < 1e-9);
        assert!(stats.has_usage_cost);
    }

    #[test]
    fn test_top_models_percentages() {
        let mut messages = Vec::new();
        for i in 0..6 {
            messages.push(assistant_msg(&format!("a{i}"), &noon(2025, 3, 1), "gemini-2.5-pro"));
        }
        for i in 0..3 {
            messages.push(assistant_msg(&format!("b{i}"), &noon(2025, 3, 1), "gemini-2.5-flash"));
        }
        messages.push(assistant_msg("c0", &noon(2025, 3, 1), "gemini-3-pro"));

        let sessions = vec![session("s1", "p1", messages)];
        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        let percentages: Vec<f64> = stats.top_models.iter().map(|m| m.percentage).collect();
        assert_eq!(stats.top_models[0].name.as_str(), "gemini-2.5-pro");
        assert_eq!(stats.top_models[0].count, 6);
        assert!((percentages[0] - 60.0).abs() < 1e-9);
        assert!((percentages[1] - 30.0).abs() < 1e-9);
        assert!((percentages[2] - 10.0).abs() < 1e-9);
        assert!((percentages.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_language_ranking_from_tool_call_paths() {
        let mut reply = assistant_msg("m1", &noon(2025, 3, 1), "gemini-2.5-pro");
        let call = |path: &str| ToolCall {
            name: Some("read_file".to_string()),
            args: serde_json::Map::from_iter([(
                "file_path".to_string(),
                serde_json::Value::String(path.to_string()),
            )]),
        };
        reply.tool_calls = Some(vec![
            call("src/main.rs"),
            call("src/lib.rs"),
            call("script.py"),
            call("binary.xyz"), // unknown extension contributes nothing
        ]);

        let sessions = vec![session("s1", "p1", vec![reply])];
        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.total_tool_calls, 4);
        assert_eq!(stats.top_languages.len(), 2);
        assert_eq!(stats.top_languages[0].name, "Rust");
        assert_eq!(stats.top_languages[0].count, 2);
        assert!((stats.top_languages[0].percentage - 2.0 / 3.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.top_languages[1].name, "Python");
    }

    #[test]
    fn test_daily_activity_and_most_active_day_tie_break() {
        let sessions = vec![session(
            "s1",
            "p1",
            vec![
                user_msg("m1", &noon(2025, 3, 1)),
                user_msg("m2", &noon(2025, 3, 1)),
                user_msg("m3", &noon(2025, 3, 5)),
                user_msg("m4", &noon(2025, 3, 5)),
                user_msg("m5", &noon(2025, 3, 9)),
            ],
        )];

        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.daily_activity.len(), 3);
        // Two days tie at 2 messages; the first encountered wins
        let busiest = stats.most_active_day.unwrap();
        assert_eq!(busiest.date.to_string(), "2025-03-01");
        assert_eq!(busiest.count, 2);
    }

    #[test]
    fn test_weekday_histogram_and_peak() {
        // 2025-03-03 is a Monday
        let sessions = vec![session(
            "s1",
            "p1",
            vec![
                user_msg("m1", &noon(2025, 3, 3)),
                user_msg("m2", &noon(2025, 3, 10)),
                user_msg("m3", &noon(2025, 3, 4)),
            ],
        )];

        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.weekday_activity.counts[1], 2); // Mondays
        assert_eq!(stats.weekday_activity.counts[2], 1); // Tuesday
        assert_eq!(stats.weekday_activity.peak_index, 1);
        assert_eq!(stats.weekday_activity.peak_day_name(), "Mon");
        assert_eq!(stats.weekday_activity.max_count, 2);
    }

    #[test]
    fn test_longest_streak_and_member_set() {
        let sessions = vec![session(
            "s1",
            "p1",
            vec![
                user_msg("m1", &noon(2025, 3, 1)),
                user_msg("m2", &noon(2025, 3, 2)),
                user_msg("m3", &noon(2025, 3, 3)),
                user_msg("m4", &noon(2025, 3, 11)),
            ],
        )];

        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.max_streak, 3);
        let days: Vec<String> = stats.max_streak_days.iter().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2025-03-01", "2025-03-02", "2025-03-03"]);
    }

    #[test]
    fn test_first_maximal_streak_wins_ties() {
        let sessions = vec![session(
            "s1",
            "p1",
            vec![
                user_msg("m1", &noon(2025, 3, 1)),
                user_msg("m2", &noon(2025, 3, 2)),
                user_msg("m3", &noon(2025, 3, 10)),
                user_msg("m4", &noon(2025, 3, 11)),
            ],
        )];

        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.max_streak, 2);
        let days: Vec<String> = stats.max_streak_days.iter().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2025-03-01", "2025-03-02"]);
    }

    #[test]
    fn test_current_streak_ending_today() {
        let sessions = vec![session(
            "s1",
            "p1",
            vec![
                user_msg("m1", &noon(2025, 3, 8)),
                user_msg("m2", &noon(2025, 3, 9)),
                user_msg("m3", &noon(2025, 3, 10)),
            ],
        )];

        let now = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        let stats =
            utc_aggregator().aggregate_with_now(&sessions, &test_period(), None, now);
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn test_current_streak_allows_quiet_today() {
        let sessions = vec![session(
            "s1",
            "p1",
            vec![
                user_msg("m1", &noon(2025, 3, 8)),
                user_msg("m2", &noon(2025, 3, 9)),
            ],
        )];

        // No activity on the 10th; the streak through yesterday still counts
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        let stats =
            utc_aggregator().aggregate_with_now(&sessions, &test_period(), None, now);
        assert_eq!(stats.current_streak, 2);

        // Two quiet days break it
        let now = Utc.with_ymd_and_hms(2025, 3, 11, 18, 0, 0).unwrap();
        let stats =
            utc_aggregator().aggregate_with_now(&sessions, &test_period(), None, now);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn test_days_since_first_session_ignores_window() {
        let sessions = vec![session("s1", "p1", vec![user_msg("m1", &noon(2025, 12, 1))])];

        let first_ever = ts("2025-01-01T12:00:00Z");
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap();
        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            Some(first_ever),
            now,
        );

        assert_eq!(stats.days_since_first_session, 364);
        assert_eq!(stats.first_session_date.unwrap().to_string(), "2025-01-01");
    }

    #[test]
    fn test_timezone_pins_day_and_weekday_together() {
        // 2025-03-02T03:00Z is Sunday in UTC but still Saturday Mar 1 in
        // New York; both the date key and the weekday bucket must agree
        let aggregator = Aggregator::new(
            CostCalculator::new(),
            TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap(),
        );
        let sessions = vec![session(
            "s1",
            "p1",
            vec![user_msg("m1", "2025-03-02T03:00:00Z")],
        )];

        let stats = aggregator.aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        let (date, _) = stats.daily_activity.iter().next().unwrap();
        assert_eq!(date.to_string(), "2025-03-01");
        assert_eq!(stats.weekday_activity.counts[6], 1); // Saturday
        assert_eq!(stats.weekday_activity.counts[0], 0);
    }

    #[test]
    fn test_undated_and_unknown_role_messages_are_skipped() {
        let mut undated = user_msg("m1", &noon(2025, 3, 1));
        undated.timestamp = None;
        let mut unknown = user_msg("m2", &noon(2025, 3, 1));
        unknown.role = MessageRole::Unknown;

        let sessions = vec![session(
            "s1",
            "p1",
            vec![undated, unknown, user_msg("m3", &noon(2025, 3, 1))],
        )];

        let stats = utc_aggregator().aggregate_with_now(
            &sessions,
            &test_period(),
            None,
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        );

        assert_eq!(stats.total_messages, 1);
    }

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path("src/main.rs"), Some("Rust"));
        assert_eq!(language_for_path("UPPER.PY"), Some("Python"));
        assert_eq!(language_for_path("noextension"), None);
        assert_eq!(language_for_path("archive.tar.gz"), None);
    }
}
