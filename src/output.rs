//! Output formatting for the wrapped report
//!
//! Two formatters behind one trait: a colored terminal card for humans and
//! pretty-printed JSON for machines. The card's activity heatmap is built
//! from week columns the same way contribution graphs are: the window start
//! is aligned back to Sunday and each column is one week.

use crate::aggregation::WrappedStats;
use crate::model_formatter::format_model_name;
use crate::types::DailyDate;
use chrono::{Datelike, Duration, NaiveDate};
use colored::Colorize;
use prettytable::{Table, format, row};

/// Glyphs by heatmap intensity level, quiet to busy
const INTENSITY_GLYPHS: [&str; 7] = ["·", "░", "░", "▒", "▒", "▓", "█"];

/// Width of the weekday bar chart, in cells
const BAR_WIDTH: u64 = 20;

/// Trait for wrapped-report formatters
pub trait OutputFormatter {
    /// Render the full report
    fn format_wrapped(&self, stats: &WrappedStats) -> String;
}

/// Pick a formatter based on CLI flags
pub fn get_formatter(json: bool, full_model_names: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(CardFormatter { full_model_names })
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_wrapped(&self, stats: &WrappedStats) -> String {
        // All report types serialize infallibly (string-keyed maps only)
        serde_json::to_string_pretty(stats).expect("report serializes to JSON")
    }
}

/// Colored terminal card for human-readable output
pub struct CardFormatter {
    /// Show raw model ids instead of shortened names
    pub full_model_names: bool,
}

impl CardFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn summary_section(stats: &WrappedStats) -> String {
        let mut lines = vec![
            format!("Sessions       {}", Self::format_number(stats.total_sessions)),
            format!("Messages       {}", Self::format_number(stats.total_messages)),
            format!("Projects       {}", Self::format_number(stats.total_projects)),
            format!("Tool calls     {}", Self::format_number(stats.total_tool_calls)),
            format!(
                "Total tokens   {}  ({} in / {} out / {} cached / {} thought)",
                Self::format_number(stats.tokens.total),
                Self::format_number(stats.tokens.input),
                Self::format_number(stats.tokens.output),
                Self::format_number(stats.tokens.cached),
                Self::format_number(stats.tokens.thoughts),
            ),
        ];

        if stats.has_usage_cost {
            lines.push(format!(
                "Est. cost      {}",
                Self::format_currency(stats.total_cost)
            ));
        }

        if let Some(most_active) = &stats.most_active_day {
            lines.push(format!(
                "Busiest day    {} ({} messages)",
                most_active.date.format("%A, %b %-d"),
                Self::format_number(most_active.count)
            ));
        }

        if stats.days_since_first_session > 0 {
            lines.push(format!(
                "First session  {} days ago",
                Self::format_number(stats.days_since_first_session)
            ));
        }

        lines.join("\n")
    }

    fn rankings_section(&self, stats: &WrappedStats) -> String {
        let mut sections = Vec::new();

        if !stats.top_models.is_empty() {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_CLEAN);
            table.set_titles(row![b -> "Top models", b -> "Msgs", b -> "%"]);
            for model in &stats.top_models {
                table.add_row(row![
                    format_model_name(model.name.as_str(), self.full_model_names),
                    r -> Self::format_number(model.count),
                    r -> format!("{:.1}%", model.percentage)
                ]);
            }
            sections.push(table.to_string());
        }

        if !stats.top_languages.is_empty() {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_CLEAN);
            table.set_titles(row![b -> "Top languages", b -> "Actions", b -> "%"]);
            for language in &stats.top_languages {
                table.add_row(row![
                    language.name,
                    r -> Self::format_number(language.count),
                    r -> format!("{:.1}%", language.percentage)
                ]);
            }
            sections.push(table.to_string());
        }

        sections.join("\n")
    }

    fn weekday_section(stats: &WrappedStats) -> String {
        const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let max = stats.weekday_activity.max_count;

        let mut lines = vec!["By weekday".bold().to_string()];
        for (i, &count) in stats.weekday_activity.counts.iter().enumerate() {
            let width = if max > 0 { count * BAR_WIDTH / max } else { 0 };
            let bar = "█".repeat(width as usize);
            let line = format!("{}  {:<20} {}", DAY_NAMES[i], bar, Self::format_number(count));
            if i == stats.weekday_activity.peak_index && max > 0 {
                lines.push(line.green().to_string());
            } else {
                lines.push(line);
            }
        }
        lines.join("\n")
    }

    fn heatmap_section(stats: &WrappedStats) -> String {
        const ROW_LABELS: [&str; 7] = ["   ", "Mon", "   ", "Wed", "   ", "Fri", "   "];

        let weeks = generate_weeks(*stats.start_date.inner(), *stats.end_date.inner());
        let max = stats.daily_activity.values().copied().max().unwrap_or(0);

        let mut lines = vec!["Activity".bold().to_string()];
        for weekday in 0..7 {
            let mut line = format!("{} ", ROW_LABELS[weekday]);
            for week in &weeks {
                match week[weekday] {
                    Some(date) => {
                        let count = stats
                            .daily_activity
                            .get(&DailyDate::new(date))
                            .copied()
                            .unwrap_or(0);
                        let glyph = INTENSITY_GLYPHS[intensity_level(count, max) as usize];
                        if count > 0 {
                            line.push_str(&glyph.green().to_string());
                        } else {
                            line.push_str(&glyph.dimmed().to_string());
                        }
                    }
                    None => line.push(' '),
                }
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn streak_section(stats: &WrappedStats) -> String {
        let mut lines = vec![format!(
            "Longest streak  {} days",
            Self::format_number(stats.max_streak)
        )];

        if stats.max_streak > 1 {
            if let (Some(first), Some(last)) = (
                stats.max_streak_days.iter().next(),
                stats.max_streak_days.iter().next_back(),
            ) {
                lines[0].push_str(&format!(
                    "  ({} - {})",
                    first.format("%b %-d"),
                    last.format("%b %-d")
                ));
            }
        }

        lines.push(format!(
            "Current streak  {} days",
            Self::format_number(stats.current_streak)
        ));
        lines.join("\n")
    }
}

impl OutputFormatter for CardFormatter {
    fn format_wrapped(&self, stats: &WrappedStats) -> String {
        let title = format!("Gemini CLI Wrapped — {}", stats.period_label);
        let range = format!(
            "{} → {}",
            stats.start_date.format("%b %-d, %Y"),
            stats.end_date.format("%b %-d, %Y")
        );

        let sections = [
            format!("{}\n{}", title.bold().cyan(), range.dimmed()),
            Self::summary_section(stats),
            self.rankings_section(stats),
            Self::weekday_section(stats),
            Self::heatmap_section(stats),
            Self::streak_section(stats),
        ];

        sections
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Intensity level 0..=6 for a day's count relative to the busiest day
pub fn intensity_level(count: u64, max_count: u64) -> u8 {
    if count == 0 || max_count == 0 {
        return 0;
    }
    let ratio = count as f64 / max_count as f64;
    match ratio {
        r if r <= 0.1 => 1,
        r if r <= 0.25 => 2,
        r if r <= 0.4 => 3,
        r if r <= 0.6 => 4,
        r if r <= 0.8 => 5,
        _ => 6,
    }
}

/// Build week columns covering the window, aligned to Sunday
///
/// Cells outside the window are `None` so partial first and last weeks
/// render as gaps.
pub fn generate_weeks(start: NaiveDate, end: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    if start > end {
        return Vec::new();
    }

    let aligned_start = start - Duration::days(start.weekday().num_days_from_sunday() as i64);

    let mut weeks = Vec::new();
    let mut cursor = aligned_start;
    while cursor <= end {
        let mut week = [None; 7];
        for slot in week.iter_mut() {
            if cursor >= start && cursor <= end {
                *slot = Some(cursor);
            }
            cursor += Duration::days(1);
        }
        weeks.push(week);
    }
    weeks
}
