//! Colorful console output for pipeline events.
//!
//! Provides a `tracing` layer that prints eqrank events as single colored
//! lines on stderr. Per-problem verdicts, fold results and the final summary
//! get their own layout; every other event is printed as `event key=value`.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. The level
/// defaults to `info` and follows `RUST_LOG` when set.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(EqRankConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats eqrank events with colors.
pub struct EqRankConsoleLayer;

impl<S: Subscriber> Layer<S> for EqRankConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("eqrank") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        let _ = writeln!(io::stderr(), "{}", output);
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl EventVisitor {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn count(&self, name: &str) -> u64 {
        self.get(name).and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.record_str(field, format!("{:?}", value).trim_matches('"'));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            name => self.fields.push((name, value.to_string())),
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.push((field.name(), format!("{:.4}", value)));
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    let body = match v.event.as_deref() {
        Some("problem_evaluated") => format_problem(v),
        Some("fold_evaluated") => format_fold(v),
        Some("summary") => format_summary(v),
        Some(event) => format_generic(event, v),
        None => format_generic(v.message.as_deref().unwrap_or(""), v),
    };
    format!("{} {} {}", timestamp().bright_black(), format_level(level), body)
}

fn format_level(level: Level) -> String {
    match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => " WARN".yellow().to_string(),
        Level::INFO => " INFO".bright_green().to_string(),
        Level::DEBUG => "DEBUG".bright_blue().to_string(),
        Level::TRACE => "TRACE".bright_black().to_string(),
    }
}

fn format_problem(v: &EventVisitor) -> String {
    let outcome = v.get("outcome").unwrap_or("N/A");
    let outcome = if v.get("correct") == Some("true") {
        outcome.bright_green().to_string()
    } else {
        outcome.bright_red().to_string()
    };
    format!(
        "{} problem {:>5}  {}",
        "[Evaluate]".bright_cyan(),
        v.get("problem_id").unwrap_or("?").white(),
        outcome
    )
}

fn format_fold(v: &EventVisitor) -> String {
    format!(
        "{} fold {} done: correct ({}), incorrect ({}), rejected ({}), failed ({}), accuracy ({})",
        "[Evaluate]".bright_cyan(),
        v.get("fold").unwrap_or("?").yellow(),
        v.count("correct").to_formatted_string(&Locale::en).bright_green(),
        v.count("incorrect").to_formatted_string(&Locale::en).bright_red(),
        v.count("rejected").to_formatted_string(&Locale::en).white(),
        v.count("failed").to_formatted_string(&Locale::en).white(),
        format_percent(v.get("accuracy")),
    )
}

fn format_summary(v: &EventVisitor) -> String {
    format!(
        "{} {} folds: {} of {} counted problems correct, accuracy ({})",
        "[Summary]".bright_cyan(),
        v.count("folds").to_formatted_string(&Locale::en).yellow(),
        v.count("correct").to_formatted_string(&Locale::en).bright_green(),
        v.count("counted").to_formatted_string(&Locale::en).white(),
        format_percent(v.get("accuracy")),
    )
}

fn format_generic(event: &str, v: &EventVisitor) -> String {
    let mut line = format!("{} {}", "[eqrank]".bright_cyan(), event.white().bold());
    for (name, value) in &v.fields {
        line.push_str(&format!(" {}={}", name.bright_black(), value));
    }
    line
}

fn format_percent(value: Option<&str>) -> String {
    match value.and_then(|v| v.parse::<f64>().ok()) {
        Some(p) => format!("{:.2}%", p).bright_magenta().bold().to_string(),
        None => "N/A".white().to_string(),
    }
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str, fields: &[(&'static str, &str)]) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            message: None,
            fields: fields.iter().map(|(n, v)| (*n, v.to_string())).collect(),
        }
    }

    fn plain(s: &str) -> String {
        // strips ANSI color sequences
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_fold_line() {
        let v = visitor(
            "fold_evaluated",
            &[
                ("fold", "2"),
                ("correct", "1200"),
                ("incorrect", "3"),
                ("rejected", "0"),
                ("failed", "1"),
                ("accuracy", "99.7506"),
            ],
        );
        let line = plain(&format_fold(&v));
        assert!(line.contains("fold 2 done"));
        assert!(line.contains("correct (1,200)"));
        assert!(line.contains("accuracy (99.75%)"));
    }

    #[test]
    fn test_generic_line_lists_fields() {
        let v = visitor("folds_written", &[("folds", "5"), ("problems", "12")]);
        let line = plain(&format_generic("folds_written", &v));
        assert_eq!(line, "[eqrank] folds_written folds=5 problems=12");
    }

    #[test]
    fn test_percent_without_value() {
        assert_eq!(plain(&format_percent(None)), "N/A");
        assert_eq!(plain(&format_percent(Some("50"))), "50.00%");
    }

    #[test]
    fn test_init_twice() {
        init();
        init();
    }
}
