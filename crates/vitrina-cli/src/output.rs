//! Run summary rendering.

use console::style;
use vitrina::{RunSummary, ScenarioOutcome};

/// Print per-run lines and the totals to stdout.
pub fn print_summary(summary: &RunSummary) {
    println!();
    for outcome in &summary.outcomes {
        println!("{}", format_outcome(outcome));
    }
    println!();
    println!("{}", format_totals(summary));
}

fn format_outcome(outcome: &ScenarioOutcome) -> String {
    let secs = outcome.duration.as_secs_f64();
    if outcome.passed() {
        format!(
            "{} {} ({secs:.1}s)",
            style("PASS").green().bold(),
            outcome.capability
        )
    } else {
        let err = outcome
            .error
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        format!(
            "{} {} ({secs:.1}s, reached {}): {err}",
            style("FAIL").red().bold(),
            outcome.capability,
            outcome.stage_reached
        )
    }
}

fn format_totals(summary: &RunSummary) -> String {
    let totals = format!(
        "{} passed, {} failed ({} total)",
        summary.passed_count(),
        summary.failed_count(),
        summary.total()
    );
    if summary.all_passed() {
        style(totals).green().to_string()
    } else {
        style(totals).red().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vitrina::{Stage, VitrinaError};

    fn passed() -> ScenarioOutcome {
        ScenarioOutcome {
            capability: "chrome / Windows 11".to_string(),
            stage_reached: Stage::Verified,
            error: None,
            duration: Duration::from_secs(42),
        }
    }

    fn failed() -> ScenarioOutcome {
        ScenarioOutcome {
            capability: "Samsung Galaxy S22".to_string(),
            stage_reached: Stage::LoggedIn,
            error: Some(VitrinaError::ElementNotFound {
                locator: "span[text='Samsung']".to_string(),
                waited_ms: 20_000,
            }),
            duration: Duration::from_secs(12),
        }
    }

    #[test]
    fn test_passed_line() {
        let line = format_outcome(&passed());
        assert!(line.contains("PASS"));
        assert!(line.contains("chrome / Windows 11"));
        assert!(line.contains("42.0s"));
    }

    #[test]
    fn test_failed_line_names_stage_and_cause() {
        let line = format_outcome(&failed());
        assert!(line.contains("FAIL"));
        assert!(line.contains("reached logged-in"));
        assert!(line.contains("span[text='Samsung']"));
    }

    #[test]
    fn test_totals() {
        let summary = RunSummary {
            outcomes: vec![passed(), failed()],
        };
        let line = format_totals(&summary);
        assert!(line.contains("1 passed, 1 failed (2 total)"));
    }
}
