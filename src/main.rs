//! Tab Planner - command line entry point
//!
//! Loads a scenario file, drops attacks already covered by supports, matches
//! tabs to the remaining attacks and prints the plan.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tab_planner::core::error::{PlannerError, Result};
use tab_planner::core::types::Timestamp;
use tab_planner::export::{build_plan, VillageIndex};
use tab_planner::matching::{TabMatch, Troops};
use tab_planner::scenario::{load_scenario, plan_scenario, PlanningOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Match reinforcement tabs to incoming attacks
#[derive(Parser, Debug)]
#[command(name = "tab_planner")]
#[command(about = "Assign reinforcement tabs from own villages to incoming attacks")]
struct Args {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Reference time (RFC 3339); defaults to the scenario's `now`, then the clock
    #[arg(long, value_parser = parse_timestamp)]
    now: Option<Timestamp>,

    /// Override the support grace period in seconds
    #[arg(long, allow_negative_numbers = true)]
    grace: Option<i64>,

    /// Override the movement boost in percent (0-100)
    #[arg(long, allow_negative_numbers = true)]
    boost: Option<i64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// World village dump (`village.txt`) for planner ids; JSON output only
    #[arg(long)]
    villages: Option<PathBuf>,
}

fn parse_timestamp(s: &str) -> std::result::Result<Timestamp, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
}

/// Planner ids only make sense in the JSON output
fn check_args(args: &Args) -> std::result::Result<(), clap::Error> {
    if args.villages.is_some() && args.format != OutputFormat::Json {
        return Err(Args::command().error(
            ErrorKind::ArgumentConflict,
            "--villages requires --format json",
        ));
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tab_planner=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = check_args(&args) {
        err.exit();
    }

    let mut scenario = load_scenario(&args.scenario)?;
    if let Some(grace) = args.grace {
        scenario.config.support_grace_seconds = grace;
    }
    if let Some(boost) = args.boost {
        scenario.config.boost_percent = boost;
    }
    scenario.config.validate()?;

    let now = args
        .now
        .or(scenario.now)
        .unwrap_or_else(|| Utc::now().fixed_offset());
    tracing::info!("Planning relative to {}", now);

    let outcome = plan_scenario(&scenario, now)?;

    match args.format {
        OutputFormat::Text => print_text(&outcome),
        OutputFormat::Json => print_json(&outcome, args.villages)?,
    }

    Ok(())
}

fn print_json(outcome: &PlanningOutcome, villages: Option<PathBuf>) -> Result<()> {
    let value = match villages {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                PlannerError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let index = VillageIndex::parse_village_txt(&content);
            serde_json::to_value(build_plan(&outcome.report.matches, &index))?
        }
        None => serde_json::json!({
            "matches": outcome.report.matches,
            "unmatched": outcome.report.unmatched,
            "covered": outcome.covered,
            "template_errors": outcome.report.template_errors,
            "window_errors": outcome.window_errors,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(outcome: &PlanningOutcome) {
    let report = &outcome.report;

    println!("=== TABS ({}) ===", report.matches.len());
    for tab in &report.matches {
        print_match(tab);
    }

    if !report.unmatched.is_empty() {
        println!();
        println!("=== UNMATCHED ({}) ===", report.unmatched.len());
        for attack in &report.unmatched {
            println!("  {}  arrives {}", attack.target, format_time(attack.arrival));
        }
    }

    if !outcome.covered.is_empty() {
        println!();
        println!("=== COVERED BY SUPPORT ({}) ===", outcome.covered.len());
        for attack in &outcome.covered {
            println!("  {}  arrives {}", attack.target, format_time(attack.arrival));
        }
    }

    for error in &report.template_errors {
        println!("Template #{} skipped: {}", error.index + 1, error.message);
    }
    for error in &outcome.window_errors {
        println!("Window #{} skipped: {}", error.index + 1, error.message);
    }
}

fn print_match(tab: &TabMatch) {
    let label = if tab.source_name.is_empty() {
        tab.source.to_string()
    } else {
        format!("{} ({})", tab.source, tab.source_name)
    };
    println!(
        "  {} -> {}  send {}  arrive {}  [{}]  {}",
        label,
        tab.target,
        format_time(tab.send_time),
        format_time(tab.arrival),
        tab.slowest_unit,
        format_units(&tab.units)
    );
}

fn format_units(units: &Troops) -> String {
    units
        .iter()
        .map(|(unit, count)| format!("{}x {}", count, unit))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_time(ts: Timestamp) -> String {
    ts.format("%d.%m.%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_villages_requires_json() {
        let args = Args::try_parse_from(["tab_planner", "plan.toml", "--villages", "village.txt"])
            .unwrap();
        let err = check_args(&args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let args = Args::try_parse_from([
            "tab_planner",
            "plan.toml",
            "--villages",
            "village.txt",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(check_args(&args).is_ok());
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "tab_planner",
            "plan.toml",
            "--grace",
            "-5",
            "--now",
            "2026-01-25T09:00:00+01:00",
        ])
        .unwrap();
        assert_eq!(args.grace, Some(-5));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.now.is_some());
        assert!(check_args(&args).is_ok());
    }
}
