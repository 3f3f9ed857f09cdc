//! Output formatting for the gridgate CLI.

use anyhow::Result;
use clap::ValueEnum;
use gridgate_lib::prelude::*;
use serde_json::json;

/// Output format for query results.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    /// One human-readable line per hourly record.
    Text,
    /// A single JSON document with all three windows.
    Json,
    /// One JSON object per record, newline-delimited.
    Ndjson,
}

/// Writes all window outcomes to stdout in the chosen format.
pub(crate) fn write_outcomes(outcomes: &[WindowOutcome], format: Format) -> Result<()> {
    match format {
        Format::Text => write_text(outcomes),
        Format::Json => write_json(outcomes)?,
        Format::Ndjson => write_ndjson(outcomes)?,
    }
    Ok(())
}

fn write_text(outcomes: &[WindowOutcome]) {
    for outcome in outcomes {
        println!("== {} ==", outcome.window);
        match &outcome.outcome {
            Ok(records) if records.is_empty() => println!("(no records)"),
            Ok(records) => {
                for record in records {
                    println!("{}", format_record(record));
                }
            }
            Err(err) => println!("query failed: {err}"),
        }
    }
}

/// Renders one record as a human-readable line: local timestamp,
/// location, cleared megawatts, and any field-level issues.
fn format_record(record: &HourlyResult) -> String {
    let mut line = format!(
        "{}  {:<8} Cleared MW: {:.3}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.location,
        record.cleared_mw
    );
    for issue in &record.issues {
        line.push_str(&format!(" [{issue}]"));
    }
    line
}

fn write_json(outcomes: &[WindowOutcome]) -> Result<()> {
    let windows = outcomes
        .iter()
        .map(window_value)
        .collect::<Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&windows)?);
    Ok(())
}

fn window_value(outcome: &WindowOutcome) -> Result<serde_json::Value> {
    Ok(match &outcome.outcome {
        Ok(records) => json!({
            "window": outcome.window,
            "records": serde_json::to_value(records)?,
        }),
        Err(err) => json!({
            "window": outcome.window,
            "error": err.to_string(),
        }),
    })
}

fn write_ndjson(outcomes: &[WindowOutcome]) -> Result<()> {
    for outcome in outcomes {
        if let Ok(records) = &outcome.outcome {
            for record in records {
                let mut value = serde_json::to_value(record)?;
                value["window"] = serde_json::to_value(outcome.window)?;
                println!("{value}");
            }
        }
    }
    Ok(())
}
