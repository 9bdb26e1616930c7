use crate::illustrate::IllustrationSummary;
use crate::matrix::{Matrix, Value, COLUMNS, ROWS};
use crate::model::{IllustrateOutput, ScheduleOutput, SCHEMA_VERSION};
use crate::schedule::{Schedule, ScheduledCommitBatch};
use crate::util::plural;
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::path::Path;

pub fn schedule_output(schedule: &Schedule, batches: &[ScheduledCommitBatch], matrix_path: &Path) -> ScheduleOutput {
    ScheduleOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        matrix_path: matrix_path.to_string_lossy().to_string(),
        anchor: schedule.anchor(),
        earliest: schedule.earliest(),
        factor: schedule.factor(),
        total_commits: batches.iter().map(|b| b.count).sum(),
        batches: batches.to_vec(),
    }
}

pub fn output_schedule_json(output: &ScheduleOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_schedule_ndjson(batches: &[ScheduledCommitBatch]) -> Result<()> {
    for batch in batches {
        println!("{}", serde_json::to_string(batch)?);
    }
    Ok(())
}

pub fn output_schedule_summary(output: &ScheduleOutput, matrix: &Matrix) -> Result<()> {
    println!("{}", style("Illustration Plan").bold());
    println!("{}", "─".repeat(COLUMNS + 4));
    output_preview(matrix);

    let dated: Vec<_> = output.batches.iter().filter(|b| b.count > 0).collect();
    println!(
        "Commits to create: {} (factor {})",
        style(output.total_commits).cyan(),
        output.factor
    );
    if let (Some(first), Some(last)) = (dated.first(), dated.last()) {
        println!(
            "Date range: {} to {}",
            style(first.date.format("%Y-%m-%d")).dim(),
            style(last.date.format("%Y-%m-%d")).dim()
        );
    }
    println!("README commit: {}", style(output.anchor.format("%Y-%m-%d")).dim());
    println!("\nUse --json or --ndjson flags to export the raw schedule.");
    Ok(())
}

pub fn illustrate_output(
    summary: &IllustrationSummary,
    repository_path: &Path,
    matrix_path: &Path,
    factor: u32,
) -> IllustrateOutput {
    IllustrateOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string_lossy().to_string(),
        matrix_path: matrix_path.to_string_lossy().to_string(),
        anchor: summary.anchor,
        factor,
        dated_commits: summary.dated_commits,
        cells_committed: summary.cells_committed,
        cells_skipped: summary.cells_skipped,
        first_commit: summary.first_commit,
        last_commit: summary.last_commit,
        readme_commit: summary.anchor,
    }
}

pub fn output_illustrate_json(output: &IllustrateOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_illustrate_summary(output: &IllustrateOutput) -> Result<()> {
    println!("{}", style("Illustration Summary").bold());
    println!("{}", "─".repeat(50));
    println!("Repository: {}", output.repository_path);
    println!(
        "Created {} dated commit{} across {} day{}",
        style(output.dated_commits).cyan(),
        plural(output.dated_commits),
        style(output.cells_committed).cyan(),
        plural(output.cells_committed as u64)
    );
    if output.cells_skipped > 0 {
        println!(
            "Skipped {} future day{}",
            style(output.cells_skipped).yellow(),
            plural(output.cells_skipped as u64)
        );
    }
    if let (Some(first), Some(last)) = (output.first_commit, output.last_commit) {
        println!(
            "Date range: {} to {}",
            style(first.format("%Y-%m-%d")).dim(),
            style(last.format("%Y-%m-%d")).dim()
        );
    }
    println!("README commit: {}", style(output.readme_commit.format("%Y-%m-%d")).dim());
    Ok(())
}

/// Print the matrix shaded the way the calendar will render it.
pub fn output_preview(matrix: &Matrix) {
    let values: Vec<Value> = matrix.values().collect();
    for row in 0..ROWS {
        let line: String = (0..COLUMNS)
            .map(|column| shade(values[column * ROWS + row]).to_string())
            .collect();
        println!("  {line}");
    }
    println!(
        "\n  {} {} {} {}  none / light / medium / dark\n",
        shade(Value::Empty),
        shade(Value::Light),
        shade(Value::Medium),
        shade(Value::Dark)
    );
}

fn shade(value: Value) -> console::StyledObject<&'static str> {
    match value {
        Value::Empty => style("·").dim(),
        Value::Light => style("░").green(),
        Value::Medium => style("▓").green(),
        Value::Dark => style("█").green().bold(),
    }
}
