//! Report commands (stats, subjects, query)

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::{FilterCriteria, Report, ReportState, ReportSummary};
use crate::storage::{fetch_report, TaskSource};

const BAR_WIDTH: usize = 20;

/// Loads and validates a report snapshot through the load state machine
pub fn load_report(source: &dyn TaskSource, filters: &FilterCriteria) -> Result<Report> {
    let mut state = ReportState::default();
    let request = state.begin();

    match fetch_report(source, filters) {
        Ok(report) => state.resolve(request, report)?,
        Err(e) => {
            let message = e.to_string();
            state.fail(request, message.clone())?;
            return Err(e).context("Failed to load report");
        }
    }

    state
        .into_report()
        .ok_or_else(|| anyhow::anyhow!("Report load did not complete"))
}

/// Show completion statistics and insights
pub fn stats(output: &Output, source: &dyn TaskSource, filters: &FilterCriteria) -> Result<()> {
    let report = load_report(source, filters)?;
    let summary = &report.summary;

    if output.is_json() {
        let filters: serde_json::Map<String, serde_json::Value> = filters
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v)))
            .collect();
        output.data(&serde_json::json!({
            "filters": filters,
            "total": summary.total,
            "completed": summary.completed,
            "pending": summary.pending,
            "completion_rate": summary.completion_rate,
            "bucket": summary.bucket,
            "advisories": summary.advisories,
        }));
        return Ok(());
    }

    println!("Progress Report");
    println!("{}", "=".repeat(40));
    if !filters.is_empty() {
        println!("Filters: {}", filters.to_query_string());
    }
    println!();
    println!("Total tasks:      {}", summary.total);
    println!("Completed:        {}", summary.completed);
    println!("Pending:          {}", summary.pending);
    println!("Completion rate:  {}%", summary.completion_rate);
    println!("                  {}", progress_bar(summary));
    println!();
    println!("Insights");
    println!("  {}", summary.bucket.headline());
    println!("    {}", summary.bucket.recommendation());
    for advisory in &summary.advisories {
        println!("  {}", advisory.headline());
        println!("    {}", advisory.message());
    }

    Ok(())
}

fn progress_bar(summary: &ReportSummary) -> String {
    let filled = usize::from(summary.completion_rate) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// List known subjects
pub fn subjects(output: &Output, source: &dyn TaskSource) -> Result<()> {
    let subjects = source.subjects().context("Failed to load subjects")?;

    if output.is_json() {
        output.data(&serde_json::json!({ "subjects": subjects }));
    } else if subjects.is_empty() {
        println!("No subjects.");
    } else {
        for subject in subjects {
            println!("{}", subject);
        }
    }

    Ok(())
}

/// Print the upstream query built from the filters
pub fn query(output: &Output, filters: &FilterCriteria) {
    if output.is_json() {
        let pairs: Vec<_> = filters
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| serde_json::json!({ "key": k, "value": v }))
            .collect();
        output.data(&serde_json::json!({
            "query": filters.to_query_string(),
            "params": pairs,
        }));
    } else {
        println!("{}", filters.to_query_string());
    }
}
