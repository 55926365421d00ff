//! Per-code overview: the rows of the small-multiples view with the domain
//! each one would be drawn with.

use crate::cli::CommonArgs;
use crate::dataset::Dataset;
use crate::model::{Domain, Series};
use crate::scale::{global_domain, renderable, resolve, ValueMode, ViewState};
use crate::util::format_number;
use anyhow::Context;
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub slug: String,
    pub commits: usize,
    pub additions: u64,
    pub deletions: u64,
    pub score: u64,
    pub domain: Option<Domain>,
}

#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub generated_at: DateTime<Utc>,
    pub view: ViewState,
    pub global_domain: Option<Domain>,
    pub total_codes: usize,
    pub total_commits: usize,
    /// Codes without commits, kept in the dataset but not charted.
    pub empty_codes: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

pub fn summarize(dataset: &Dataset, view: &ViewState) -> SummaryOutput {
    let all = dataset.series();
    // the assembled domain is the gross one
    let global = match view.mode {
        ValueMode::Gross => dataset.global_domain().cloned(),
        ValueMode::Net => global_domain(all, ValueMode::Net),
    };
    let rows = renderable(all, view.order)
        .into_iter()
        .map(|s| row(global.as_ref(), s, view))
        .collect();

    SummaryOutput {
        generated_at: dataset.generated_at(),
        view: *view,
        global_domain: global,
        total_codes: dataset.total_codes(),
        total_commits: dataset.total_commits(),
        empty_codes: all
            .iter()
            .filter(|s| s.is_empty())
            .map(|s| s.slug().to_string())
            .collect(),
        rows,
    }
}

fn row(global: Option<&Domain>, series: &Series, view: &ViewState) -> SummaryRow {
    SummaryRow {
        name: series.name().to_string(),
        slug: series.slug().to_string(),
        commits: series.total_commits(),
        additions: series.total_additions(),
        deletions: series.total_deletions(),
        score: series.modification_score(),
        domain: global.map(|g| resolve(g, series, view)),
    }
}

pub fn exec(common: CommonArgs, view: ViewState, json: bool) -> anyhow::Result<()> {
    let dataset = Dataset::load(&common.data)
        .with_context(|| format!("Failed to load dataset from {}", common.data.display()))?;
    let summary = summarize(&dataset, &view);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output_table(&summary)?;
    }
    Ok(())
}

fn output_table(summary: &SummaryOutput) -> anyhow::Result<()> {
    match &summary.global_domain {
        Some(domain) => println!(
            "{} codes, {} commits, {} to {}",
            style(summary.total_codes).cyan(),
            style(format_number(summary.total_commits as u64)).cyan(),
            style(domain.time.earliest.format("%Y-%m-%d")).dim(),
            style(domain.time.latest.format("%Y-%m-%d")).dim()
        ),
        None => {
            println!("No commits in dataset");
            return Ok(());
        }
    }

    println!(
        "{:<50} {:>8} {:>10} {:>10} {:>12}",
        style("Code").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Scale").bold()
    );
    println!("{}", "─".repeat(94));
    for r in &summary.rows {
        let scale = r
            .domain
            .as_ref()
            .map(|d| format!("±{}", format_number(d.magnitude.max())))
            .unwrap_or_default();
        println!(
            "{:<50} {:>8} {:>10} {:>10} {:>12}",
            r.name,
            r.commits,
            format_number(r.additions),
            format_number(r.deletions),
            scale
        );
    }
    if !summary.empty_codes.is_empty() {
        println!(
            "\n{} codes without commits: {}",
            summary.empty_codes.len(),
            style(summary.empty_codes.join(", ")).dim()
        );
    }
    Ok(())
}
