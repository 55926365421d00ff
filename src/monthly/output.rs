use super::MonthCommit;
use crate::model::{saturating_sum, MonthBucket};
use crate::scale::ValueMode;
use crate::util::{format_number, format_signed, month_key};
use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct MonthlyOutput<'a> {
    generated_at: DateTime<Utc>,
    mode: ValueMode,
    total_additions: u64,
    total_deletions: u64,
    buckets: &'a [MonthBucket],
}

pub fn output_json(
    buckets: &[MonthBucket],
    generated_at: DateTime<Utc>,
    mode: ValueMode,
) -> Result<()> {
    let output = MonthlyOutput {
        generated_at,
        mode,
        total_additions: saturating_sum(buckets.iter().map(|b| b.additions)),
        total_deletions: saturating_sum(buckets.iter().map(|b| b.deletions)),
        buckets,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(buckets: &[MonthBucket]) -> Result<()> {
    for bucket in buckets {
        println!("{}", serde_json::to_string(bucket)?);
    }
    Ok(())
}

const BAR_WIDTH: usize = 20;

fn bar(value: u128, max: u128, glyph: &str) -> String {
    let len = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * BAR_WIDTH as f64).ceil() as usize
    };
    glyph.repeat(len.min(BAR_WIDTH))
}

/// Console histogram: additions right of the axis, deletions left of it, or a
/// single signed bar in net mode.
pub fn output_histogram(buckets: &[MonthBucket], mode: ValueMode, top: usize) -> Result<()> {
    if buckets.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let max = match mode {
        ValueMode::Gross => buckets
            .iter()
            .map(|b| u128::from(b.additions.max(b.deletions)))
            .max()
            .unwrap_or(1),
        ValueMode::Net => buckets
            .iter()
            .map(|b| b.net().unsigned_abs())
            .max()
            .unwrap_or(1),
    };

    println!("{}", style("Monthly line changes").bold());
    println!("{}", "─".repeat(60 + BAR_WIDTH));

    for bucket in buckets {
        let (left, right) = match mode {
            ValueMode::Gross => (
                bar(bucket.deletions.into(), max, "█"),
                bar(bucket.additions.into(), max, "█"),
            ),
            ValueMode::Net if bucket.net() < 0 => {
                (bar(bucket.net().unsigned_abs(), max, "█"), String::new())
            }
            ValueMode::Net => (String::new(), bar(bucket.net().unsigned_abs(), max, "█")),
        };

        let codes: Vec<&str> = bucket
            .contributions
            .iter()
            .take(top)
            .map(|c| c.name.as_str())
            .collect();

        println!(
            "{} {:>w$}│{:<w$} {:>10} {:>10}  {}",
            month_key(&bucket.start),
            style(left).red(),
            style(right).green(),
            style(format!("+{}", format_number(bucket.additions))).green(),
            style(format!("-{}", format_number(bucket.deletions))).red(),
            style(codes.join(", ")).dim(),
            w = BAR_WIDTH,
        );
    }

    let total_add = saturating_sum(buckets.iter().map(|b| b.additions));
    let total_del = saturating_sum(buckets.iter().map(|b| b.deletions));
    println!("\n{} months", buckets.len());
    println!("Total additions: {}", style(format_number(total_add)).green());
    println!("Total deletions: {}", style(format_number(total_del)).red());
    println!(
        "Net: {}",
        style(format_signed(i128::from(total_add) - i128::from(total_del))).cyan()
    );

    Ok(())
}

/// Detail of one month, the console counterpart of a chart tooltip.
pub fn output_month(bucket: &MonthBucket, commits: &[MonthCommit], limit: usize) -> Result<()> {
    println!("{}", style(month_key(&bucket.start)).bold());
    println!(
        "{}  {}  Net: {}",
        style(format!("+{}", format_number(bucket.additions))).green(),
        style(format!("-{}", format_number(bucket.deletions))).red(),
        format_signed(bucket.net())
    );
    println!("{}", "─".repeat(60));

    for commit in commits.iter().take(limit) {
        println!(
            "{:<30} {:>8} {:>8}  {}",
            commit.code,
            style(format!("+{}", commit.additions)).green(),
            style(format!("-{}", commit.deletions)).red(),
            commit.message
        );
        println!("  {}", style(&commit.url).dim());
    }
    if commits.len() > limit {
        println!("\n... and {} more commits", commits.len() - limit);
    }
    Ok(())
}
