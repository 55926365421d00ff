use super::{
    aggregate_monthly, commits_for_month, output_histogram, output_json, output_month,
    output_ndjson,
};
use crate::cli::CommonArgs;
use crate::dataset::Dataset;
use crate::error::CodesError;
use crate::scale::ValueMode;
use anyhow::Context;
use chrono::NaiveDate;

pub struct MonthlyArgs {
    pub json: bool,
    pub ndjson: bool,
    pub net: bool,
    pub top: usize,
    pub month: Option<String>,
}

pub fn exec(common: CommonArgs, args: MonthlyArgs) -> anyhow::Result<()> {
    let dataset = Dataset::load(&common.data)
        .with_context(|| format!("Failed to load dataset from {}", common.data.display()))?;
    let mode = if args.net { ValueMode::Net } else { ValueMode::Gross };

    let buckets = aggregate_monthly(dataset.series());

    if let Some(month) = args.month.as_deref() {
        let start = parse_month(month)?;
        let bucket = buckets
            .iter()
            .find(|b| b.start == start)
            .with_context(|| format!("No commits in {month}"))?;
        let commits = commits_for_month(dataset.series(), start);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&commits)?);
        } else {
            output_month(bucket, &commits, args.top)?;
        }
        return Ok(());
    }

    if args.json {
        output_json(&buckets, dataset.generated_at(), mode)?;
    } else if args.ndjson {
        output_ndjson(&buckets)?;
    } else {
        output_histogram(&buckets, mode, args.top)?;
    }

    Ok(())
}

/// `YYYY-MM` to the first day of that month.
fn parse_month(input: &str) -> Result<NaiveDate, CodesError> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|e| CodesError::InvalidDate(format!("'{input}' is not YYYY-MM: {e}")))
}
