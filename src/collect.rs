use crate::cli::CommonArgs;
use crate::dataset::Dataset;
use crate::forge::{collect_all, list_repos, CollectConfig, ForgejoClient};
use crate::series::build_all;
use crate::util::format_number;
use anyhow::{bail, Context};
use chrono::Utc;
use console::style;
use tracing::info;

pub struct CollectArgs {
    pub config: CollectConfig,
    pub jobs: usize,
    pub limit: Option<usize>,
    pub progress: bool,
}

pub fn exec(common: CommonArgs, args: CollectArgs) -> anyhow::Result<()> {
    let client = ForgejoClient::new(args.config);

    eprintln!(
        "{} {}/{}",
        style("Listing repositories of").bold(),
        client.config().api_url,
        client.config().org
    );
    let mut repos = list_repos(&client).context("Failed to list repositories")?;
    if repos.is_empty() {
        bail!("No repositories found for organisation '{}'", client.config().org);
    }
    if let Some(limit) = args.limit {
        repos.truncate(limit);
    }
    info!(repos = repos.len(), "repositories listed");

    let fetched = collect_all(&client, &repos, args.jobs, args.progress)?;
    let fetched_commits: usize = fetched.iter().map(|r| r.commit_count()).sum();

    let outcome = build_all(&fetched);
    let failures = outcome.failures;
    let dataset = Dataset::assemble(outcome.series, Utc::now())
        .context("No repository produced a usable series")?;

    let size = dataset
        .write(&common.data)
        .with_context(|| format!("Failed to write {}", common.data.display()))?;

    eprintln!("{}", style("Collection Summary").bold());
    eprintln!("{}", "─".repeat(50));
    eprintln!("Codes: {}", style(dataset.total_codes()).cyan());
    eprintln!(
        "Commits: {} fetched, {} kept",
        style(format_number(fetched_commits as u64)).cyan(),
        style(format_number(dataset.total_commits() as u64)).cyan()
    );
    eprintln!("Max additions: {}", style(format_number(dataset.max_additions())).green());
    eprintln!("Max deletions: {}", style(format_number(dataset.max_deletions())).red());
    eprintln!("API requests: {}", style(client.request_count()).yellow());
    if !failures.is_empty() {
        eprintln!("{}", style(format!("{} repositories skipped:", failures.len())).yellow());
        for failure in &failures {
            eprintln!("  {failure}");
        }
    }
    eprintln!(
        "Wrote {} ({:.2} MB)",
        common.data.display(),
        size as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}
