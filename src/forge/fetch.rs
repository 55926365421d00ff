use super::{paginate, CommitSource};
use crate::error::Result;
use crate::model::{RawRepo, RepoDescriptor};
use crate::series::RepoPages;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

pub fn collect_repo<S: CommitSource + ?Sized>(source: &S, repo: &RawRepo) -> Result<RepoPages> {
    let pages = paginate(|page| source.commits_page(&repo.name, page))?;
    info!(
        repo = %repo.name,
        pages = pages.len(),
        commits = pages.iter().map(Vec::len).sum::<usize>(),
        "fetched commits"
    );
    Ok(RepoPages {
        descriptor: RepoDescriptor::from(repo),
        pages,
    })
}

/// Fetch every repository's commit pages on at most `jobs` threads. Output
/// keeps the order of `repos`; the first fetch failure aborts the run.
pub fn collect_all<S: CommitSource + Sync + ?Sized>(
    source: &S,
    repos: &[RawRepo],
    jobs: usize,
    show_progress: bool,
) -> anyhow::Result<Vec<RepoPages>> {
    let pb = if show_progress {
        let pb = ProgressBar::new(repos.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("Failed to build fetch thread pool")?;

    let fetched: Result<Vec<RepoPages>> = pool.install(|| {
        repos
            .par_iter()
            .map(|repo| {
                let pages = collect_repo(source, repo);
                pb.set_message(repo.name.clone());
                pb.inc(1);
                pages
            })
            .collect()
    });

    match fetched {
        Ok(all) => {
            pb.finish_with_message("Commits fetched");
            Ok(all)
        }
        Err(e) => {
            pb.abandon_with_message("Fetch failed");
            Err(e).context("Failed to fetch repository commits")
        }
    }
}
