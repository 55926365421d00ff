use crate::error::{CodesError, Result};
use crate::model::{RawCommit, RepoDescriptor, Series};
use crate::normalize::normalize;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Everything fetched for one repository, pages in retrieval order.
#[derive(Debug, Clone)]
pub struct RepoPages {
    pub descriptor: RepoDescriptor,
    pub pages: Vec<Vec<RawCommit>>,
}

impl RepoPages {
    pub fn commit_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub series: Vec<Series>,
    pub failures: Vec<CodesError>,
}

/// Build one series. Commits keep page order, then in-page order; nothing is
/// re-sorted by timestamp. The first malformed commit aborts the series.
pub fn build_series(descriptor: &RepoDescriptor, pages: &[Vec<RawCommit>]) -> Result<Series> {
    let mut commits = Vec::with_capacity(pages.iter().map(Vec::len).sum());
    for raw in pages.iter().flatten() {
        let record = normalize(raw).map_err(|e| e.in_repo(&descriptor.slug))?;
        commits.push(record);
    }
    debug!(repo = %descriptor.slug, commits = commits.len(), "series built");
    Ok(Series::new(descriptor.clone(), commits))
}

/// Build every repository independently. A failing repository is reported in
/// `failures` and does not affect the others; successes keep input order.
pub fn build_all(fetched: &[RepoPages]) -> BuildOutcome {
    let results: Vec<Result<Series>> = fetched
        .par_iter()
        .map(|repo| build_series(&repo.descriptor, &repo.pages))
        .collect();

    let mut outcome = BuildOutcome::default();
    for result in results {
        match result {
            Ok(series) => outcome.series.push(series),
            Err(e) => {
                warn!("skipping repository: {e}");
                outcome.failures.push(e);
            }
        }
    }
    outcome
}
