use crate::model::Series;
use crate::util::{month_start, short_sha, title};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCommit {
    pub code: String,
    pub slug: String,
    pub sha: String,
    pub message: String,
    pub url: String,
    pub additions: u64,
    pub deletions: u64,
}

/// Every commit falling in the month that starts at `start`, largest first.
pub fn commits_for_month(series: &[Series], start: NaiveDate) -> Vec<MonthCommit> {
    let mut commits: Vec<MonthCommit> = series
        .iter()
        .flat_map(|s| {
            s.commits()
                .iter()
                .filter(move |c| month_start(&c.timestamp) == start)
                .map(move |c| MonthCommit {
                    code: s.name().to_string(),
                    slug: s.slug().to_string(),
                    sha: short_sha(&c.sha),
                    message: title(&c.message),
                    url: c.commit_url.clone(),
                    additions: c.additions,
                    deletions: c.deletions,
                })
        })
        .collect();

    commits.sort_by(|a, b| {
        let changed = |c: &MonthCommit| c.additions.saturating_add(c.deletions);
        changed(b).cmp(&changed(a))
    });
    commits
}
