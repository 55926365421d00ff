use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One commit after normalization. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
    pub additions: u64,
    pub deletions: u64,
    pub commit_url: String,
}

impl CommitRecord {
    pub fn epoch_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    pub fn changed_lines(&self) -> u64 {
        self.additions.saturating_add(self.deletions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    pub slug: String,
    pub name: String,
    pub repo_url: String,
}

impl From<&RawRepo> for RepoDescriptor {
    fn from(repo: &RawRepo) -> Self {
        let name = repo
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(&repo.name)
            .to_string();
        Self {
            slug: repo.name.clone(),
            name,
            repo_url: repo.html_url.clone(),
        }
    }
}

/// The commit history of one code, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    descriptor: RepoDescriptor,
    commits: Vec<CommitRecord>,
}

impl Series {
    pub fn new(descriptor: RepoDescriptor, commits: Vec<CommitRecord>) -> Self {
        Self { descriptor, commits }
    }

    pub fn descriptor(&self) -> &RepoDescriptor {
        &self.descriptor
    }

    pub fn slug(&self) -> &str {
        &self.descriptor.slug
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn repo_url(&self) -> &str {
        &self.descriptor.repo_url
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn total_commits(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Sum of additions and deletions over every commit.
    pub fn modification_score(&self) -> u64 {
        saturating_sum(self.commits.iter().map(CommitRecord::changed_lines))
    }

    pub fn total_additions(&self) -> u64 {
        saturating_sum(self.commits.iter().map(|c| c.additions))
    }

    pub fn total_deletions(&self) -> u64 {
        saturating_sum(self.commits.iter().map(|c| c.deletions))
    }
}

pub fn saturating_sum(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeContribution {
    pub slug: String,
    pub name: String,
    pub additions: u64,
    pub deletions: u64,
    pub commits: usize,
}

/// Cross-series totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub start: NaiveDate,
    pub additions: u64,
    pub deletions: u64,
    pub contributions: Vec<CodeContribution>,
}

impl MonthBucket {
    pub fn net(&self) -> i128 {
        i128::from(self.additions) - i128::from(self.deletions)
    }

    pub fn commits(&self) -> usize {
        self.contributions.iter().map(|c| c.commits).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub earliest: DateTime<FixedOffset>,
    pub latest: DateTime<FixedOffset>,
}

/// Symmetric magnitude range `[-max, +max]`, `max` never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MagnitudeRange {
    max: u64,
}

impl MagnitudeRange {
    pub const FLOOR: u64 = 1;

    pub fn new(observed_max: u64) -> Self {
        Self {
            max: observed_max.max(Self::FLOOR),
        }
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn bounds(&self) -> (i64, i64) {
        let max = i64::try_from(self.max).unwrap_or(i64::MAX);
        (-max, max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub time: TimeRange,
    pub magnitude: MagnitudeRange,
}

// Forgejo API payloads. Every field is optional so a single odd record is
// reported by the normalizer instead of failing the whole page.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommit {
    pub sha: Option<String>,
    pub html_url: Option<String>,
    pub commit: Option<RawCommitMeta>,
    pub stats: Option<RawStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommitMeta {
    pub message: Option<String>,
    pub author: Option<RawSignature>,
    pub committer: Option<RawSignature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSignature {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStats {
    pub additions: Option<i64>,
    pub deletions: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

// Document written by `collect` and read back by the chart commands.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub metadata: DocumentMetadata,
    pub codes: Vec<CodeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub generated_at: DateTime<Utc>,
    pub earliest_commit: i64,
    pub latest_commit: i64,
    pub total_codes: usize,
    pub total_commits: usize,
    pub max_additions: u64,
    pub max_deletions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeEntry {
    pub name: String,
    pub slug: String,
    pub repo_url: String,
    pub total_commits: usize,
    pub commits: Vec<CommitEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub ts: i64,
    /// Source timestamp with its offset; months are read from it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub msg: String,
    pub add: u64,
    pub del: u64,
    pub url: String,
}
