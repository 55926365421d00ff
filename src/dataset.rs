//! The assembled dataset and its JSON document form.

use crate::error::{CodesError, Result};
use crate::model::{
    CodeEntry, CommitEntry, CommitRecord, DatasetDocument, Domain, DocumentMetadata,
    RepoDescriptor, Series,
};
use crate::scale::{global_domain, ValueMode};
use crate::util::{short_sha, title};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Immutable once assembled. Display changes are recomputed from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    generated_at: DateTime<Utc>,
    global_domain: Option<Domain>,
    series: Vec<Series>,
}

impl Dataset {
    /// Bind series and collection time. Fails on zero series; series without
    /// commits are fine and kept.
    pub fn assemble(series: Vec<Series>, generated_at: DateTime<Utc>) -> Result<Self> {
        if series.is_empty() {
            return Err(CodesError::EmptyDataset);
        }
        let global_domain = global_domain(&series, ValueMode::Gross);
        debug!(
            series = series.len(),
            has_domain = global_domain.is_some(),
            "dataset assembled"
        );
        Ok(Self {
            generated_at,
            global_domain,
            series,
        })
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// `None` when no series holds a commit.
    pub fn global_domain(&self) -> Option<&Domain> {
        self.global_domain.as_ref()
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn total_codes(&self) -> usize {
        self.series.len()
    }

    pub fn total_commits(&self) -> usize {
        self.series.iter().map(Series::total_commits).sum()
    }

    pub fn max_additions(&self) -> u64 {
        self.records().map(|c| c.additions).max().unwrap_or(0)
    }

    pub fn max_deletions(&self) -> u64 {
        self.records().map(|c| c.deletions).max().unwrap_or(0)
    }

    fn records(&self) -> impl Iterator<Item = &CommitRecord> {
        self.series.iter().flat_map(|s| s.commits().iter())
    }

    /// Wire form. Codes are sorted by display name; stored order is untouched.
    pub fn to_document(&self) -> DatasetDocument {
        let (earliest_commit, latest_commit) = self
            .global_domain
            .as_ref()
            .map(|d| (d.time.earliest.timestamp_millis(), d.time.latest.timestamp_millis()))
            .unwrap_or((0, 0));

        let mut codes: Vec<CodeEntry> = self.series.iter().map(code_entry).collect();
        codes.sort_by(|a, b| a.name.cmp(&b.name));

        DatasetDocument {
            metadata: DocumentMetadata {
                generated_at: self.generated_at,
                earliest_commit,
                latest_commit,
                total_codes: self.total_codes(),
                total_commits: self.total_commits(),
                max_additions: self.max_additions(),
                max_deletions: self.max_deletions(),
            },
            codes,
        }
    }

    /// Rebuild from a document. Totals are recomputed, not trusted.
    pub fn from_document(document: DatasetDocument) -> Result<Self> {
        let mut series = Vec::with_capacity(document.codes.len());
        for code in document.codes {
            let commits = code
                .commits
                .into_iter()
                .map(|c| commit_record(&code.slug, c))
                .collect::<Result<Vec<_>>>()?;
            series.push(Series::new(
                RepoDescriptor {
                    slug: code.slug,
                    name: code.name,
                    repo_url: code.repo_url,
                },
                commits,
            ));
        }

        let dataset = Self::assemble(series, document.metadata.generated_at)?;
        if dataset.total_commits() != document.metadata.total_commits {
            warn!(
                declared = document.metadata.total_commits,
                actual = dataset.total_commits(),
                "document metadata disagrees with its commits"
            );
        }
        Ok(dataset)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let document: DatasetDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Write the compact document, creating parent directories. Returns the
    /// file size in bytes.
    pub fn write(&self, path: &Path) -> Result<u64> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.to_document())?;
        writer.flush()?;
        Ok(fs::metadata(path)?.len())
    }
}

fn code_entry(series: &Series) -> CodeEntry {
    CodeEntry {
        name: series.name().to_string(),
        slug: series.slug().to_string(),
        repo_url: series.repo_url().to_string(),
        total_commits: series.total_commits(),
        commits: series
            .commits()
            .iter()
            .map(|c| CommitEntry {
                sha: short_sha(&c.sha),
                ts: c.epoch_millis(),
                date: Some(c.timestamp.to_rfc3339()),
                msg: title(&c.message),
                add: c.additions,
                del: c.deletions,
                url: c.commit_url.clone(),
            })
            .collect(),
    }
}

/// Prefers the offset-carrying `date`; documents without it fall back to `ts`
/// read at UTC.
fn commit_record(slug: &str, entry: CommitEntry) -> Result<CommitRecord> {
    let malformed = |reason: String| CodesError::MalformedInput {
        repo: slug.to_string(),
        sha: entry.sha.clone(),
        reason,
    };
    let timestamp = match entry.date.as_deref() {
        Some(date) => DateTime::parse_from_rfc3339(date)
            .map_err(|e| malformed(format!("invalid date '{date}': {e}")))?,
        None => DateTime::<Utc>::from_timestamp_millis(entry.ts)
            .ok_or_else(|| malformed(format!("timestamp {} out of range", entry.ts)))?
            .fixed_offset(),
    };
    Ok(CommitRecord {
        sha: entry.sha,
        timestamp,
        message: entry.msg,
        additions: entry.add,
        deletions: entry.del,
        commit_url: entry.url,
    })
}
