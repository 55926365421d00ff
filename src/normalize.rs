//! Raw API commit entries to [`CommitRecord`]s.

use crate::error::{CodesError, Result};
use crate::model::{CommitRecord, RawCommit, RawStats};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalize one raw commit.
///
/// Missing stats count as zero changes. A missing sha or a timestamp that
/// cannot be parsed is a `MalformedInput`; the repository is left empty and
/// filled in by the series builder.
pub fn normalize(raw: &RawCommit) -> Result<CommitRecord> {
    let sha = raw
        .sha
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed("<unknown>", "missing sha"))?;

    let meta = raw.commit.as_ref();
    let date = meta
        .and_then(|m| {
            m.author
                .as_ref()
                .and_then(|a| a.date.as_deref())
                .or_else(|| m.committer.as_ref().and_then(|c| c.date.as_deref()))
        })
        .ok_or_else(|| malformed(sha, "missing commit date"))?;

    let timestamp = parse_timestamp(date).map_err(|reason| malformed(sha, &reason))?;
    let (additions, deletions) = raw.stats.as_ref().map(counts).unwrap_or((0, 0));

    Ok(CommitRecord {
        sha: sha.to_string(),
        timestamp,
        message: meta.and_then(|m| m.message.clone()).unwrap_or_default(),
        additions,
        deletions,
        commit_url: raw.html_url.clone().unwrap_or_default(),
    })
}

/// RFC 3339 first, then naive date-times and bare dates read at offset +00:00.
pub fn parse_timestamp(input: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty timestamp".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    Err(format!("unparseable timestamp '{input}'"))
}

fn counts(stats: &RawStats) -> (u64, u64) {
    let clamp = |v: Option<i64>| v.map(|n| n.max(0) as u64).unwrap_or(0);
    (clamp(stats.additions), clamp(stats.deletions))
}

fn malformed(sha: &str, reason: &str) -> CodesError {
    CodesError::MalformedInput {
        repo: String::new(),
        sha: sha.to_string(),
        reason: reason.to_string(),
    }
}
