//! Time and magnitude domains for charting.
//!
//! Every function here takes the view parameters explicitly; nothing reads
//! shared display state.

use crate::model::{CommitRecord, Domain, MagnitudeRange, Series, TimeRange};
use clap::ValueEnum;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleScope {
    /// One magnitude domain for every series
    #[default]
    Global,
    /// Magnitude domain computed per series
    PerSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueMode {
    /// Additions and deletions drawn separately
    #[default]
    Gross,
    /// Additions minus deletions
    Net,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayOrder {
    /// Order as stored in the dataset
    #[default]
    Source,
    /// Most changed code first
    #[value(name = "score")]
    ModificationScore,
    /// Alphabetical by display name
    Name,
}

impl DisplayOrder {
    pub fn compare(&self, a: &Series, b: &Series) -> Ordering {
        match self {
            DisplayOrder::Source => Ordering::Equal,
            DisplayOrder::ModificationScore => b.modification_score().cmp(&a.modification_score()),
            DisplayOrder::Name => a.name().cmp(b.name()),
        }
    }
}

/// Immutable view parameters handed to every recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ViewState {
    pub scope: ScaleScope,
    pub mode: ValueMode,
    pub order: DisplayOrder,
}

fn record_magnitude(record: &CommitRecord, mode: ValueMode) -> u64 {
    match mode {
        ValueMode::Gross => record.additions.max(record.deletions),
        ValueMode::Net => record.additions.abs_diff(record.deletions),
    }
}

pub fn magnitude_range<'a>(
    records: impl IntoIterator<Item = &'a CommitRecord>,
    mode: ValueMode,
) -> MagnitudeRange {
    let observed = records
        .into_iter()
        .map(|r| record_magnitude(r, mode))
        .max()
        .unwrap_or(0);
    MagnitudeRange::new(observed)
}

/// `None` when there are no records.
pub fn time_range<'a>(records: impl IntoIterator<Item = &'a CommitRecord>) -> Option<TimeRange> {
    let mut records = records.into_iter();
    let first = records.next()?.timestamp;
    let (earliest, latest) = records.fold((first, first), |(lo, hi), r| {
        (lo.min(r.timestamp), hi.max(r.timestamp))
    });
    Some(TimeRange { earliest, latest })
}

fn all_records(series: &[Series]) -> impl Iterator<Item = &CommitRecord> {
    series.iter().flat_map(|s| s.commits().iter())
}

/// Domain over every record of every series. `None` when the series hold no
/// commits at all; callers render a "no data" state instead.
pub fn global_domain(series: &[Series], mode: ValueMode) -> Option<Domain> {
    let time = time_range(all_records(series))?;
    Some(Domain {
        time,
        magnitude: magnitude_range(all_records(series), mode),
    })
}

/// Magnitude from the series alone; the time axis stays on the global range so
/// small multiples line up.
pub fn local_domain(series: &Series, global_time: &TimeRange, mode: ValueMode) -> Domain {
    Domain {
        time: global_time.clone(),
        magnitude: magnitude_range(series.commits(), mode),
    }
}

/// Domain to draw `target` with under `view`. `global` must have been
/// computed with `view.mode`.
pub fn resolve(global: &Domain, target: &Series, view: &ViewState) -> Domain {
    match view.scope {
        ScaleScope::Global => global.clone(),
        ScaleScope::PerSeries => local_domain(target, &global.time, view.mode),
    }
}

/// Series worth charting, in display order. Empty series are left out; the
/// slice itself is not reordered.
pub fn renderable(series: &[Series], order: DisplayOrder) -> Vec<&Series> {
    let mut visible: Vec<&Series> = series.iter().filter(|s| !s.is_empty()).collect();
    visible.sort_by(|a, b| order.compare(a, b));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepoDescriptor;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn record(date: &str, additions: u64, deletions: u64) -> CommitRecord {
        CommitRecord {
            sha: format!("{date}-{additions}-{deletions}"),
            timestamp: DateTime::parse_from_rfc3339(&format!("{date}T00:00:00Z")).unwrap(),
            message: String::new(),
            additions,
            deletions,
            commit_url: String::new(),
        }
    }

    fn series(slug: &str, commits: Vec<CommitRecord>) -> Series {
        Series::new(
            RepoDescriptor {
                slug: slug.to_string(),
                name: slug.to_uppercase(),
                repo_url: String::new(),
            },
            commits,
        )
    }

    #[test]
    fn global_domain_spans_all_series() {
        let all = vec![
            series("s1", vec![record("2020-01-01", 10, 2)]),
            series("s2", vec![record("2021-06-01", 3, 30)]),
        ];
        let domain = global_domain(&all, ValueMode::Gross).unwrap();
        assert_eq!(domain.time.earliest.to_rfc3339(), "2020-01-01T00:00:00+00:00");
        assert_eq!(domain.time.latest.to_rfc3339(), "2021-06-01T00:00:00+00:00");
        assert_eq!(domain.magnitude.bounds(), (-30, 30));
    }

    #[test]
    fn no_records_means_no_domain() {
        let all = vec![series("empty", vec![])];
        assert_eq!(global_domain(&all, ValueMode::Gross), None);
        assert_eq!(global_domain(&[], ValueMode::Gross), None);
    }

    #[test]
    fn all_zero_series_is_floored() {
        let all = vec![
            series("busy", vec![record("2020-01-01", 50, 0)]),
            series("noop", vec![record("2020-03-01", 0, 0), record("2020-04-01", 0, 0)]),
        ];
        let global = global_domain(&all, ValueMode::Gross).unwrap();
        let local = local_domain(&all[1], &global.time, ValueMode::Gross);
        assert_eq!(local.magnitude.bounds(), (-1, 1));
        assert_eq!(local.time, global.time);
    }

    #[test]
    fn per_series_scope_uses_global_time() {
        let all = vec![
            series("a", vec![record("2001-01-01", 5, 1)]),
            series("b", vec![record("2015-01-01", 1, 400)]),
        ];
        let view = ViewState {
            scope: ScaleScope::PerSeries,
            ..ViewState::default()
        };
        let global = global_domain(&all, view.mode).unwrap();
        let domain = resolve(&global, &all[0], &view);
        assert_eq!(domain.magnitude.max(), 5);
        assert_eq!(domain.time.latest.to_rfc3339(), "2015-01-01T00:00:00+00:00");

        let shared = resolve(&global, &all[0], &ViewState::default());
        assert_eq!(shared.magnitude.max(), 400);
    }

    #[test]
    fn net_mode_uses_difference() {
        let records = vec![record("2020-01-01", 10, 8), record("2020-01-02", 1, 4)];
        assert_eq!(magnitude_range(&records, ValueMode::Net).max(), 3);
        assert_eq!(magnitude_range(&records, ValueMode::Gross).max(), 10);
        let balanced = vec![record("2020-01-01", 7, 7)];
        assert_eq!(magnitude_range(&balanced, ValueMode::Net).max(), 1);
    }

    #[test]
    fn time_range_tolerates_out_of_order_and_duplicates() {
        let records = vec![
            record("2999-01-01", 0, 0),
            record("2020-01-01", 0, 0),
            record("2020-01-01", 0, 0),
            record("1900-01-01", 0, 0),
        ];
        let range = time_range(&records).unwrap();
        assert_eq!(range.earliest.to_rfc3339(), "1900-01-01T00:00:00+00:00");
        assert_eq!(range.latest.to_rfc3339(), "2999-01-01T00:00:00+00:00");
    }

    #[test]
    fn renderable_orders_without_touching_storage() {
        let all = vec![
            series("small", vec![record("2020-01-01", 1, 1)]),
            series("empty", vec![]),
            series("large", vec![record("2020-01-01", 100, 20)]),
        ];
        let by_score: Vec<_> = renderable(&all, DisplayOrder::ModificationScore)
            .into_iter()
            .map(Series::slug)
            .collect();
        assert_eq!(by_score, vec!["large", "small"]);

        let source: Vec<_> = renderable(&all, DisplayOrder::Source)
            .into_iter()
            .map(Series::slug)
            .collect();
        assert_eq!(source, vec!["small", "large"]);
        assert_eq!(all[1].slug(), "empty");
    }
}
