//! Property tests for the aggregation pipeline.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use codes_timeline::dataset::Dataset;
use codes_timeline::model::{CommitRecord, RawCommit, RepoDescriptor, Series};
use codes_timeline::monthly::aggregate_monthly;
use codes_timeline::normalize::normalize;
use codes_timeline::scale::{global_domain, local_domain, ValueMode};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Seconds between 1800-01-01 and 3000-01-01, covering symbolic dates.
fn timestamp_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (-5_364_662_400i64..32_503_680_000i64, -12i32..=14i32).prop_map(|(secs, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        offset.from_utc_datetime(&DateTime::<Utc>::from_timestamp(secs, 0).unwrap().naive_utc())
    })
}

fn record_strategy() -> impl Strategy<Value = CommitRecord> {
    ("[a-f0-9]{40}", timestamp_strategy(), 0u64..100_000, 0u64..100_000).prop_map(
        |(sha, timestamp, additions, deletions)| CommitRecord {
            commit_url: format!("https://git.example/commit/{sha}"),
            sha,
            timestamp,
            message: String::new(),
            additions,
            deletions,
        },
    )
}

fn series_strategy() -> impl Strategy<Value = Vec<Series>> {
    prop::collection::vec(prop::collection::vec(record_strategy(), 0..20), 1..6).prop_map(|all| {
        all.into_iter()
            .enumerate()
            .map(|(i, commits)| {
                Series::new(
                    RepoDescriptor {
                        slug: format!("code_{i}"),
                        name: format!("Code {i}"),
                        repo_url: String::new(),
                    },
                    commits,
                )
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Normalized counts are never negative; absent stats give zero.
    #[test]
    fn normalized_counts_non_negative(add in proptest::option::of(any::<i64>()), del in proptest::option::of(any::<i64>())) {
        let raw: RawCommit = serde_json::from_value(serde_json::json!({
            "sha": "abc",
            "commit": { "author": { "date": "2020-01-01T00:00:00Z" } },
            "stats": { "additions": add, "deletions": del }
        })).unwrap();
        let record = normalize(&raw).unwrap();
        prop_assert_eq!(record.additions, add.map(|n| n.max(0) as u64).unwrap_or(0));
        prop_assert_eq!(record.deletions, del.map(|n| n.max(0) as u64).unwrap_or(0));
    }

    /// Normalizing never panics on arbitrary date strings.
    #[test]
    fn normalize_does_not_panic(date in ".*") {
        let raw: RawCommit = serde_json::from_value(serde_json::json!({
            "sha": "abc",
            "commit": { "author": { "date": date } }
        })).unwrap();
        let _ = normalize(&raw);
    }

    /// Shuffling commits does not change the modification score.
    #[test]
    fn score_is_order_independent(records in prop::collection::vec(record_strategy(), 0..30), seed in any::<u64>()) {
        let descriptor = RepoDescriptor { slug: "s".into(), name: "S".into(), repo_url: String::new() };
        let mut shuffled = records.clone();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        let a = Series::new(descriptor.clone(), records);
        let b = Series::new(descriptor, shuffled);
        prop_assert_eq!(a.modification_score(), b.modification_score());
    }

    /// The global magnitude is max(max additions, max deletions, 1).
    #[test]
    fn global_magnitude_matches_formula(series in series_strategy()) {
        let records: Vec<&CommitRecord> = series.iter().flat_map(|s| s.commits().iter()).collect();
        let domain = global_domain(&series, ValueMode::Gross);
        if records.is_empty() {
            prop_assert!(domain.is_none());
        } else {
            let expected = records
                .iter()
                .map(|r| r.additions.max(r.deletions))
                .max()
                .unwrap_or(0)
                .max(1);
            let domain = domain.unwrap();
            prop_assert_eq!(domain.magnitude.max(), expected);
            prop_assert!(records.iter().all(|r| r.timestamp >= domain.time.earliest && r.timestamp <= domain.time.latest));
        }
    }

    /// Monthly sums depend only on the multiset of records.
    #[test]
    fn aggregation_is_order_independent(series in series_strategy()) {
        let forward = aggregate_monthly(&series);

        let reversed: Vec<Series> = series
            .iter()
            .rev()
            .map(|s| {
                let mut commits = s.commits().to_vec();
                commits.reverse();
                Series::new(s.descriptor().clone(), commits)
            })
            .collect();
        let backward = aggregate_monthly(&reversed);

        prop_assert_eq!(&forward, &backward);
        prop_assert!(forward.windows(2).all(|w| w[0].start < w[1].start));
        let total: u64 = forward.iter().map(|b| b.additions).sum();
        let expected: u64 = series.iter().map(|s| s.total_additions()).sum();
        prop_assert_eq!(total, expected);
    }

    /// A series of no-op commits is drawn on [-1, 1].
    #[test]
    fn zero_series_floor(timestamps in prop::collection::vec(timestamp_strategy(), 1..10)) {
        let commits: Vec<CommitRecord> = timestamps
            .into_iter()
            .enumerate()
            .map(|(i, timestamp)| CommitRecord {
                sha: i.to_string(),
                timestamp,
                message: String::new(),
                additions: 0,
                deletions: 0,
                commit_url: String::new(),
            })
            .collect();
        let series = vec![Series::new(
            RepoDescriptor { slug: "noop".into(), name: "Noop".into(), repo_url: String::new() },
            commits,
        )];
        let global = global_domain(&series, ValueMode::Gross).unwrap();
        let local = local_domain(&series[0], &global.time, ValueMode::Gross);
        prop_assert_eq!(local.magnitude.bounds(), (-1, 1));
    }

    /// Assembly binds the same global domain the resolver computes.
    #[test]
    fn dataset_domain_is_global_domain(series in series_strategy()) {
        let expected = global_domain(&series, ValueMode::Gross);
        let generated = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let dataset = Dataset::assemble(series, generated).unwrap();
        prop_assert_eq!(dataset.global_domain(), expected.as_ref());
    }
}
