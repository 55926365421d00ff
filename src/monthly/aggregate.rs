use crate::model::{CodeContribution, MonthBucket, Series};
use crate::util::month_start;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Default)]
struct CodeAccum {
    name: String,
    additions: u64,
    deletions: u64,
    commits: usize,
}

#[derive(Default)]
struct MonthAccum {
    additions: u64,
    deletions: u64,
    codes: BTreeMap<String, CodeAccum>,
}

/// Sum additions and deletions per calendar month across every series.
///
/// Buckets come out sorted by month start. The result only depends on the
/// multiset of records, not on the order they are visited in.
pub fn aggregate_monthly(series: &[Series]) -> Vec<MonthBucket> {
    let mut months: BTreeMap<NaiveDate, MonthAccum> = BTreeMap::new();

    for s in series {
        for commit in s.commits() {
            let month = months.entry(month_start(&commit.timestamp)).or_default();
            month.additions = month.additions.saturating_add(commit.additions);
            month.deletions = month.deletions.saturating_add(commit.deletions);

            let code = month
                .codes
                .entry(s.slug().to_string())
                .or_insert_with(|| CodeAccum {
                    name: s.name().to_string(),
                    ..CodeAccum::default()
                });
            code.additions = code.additions.saturating_add(commit.additions);
            code.deletions = code.deletions.saturating_add(commit.deletions);
            code.commits += 1;
        }
    }

    months
        .into_iter()
        .map(|(start, MonthAccum { additions, deletions, codes })| {
            let mut contributions: Vec<CodeContribution> = codes
                .into_iter()
                .map(|(slug, code)| CodeContribution {
                    slug,
                    name: code.name,
                    additions: code.additions,
                    deletions: code.deletions,
                    commits: code.commits,
                })
                .collect();
            // slug order from the map breaks ties
            contributions.sort_by(|a, b| {
                let changed = |c: &CodeContribution| c.additions.saturating_add(c.deletions);
                changed(b).cmp(&changed(a))
            });

            MonthBucket {
                start,
                additions,
                deletions,
                contributions,
            }
        })
        .collect()
}
