// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fold commit history plus per-commit stat text into per-contributor totals
// role: aggregation/contributors
// inputs: Ordered CommitRecord history; a StatFetcher
// outputs: ContributorStats sorted by commit_count descending, ties in first-seen order
// invariants:
// - Every history entry counts toward commit_count and commit_hashes, fetched or not
// - A failed fetch contributes zero insertions/deletions and never aborts the fold
// errors: Fetch failures are logged and swallowed per commit
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use crate::gitio::StatFetcher;
use crate::model::{CommitRecord, ContributorStats, StatTotals};
use crate::parallel::map_ordered;
use crate::summary::parse_stat_totals;
use crate::util::short_sha;

pub fn aggregate_contributors<F: StatFetcher>(history: &[CommitRecord], fetcher: &F) -> Vec<ContributorStats> {
  aggregate_contributors_with(history, fetcher, 1)
}

/// Like `aggregate_contributors`, fetching up to `jobs` stats concurrently.
pub fn aggregate_contributors_with<F: StatFetcher>(
  history: &[CommitRecord],
  fetcher: &F,
  jobs: usize,
) -> Vec<ContributorStats> {
  let totals: Vec<StatTotals> = map_ordered(history, jobs, |record| match fetcher.fetch_stat(&record.hash) {
    Ok(text) => parse_stat_totals(&text),
    Err(e) => {
      tracing::warn!(commit = %short_sha(&record.hash), error = %e, "stat fetch failed; counting commit with zero lines");
      StatTotals::default()
    }
  });

  fold(history.iter().zip(totals))
}

fn fold<'a>(entries: impl Iterator<Item = (&'a CommitRecord, StatTotals)>) -> Vec<ContributorStats> {
  let mut order: Vec<ContributorStats> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for (record, totals) in entries {
    let slot = *index.entry(record.author_name.clone()).or_insert_with(|| {
      order.push(ContributorStats::new(record.author_name.clone()));
      order.len() - 1
    });
    let c = &mut order[slot];
    c.commit_count += 1;
    c.total_insertions += totals.insertions;
    c.total_deletions += totals.deletions;
    c.commit_hashes.push(record.hash.clone());
  }

  // sort_by is stable, so equal counts keep first-seen order
  order.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));
  order
}
