// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate a run: check out the repository, walk history, build the requested report, write it
// role: processing/orchestrator
// inputs: EffectiveConfig (source, mode, limits, timeouts, jobs)
// outputs: SummariesReport | ContributorsReport | DiffsReport as pretty JSON on stdout or --out
// side_effects: Clones into temp dirs for --clone; runs git; writes the report
// invariants:
// - Output order equals history order regardless of --jobs
// - A failed per-commit fetch yields a placeholder entry, never a missing one
// - A missing checkout is a single error, not a partial report
// errors: Session and history errors propagate with context; per-commit fetch errors are recovered
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};

use crate::cli::{EffectiveConfig, Mode, Source};
use crate::contributors::aggregate_contributors_with;
use crate::gitio::{self, DetailFetcher, GitFetcher, PatchFetcher};
use crate::model::{CommitDiff, CommitRecord, CommitSummary, ContributorsReport, DiffsReport, SummariesReport};
use crate::noise::{filter_commit_diffs, split_file_blocks};
use crate::parallel::map_ordered;
use crate::session::{Session, Workspace};
use crate::summary::{summarize_commit_for, unavailable};
use crate::util::{self, short_sha};

/// One summary per history entry, in history order.
pub fn summarize_history<F: DetailFetcher>(
  history: &[CommitRecord],
  fetcher: &F,
  jobs: usize,
  tz: &str,
) -> Vec<CommitSummary> {
  map_ordered(history, jobs, |record| match fetcher.fetch_detail(&record.hash) {
    Ok(text) => summarize_commit_for(record, &text, tz),
    Err(e) => {
      tracing::warn!(commit = %short_sha(&record.hash), error = %e, "detail fetch failed; using placeholder");
      unavailable(record, &e.to_string(), tz)
    }
  })
}

/// Per-commit file blocks with `excluded_segment` noise removed.
pub fn collect_diffs<F: PatchFetcher>(
  history: &[CommitRecord],
  fetcher: &F,
  jobs: usize,
  excluded_segment: &str,
) -> Vec<CommitDiff> {
  let diffs = map_ordered(history, jobs, |record| {
    let (blocks, fetch_error) = match fetcher.fetch_patch(&record.hash) {
      Ok(text) => (split_file_blocks(&text), None),
      Err(e) => {
        tracing::warn!(commit = %short_sha(&record.hash), error = %e, "patch fetch failed; keeping empty entry");
        (Vec::new(), Some(e.to_string()))
      }
    };
    CommitDiff {
      commit: record.hash.clone(),
      author: record.author_name.clone(),
      message: record.message.clone(),
      blocks,
      fetch_error,
    }
  });
  filter_commit_diffs(diffs, excluded_segment)
}

fn checkout(cfg: &EffectiveConfig, workspace: &mut Workspace) -> Result<()> {
  match &cfg.source {
    Source::Local { path } => workspace
      .open(std::path::Path::new(path), cfg.timeouts.stat)
      .with_context(|| format!("opening {}", path))?,
    Source::Clone { url } => workspace
      .checkout(url, cfg.timeouts.clone)
      .with_context(|| format!("checking out {}", url))?,
  };
  Ok(())
}

fn history_for(cfg: &EffectiveConfig, session: &Session) -> Result<Vec<CommitRecord>> {
  match &cfg.mode {
    Mode::Commit { rev } => {
      let hash = gitio::resolve_rev(session.git(), rev, cfg.timeouts.stat)?;
      Ok(vec![gitio::commit_record(session.git(), &hash, cfg.timeouts.stat)?])
    }
    _ => gitio::list_history(session.git(), cfg.max_count, cfg.timeouts.detail),
  }
}

/// Build the report for `session` as JSON.
pub fn build_report(cfg: &EffectiveConfig, session: &Session) -> Result<serde_json::Value> {
  let history = history_for(cfg, session)?;
  tracing::info!(commits = history.len(), jobs = cfg.jobs, "walking history");

  let fetcher = GitFetcher::new(session.git(), cfg.fetch_timeouts());
  let repo = session.origin().to_string();
  let tz = cfg.tz.as_str();

  let value = match &cfg.mode {
    Mode::Commit { .. } | Mode::Summaries => {
      let commits = summarize_history(&history, &fetcher, cfg.jobs, tz);
      serde_json::to_value(SummariesReport { repo, count: commits.len(), commits })?
    }
    Mode::Contributors => {
      let contributors = aggregate_contributors_with(&history, &fetcher, cfg.jobs);
      serde_json::to_value(ContributorsReport { repo, commits_scanned: history.len(), contributors })?
    }
    Mode::Diffs => {
      let commits = collect_diffs(&history, &fetcher, cfg.jobs, &cfg.exclude_segment);
      serde_json::to_value(DiffsReport {
        repo,
        excluded_segment: cfg.exclude_segment.clone(),
        count: commits.len(),
        commits,
      })?
    }
  };
  Ok(value)
}

pub fn process(cfg: &EffectiveConfig) -> Result<()> {
  let mut workspace = Workspace::new();
  checkout(cfg, &mut workspace)?;

  let result = workspace
    .current()
    .map_err(anyhow::Error::from)
    .and_then(|session| build_report(cfg, session))
    .and_then(|report| util::write_report(&cfg.out, &report));

  workspace.delete();
  result
}
