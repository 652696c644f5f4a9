// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Version-control command runner, history lister, and per-commit text fetchers
// role: git IO
// inputs: A GitRunner bound to a working copy; commit hashes; timeouts
// outputs: CommitRecord lists; raw stat / detail / patch text
// side_effects: Invokes git subprocesses through the runner
// invariants:
// - Stat fetches use the short timeout, detail and patch fetches the long one
// - Only git's formatted text output is consumed, never repository internals
// errors: FetchError per invocation; history listing wraps it with anyhow context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::FetchError;
use crate::model::CommitRecord;
use crate::util::run_git;

/// Runs git with a bounded wait and returns its stdout.
pub trait GitRunner: Sync {
  fn run(&self, args: &[String], timeout: Duration) -> Result<String, FetchError>;
}

/// The `git` binary, run inside a working copy.
#[derive(Debug, Clone)]
pub struct SystemGit {
  root: PathBuf,
}

impl SystemGit {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }
}

impl GitRunner for SystemGit {
  fn run(&self, args: &[String], timeout: Duration) -> Result<String, FetchError> {
    run_git(&self.root, args, timeout)
  }
}

/// Source of per-commit stat text (`git show --stat`).
pub trait StatFetcher: Sync {
  fn fetch_stat(&self, hash: &str) -> Result<String, FetchError>;
}

/// Source of the combined stat, numstat, name-status and patch text of one commit.
pub trait DetailFetcher: Sync {
  fn fetch_detail(&self, hash: &str) -> Result<String, FetchError>;
}

/// Source of one commit's unified patch.
pub trait PatchFetcher: Sync {
  fn fetch_patch(&self, hash: &str) -> Result<String, FetchError>;
}

impl<F> StatFetcher for F
where
  F: Fn(&str) -> Result<String, FetchError> + Sync,
{
  fn fetch_stat(&self, hash: &str) -> Result<String, FetchError> {
    self(hash)
  }
}

impl<F> DetailFetcher for F
where
  F: Fn(&str) -> Result<String, FetchError> + Sync,
{
  fn fetch_detail(&self, hash: &str) -> Result<String, FetchError> {
    self(hash)
  }
}

impl<F> PatchFetcher for F
where
  F: Fn(&str) -> Result<String, FetchError> + Sync,
{
  fn fetch_patch(&self, hash: &str) -> Result<String, FetchError> {
    self(hash)
  }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchTimeouts {
  pub stat: Duration,
  pub detail: Duration,
}

impl Default for FetchTimeouts {
  fn default() -> Self {
    Self { stat: Duration::from_secs(10), detail: Duration::from_secs(30) }
  }
}

/// Fetches per-commit text through a `GitRunner`.
pub struct GitFetcher<'a, R: GitRunner> {
  runner: &'a R,
  timeouts: FetchTimeouts,
}

impl<'a, R: GitRunner> GitFetcher<'a, R> {
  pub fn new(runner: &'a R, timeouts: FetchTimeouts) -> Self {
    Self { runner, timeouts }
  }

  fn show(&self, flags: &[&str], hash: &str, timeout: Duration) -> Result<String, FetchError> {
    let mut args: Vec<String> = vec!["show".into(), "--format=".into(), "--no-color".into()];
    args.extend(flags.iter().map(|f| f.to_string()));
    args.push(hash.to_string());
    self.runner.run(&args, timeout)
  }
}

impl<R: GitRunner> StatFetcher for GitFetcher<'_, R> {
  fn fetch_stat(&self, hash: &str) -> Result<String, FetchError> {
    self.show(&["--stat"], hash, self.timeouts.stat)
  }
}

impl<R: GitRunner> DetailFetcher for GitFetcher<'_, R> {
  fn fetch_detail(&self, hash: &str) -> Result<String, FetchError> {
    // git refuses --name-status alongside --patch, so three invocations are joined
    let stats = self.show(&["--stat", "--numstat", "-M"], hash, self.timeouts.stat)?;
    let names = self.show(&["--name-status", "-M"], hash, self.timeouts.stat)?;
    let patch = self.show(&["--patch", "-M"], hash, self.timeouts.detail)?;
    Ok(format!("{}\n{}\n{}", stats.trim_end(), names.trim_end(), patch))
  }
}

impl<R: GitRunner> PatchFetcher for GitFetcher<'_, R> {
  fn fetch_patch(&self, hash: &str) -> Result<String, FetchError> {
    self.show(&["--patch", "-M"], hash, self.timeouts.detail)
  }
}

/// List history of HEAD, newest first.
pub fn list_history<R: GitRunner>(runner: &R, max_count: Option<usize>, timeout: Duration) -> Result<Vec<CommitRecord>> {
  let mut args: Vec<String> = vec![
    "-c".into(),
    "log.showSignature=false".into(),
    "log".into(),
    "--no-color".into(),
    "--format=%H%x00%an%x00%at%x00%s".into(),
  ];
  if let Some(n) = max_count {
    args.push(format!("--max-count={}", n));
  }
  args.push("HEAD".into());

  let out = runner.run(&args, timeout).context("listing history")?;
  Ok(parse_history(&out))
}

/// Parse `%H%x00%an%x00%at%x00%s` lines; malformed lines are skipped.
pub fn parse_history(out: &str) -> Vec<CommitRecord> {
  out
    .lines()
    .filter_map(|line| {
      let parts: Vec<&str> = line.split('\u{0}').collect();
      let hash = parts.first().map(|s| s.trim()).filter(|s| !s.is_empty())?;
      let get = |i: usize| -> String { parts.get(i).copied().unwrap_or("").to_string() };
      Some(CommitRecord {
        hash: hash.to_string(),
        author_name: get(1),
        timestamp: get(2).trim().parse().unwrap_or(0),
        message: get(3),
      })
    })
    .collect()
}

/// Resolve a revision to its full hash.
pub fn resolve_rev<R: GitRunner>(runner: &R, rev: &str, timeout: Duration) -> Result<String> {
  let args: Vec<String> = vec!["rev-parse".into(), "--verify".into(), format!("{}^{{commit}}", rev)];
  let out = runner.run(&args, timeout).with_context(|| format!("resolving {}", rev))?;
  Ok(out.trim().to_string())
}

/// Read the history record of a single commit.
pub fn commit_record<R: GitRunner>(runner: &R, rev: &str, timeout: Duration) -> Result<CommitRecord> {
  let args: Vec<String> = vec![
    "show".into(),
    "--no-patch".into(),
    "--no-color".into(),
    "--format=%H%x00%an%x00%at%x00%s".into(),
    rev.into(),
  ];
  let out = runner.run(&args, timeout).with_context(|| format!("reading commit {}", rev))?;
  parse_history(&out).into_iter().next().with_context(|| format!("no commit found for {}", rev))
}
