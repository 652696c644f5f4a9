use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::gitio::FetchTimeouts;
use crate::noise::DEFAULT_EXCLUDED_SEGMENT;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "git-contrib-stats",
    version,
    about = "Per-commit and per-contributor statistics from git output",
    long_about = None
)]
pub struct Cli {
  /// Path to a Git repository (default: current dir)
  #[arg(long, default_value = ".", conflicts_with = "clone")]
  pub repo: PathBuf,

  /// Clone this URL into a throwaway working copy instead of using --repo
  #[arg(long)]
  pub clone: Option<String>,

  /// Summarize a single commit (any revision git understands)
  #[arg(long)]
  pub commit: Option<String>,

  /// Summarize every commit in history
  #[arg(long)]
  pub summaries: bool,

  /// Aggregate commits, insertions and deletions per author
  #[arg(long)]
  pub contributors: bool,

  /// Emit per-file diff blocks with dependency-directory noise removed
  #[arg(long)]
  pub diffs: bool,

  /// Only walk the newest N commits
  #[arg(long)]
  pub max_count: Option<usize>,

  /// Path component whose files are dropped from --diffs output
  #[arg(long, default_value = DEFAULT_EXCLUDED_SEGMENT)]
  pub exclude_segment: String,

  /// Concurrent per-commit fetches (1 = sequential); output order is unaffected
  #[arg(long, default_value_t = 1)]
  pub jobs: usize,

  /// Timeout for stat-only git queries, in seconds
  #[arg(long, default_value_t = 10)]
  pub stat_timeout_secs: u64,

  /// Timeout for full diff queries and history listing, in seconds
  #[arg(long, default_value_t = 30)]
  pub detail_timeout_secs: u64,

  /// Timeout for --clone, in seconds
  #[arg(long, default_value_t = 300)]
  pub clone_timeout_secs: u64,

  /// Timezone for commit dates: local, utc, or an IANA name
  #[arg(long, default_value = "local")]
  pub tz: String,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Log git invocations and per-commit progress to stderr
  #[arg(short, long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
  Local { path: String },
  Clone { url: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
  Commit { rev: String },
  Summaries,
  Contributors,
  Diffs,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Timeouts {
  pub stat: Duration,
  pub detail: Duration,
  pub clone: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub source: Source,
  pub mode: Mode,
  pub max_count: Option<usize>,
  pub exclude_segment: String,
  pub jobs: usize,
  pub timeouts: Timeouts,
  pub tz: String,
  pub out: String,
  pub verbose: bool,
}

impl EffectiveConfig {
  pub fn fetch_timeouts(&self) -> FetchTimeouts {
    FetchTimeouts { stat: self.timeouts.stat, detail: self.timeouts.detail }
  }
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let mode = match (&cli.commit, cli.summaries, cli.contributors, cli.diffs) {
    (Some(rev), false, false, false) => Mode::Commit { rev: rev.clone() },
    (None, true, false, false) => Mode::Summaries,
    (None, false, true, false) => Mode::Contributors,
    (None, false, false, true) => Mode::Diffs,
    (None, false, false, false) => {
      bail!("Provide one of --commit <rev>, --summaries, --contributors, or --diffs")
    }
    _ => bail!("Ambiguous mode: choose only one of --commit | --summaries | --contributors | --diffs"),
  };

  if cli.exclude_segment.is_empty() || cli.exclude_segment.contains('/') {
    bail!("--exclude-segment must be a single non-empty path component");
  }

  let source = match cli.clone {
    Some(url) => Source::Clone { url },
    None => Source::Local { path: util::canonicalize_lossy(&cli.repo) },
  };

  for (name, secs) in [
    ("--stat-timeout-secs", cli.stat_timeout_secs),
    ("--detail-timeout-secs", cli.detail_timeout_secs),
    ("--clone-timeout-secs", cli.clone_timeout_secs),
  ] {
    if secs == 0 {
      bail!("{} must be at least 1", name);
    }
  }

  Ok(EffectiveConfig {
    source,
    mode,
    max_count: cli.max_count,
    exclude_segment: cli.exclude_segment,
    jobs: cli.jobs.max(1),
    timeouts: Timeouts {
      stat: Duration::from_secs(cli.stat_timeout_secs),
      detail: Duration::from_secs(cli.detail_timeout_secs),
      clone: Duration::from_secs(cli.clone_timeout_secs),
    },
    tz: cli.tz,
    out: cli.out,
    verbose: cli.verbose,
  })
}
