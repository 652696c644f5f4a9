// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model (commit records, summaries, file changes, contributors, diff blocks)
// role: model/types
// outputs: Serializable structs with stable field names; optional fields skipped when absent
// invariants:
// - files_changed and file_changes.len() come from independent sources and may disagree
// - FileChange.path equals the destination path for renames
// - ContributorStats is keyed by display name only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Extension bucket for file names without a `.`.
pub const NO_EXTENSION: &str = "no-extension";

/// One entry of the history lister's output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitRecord {
  pub hash: String,
  pub author_name: String,
  /// First line of the commit message.
  pub message: String,
  /// Author time, unix seconds.
  pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangeStatus {
  Added,
  Modified,
  Deleted,
  Renamed { from: String, to: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileChange {
  pub path: String,
  pub insertions: u64,
  pub deletions: u64,
  pub status: ChangeStatus,
  pub binary: bool,
}

impl FileChange {
  pub fn volume(&self) -> u64 {
    self.insertions + self.deletions
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TopFile {
  pub path: String,
  pub changes: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ExtensionStats {
  pub files: u64,
  pub insertions: u64,
  pub deletions: u64,
}

/// Overall numbers from a stat table's summary line.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatTotals {
  pub files_changed: u64,
  pub insertions: u64,
  pub deletions: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
  pub commit: String,
  pub author: String,
  pub message: String,
  pub date: String,
  pub files_changed: u64,
  pub insertions: u64,
  pub deletions: u64,
  pub top_files: Vec<TopFile>,
  pub file_changes: Vec<FileChange>,
  pub by_extension: BTreeMap<String, ExtensionStats>,
  pub diff_lines: Vec<String>,
  pub diff_truncated: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fetch_error: Option<String>,
}

impl CommitSummary {
  pub fn totals(&self) -> StatTotals {
    StatTotals {
      files_changed: self.files_changed,
      insertions: self.insertions,
      deletions: self.deletions,
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContributorStats {
  pub username: String,
  pub commit_count: u64,
  pub total_insertions: u64,
  pub total_deletions: u64,
  pub commit_hashes: Vec<String>,
}

impl ContributorStats {
  pub fn new(username: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      commit_count: 0,
      total_insertions: 0,
      total_deletions: 0,
      commit_hashes: Vec::new(),
    }
  }
}

/// One `diff --git` block of a unified diff. `/dev/null` sides are `None`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileBlock {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub old_path: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub new_path: Option<String>,
  pub lines: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitDiff {
  pub commit: String,
  pub author: String,
  pub message: String,
  pub blocks: Vec<FileBlock>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fetch_error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummariesReport {
  pub repo: String,
  pub count: usize,
  pub commits: Vec<CommitSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContributorsReport {
  pub repo: String,
  pub commits_scanned: usize,
  pub contributors: Vec<ContributorStats>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiffsReport {
  pub repo: String,
  pub excluded_segment: String,
  pub count: usize,
  pub commits: Vec<CommitDiff>,
}
