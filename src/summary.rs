// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build a CommitSummary from the combined text of one commit (stat, numstat, name-status, patch)
// role: parsing/commit summary
// inputs: Raw git show text; optionally the CommitRecord supplying identity
// outputs: CommitSummary; StatTotals; rendered summary line
// invariants:
// - Retained diff lines never exceed MAX_DIFF_LINES, plus at most one truncation marker
// - The explicit summary line wins over standalone insertion/deletion phrases
// - An empty retained body is replaced by a single placeholder line
// errors: None; malformed lines are ignored and counters stay at their defaults
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, HashMap};

use crate::classify::{scan_change_phrases, LineClassifier, LineKind, StatusLetter};
use crate::model::{
  ChangeStatus, CommitRecord, CommitSummary, ExtensionStats, FileChange, StatTotals, TopFile, NO_EXTENSION,
};
use crate::util::iso_in_tz;

pub const MAX_DIFF_LINES: usize = 200;
pub const MAX_TOP_FILES: usize = 3;
pub const DIFF_TRUNCATED_MARKER: &str = "... diff truncated ...";
pub const NO_DIFF_PLACEHOLDER: &str = "(no textual diff: binary or empty change)";

#[derive(Debug, Clone, Copy, Default)]
struct NumstatEntry {
  insertions: u64,
  deletions: u64,
  binary: bool,
}

enum NameStatus {
  Plain(StatusLetter, String),
  Rename { from: String, to: String },
}

#[derive(Default)]
struct Header {
  commit: String,
  author: String,
  date: String,
  message: String,
}

/// Summarize a commit from raw `git show` text. A leading default-format
/// header (`commit`, `Author:`, `Date:`, indented message) supplies identity.
pub fn summarize_commit(raw: &str) -> CommitSummary {
  let lines: Vec<&str> = raw.lines().collect();
  let (header, rest) = split_header(&lines);
  let mut summary = summarize_lines(rest);
  summary.commit = header.commit;
  summary.author = header.author;
  summary.date = header.date;
  summary.message = header.message;
  summary
}

/// Summarize a commit whose identity is already known from history.
pub fn summarize_commit_for(record: &CommitRecord, raw: &str, tz: &str) -> CommitSummary {
  let lines: Vec<&str> = raw.lines().collect();
  let (_, rest) = split_header(&lines);
  let mut summary = summarize_lines(rest);
  fill_identity(&mut summary, record, tz);
  summary
}

/// Zeroed stand-in for a commit whose detail could not be fetched.
pub fn unavailable(record: &CommitRecord, reason: &str, tz: &str) -> CommitSummary {
  let mut summary = CommitSummary {
    diff_lines: vec![format!("(diff unavailable: {})", reason)],
    fetch_error: Some(reason.to_string()),
    ..CommitSummary::default()
  };
  fill_identity(&mut summary, record, tz);
  summary
}

fn fill_identity(summary: &mut CommitSummary, record: &CommitRecord, tz: &str) {
  summary.commit = record.hash.clone();
  summary.author = record.author_name.clone();
  summary.message = record.message.clone();
  summary.date = iso_in_tz(record.timestamp, tz);
}

/// Extract overall totals from stat text using the same rules as `summarize_commit`.
pub fn parse_stat_totals(raw: &str) -> StatTotals {
  let mut totals = StatTotals::default();
  let mut matched_summary = false;
  let mut phrases: (Option<u64>, Option<u64>) = (None, None);
  let mut classifier = LineClassifier::new();

  for line in raw.lines() {
    match classifier.classify(line) {
      LineKind::Summary { files_changed, insertions, deletions } => {
        apply_summary(&mut totals, files_changed, insertions, deletions);
        matched_summary = true;
      }
      LineKind::Unrecognized(l) if !matched_summary && !classifier.in_patch() => note_phrases(&mut phrases, l),
      _ => {}
    }
  }

  if !matched_summary {
    apply_phrases(&mut totals, phrases);
  }
  totals
}

/// Render totals as git's stat summary line.
pub fn format_summary_line(totals: &StatTotals) -> String {
  let mut line = format!(
    "{} {} changed",
    totals.files_changed,
    if totals.files_changed == 1 { "file" } else { "files" }
  );
  if totals.insertions > 0 || totals.deletions == 0 {
    line.push_str(&format!(
      ", {} {}(+)",
      totals.insertions,
      if totals.insertions == 1 { "insertion" } else { "insertions" }
    ));
  }
  if totals.deletions > 0 || totals.insertions == 0 {
    line.push_str(&format!(
      ", {} {}(-)",
      totals.deletions,
      if totals.deletions == 1 { "deletion" } else { "deletions" }
    ));
  }
  line
}

pub fn extension_of(path: &str) -> &str {
  let name = path.rsplit('/').next().unwrap_or(path);
  match name.rsplit_once('.') {
    Some((_, ext)) if !ext.is_empty() => ext,
    _ => NO_EXTENSION,
  }
}

fn summarize_lines(lines: &[&str]) -> CommitSummary {
  let mut totals = StatTotals::default();
  let mut matched_summary = false;
  let mut phrases: (Option<u64>, Option<u64>) = (None, None);
  let mut stat_rows: Vec<TopFile> = Vec::new();
  let mut numstat: HashMap<String, NumstatEntry> = HashMap::new();
  let mut name_status: Vec<NameStatus> = Vec::new();
  let mut diff_lines: Vec<String> = Vec::new();
  let mut diff_truncated = false;
  let mut classifier = LineClassifier::new();

  for line in lines {
    match classifier.classify(line) {
      LineKind::Summary { files_changed, insertions, deletions } => {
        apply_summary(&mut totals, files_changed, insertions, deletions);
        matched_summary = true;
      }
      LineKind::StatRow { path, changes } => match stat_rows.iter_mut().find(|t| t.path == path) {
        Some(existing) => existing.changes += changes,
        None => stat_rows.push(TopFile { path, changes }),
      },
      LineKind::NumstatRow { path, insertions, deletions } => {
        numstat.insert(
          path,
          NumstatEntry {
            insertions: insertions.unwrap_or(0),
            deletions: deletions.unwrap_or(0),
            binary: insertions.is_none() || deletions.is_none(),
          },
        );
      }
      LineKind::RenameRow { from, to, .. } => name_status.push(NameStatus::Rename {
        from: from.to_string(),
        to: to.to_string(),
      }),
      LineKind::NameStatusRow { status, path } => name_status.push(NameStatus::Plain(status, path.to_string())),
      LineKind::DiffBodyRow(body) => {
        if diff_truncated {
          continue;
        }
        if diff_lines.len() < MAX_DIFF_LINES {
          diff_lines.push(body.to_string());
        } else {
          diff_lines.push(DIFF_TRUNCATED_MARKER.to_string());
          diff_truncated = true;
        }
      }
      LineKind::Unrecognized(l) => {
        if !matched_summary && !classifier.in_patch() {
          note_phrases(&mut phrases, l);
        }
      }
    }
  }

  if !matched_summary {
    apply_phrases(&mut totals, phrases);
  }

  let file_changes: Vec<FileChange> = name_status.into_iter().map(|ns| build_file_change(ns, &numstat)).collect();

  let top_files = if file_changes.is_empty() {
    top_n(stat_rows)
  } else {
    top_n(
      file_changes
        .iter()
        .map(|fc| TopFile { path: fc.path.clone(), changes: fc.volume() })
        .collect(),
    )
  };

  if diff_lines.is_empty() {
    diff_lines.push(NO_DIFF_PLACEHOLDER.to_string());
  }

  CommitSummary {
    files_changed: totals.files_changed,
    insertions: totals.insertions,
    deletions: totals.deletions,
    top_files,
    by_extension: aggregate_extensions(&file_changes),
    file_changes,
    diff_lines,
    diff_truncated,
    ..CommitSummary::default()
  }
}

fn apply_summary(totals: &mut StatTotals, files_changed: u64, insertions: Option<u64>, deletions: Option<u64>) {
  totals.files_changed = files_changed;
  if let Some(i) = insertions {
    totals.insertions = i;
  }
  if let Some(d) = deletions {
    totals.deletions = d;
  }
}

fn note_phrases(acc: &mut (Option<u64>, Option<u64>), line: &str) {
  let (ins, del) = scan_change_phrases(line);
  if acc.0.is_none() {
    acc.0 = ins;
  }
  if acc.1.is_none() {
    acc.1 = del;
  }
}

fn apply_phrases(totals: &mut StatTotals, phrases: (Option<u64>, Option<u64>)) {
  if let Some(i) = phrases.0 {
    totals.insertions = i;
  }
  if let Some(d) = phrases.1 {
    totals.deletions = d;
  }
}

fn build_file_change(ns: NameStatus, numstat: &HashMap<String, NumstatEntry>) -> FileChange {
  match ns {
    NameStatus::Plain(letter, path) => {
      let entry = numstat.get(&path).copied().unwrap_or_default();
      let status = match letter {
        StatusLetter::Added | StatusLetter::Copied => ChangeStatus::Added,
        StatusLetter::Modified | StatusLetter::TypeChanged => ChangeStatus::Modified,
        StatusLetter::Deleted => ChangeStatus::Deleted,
      };
      FileChange { path, insertions: entry.insertions, deletions: entry.deletions, status, binary: entry.binary }
    }
    NameStatus::Rename { from, to } => {
      let entry = numstat.get(&to).or_else(|| numstat.get(&from)).copied().unwrap_or_default();
      FileChange {
        path: to.clone(),
        insertions: entry.insertions,
        deletions: entry.deletions,
        status: ChangeStatus::Renamed { from, to },
        binary: entry.binary,
      }
    }
  }
}

fn top_n(mut candidates: Vec<TopFile>) -> Vec<TopFile> {
  // stable: equal volumes keep table order
  candidates.sort_by(|a, b| b.changes.cmp(&a.changes));
  candidates.truncate(MAX_TOP_FILES);
  candidates
}

fn aggregate_extensions(changes: &[FileChange]) -> BTreeMap<String, ExtensionStats> {
  let mut by_ext: BTreeMap<String, ExtensionStats> = BTreeMap::new();
  for fc in changes {
    let e = by_ext.entry(extension_of(&fc.path).to_string()).or_default();
    e.files += 1;
    e.insertions += fc.insertions;
    e.deletions += fc.deletions;
  }
  by_ext
}

fn split_header<'a, 'b>(lines: &'b [&'a str]) -> (Header, &'b [&'a str]) {
  let mut header = Header::default();
  let Some(first) = lines.first() else {
    return (header, lines);
  };
  let Some(hash) = first.strip_prefix("commit ") else {
    return (header, lines);
  };
  header.commit = hash.split_whitespace().next().unwrap_or("").to_string();

  let mut i = 1;
  while i < lines.len() && !lines[i].trim().is_empty() {
    let l = lines[i];
    if let Some(a) = l.strip_prefix("Author:") {
      let a = a.trim();
      header.author = match a.find(" <") {
        Some(idx) => a[..idx].to_string(),
        None => a.to_string(),
      };
    } else if let Some(d) = l.strip_prefix("Date:") {
      header.date = d.trim().to_string();
    }
    i += 1;
  }

  // message paragraph: blank or four-space indented lines
  while i < lines.len() && (lines[i].trim().is_empty() || lines[i].starts_with("    ")) {
    if header.message.is_empty() && !lines[i].trim().is_empty() {
      header.message = lines[i].trim().to_string();
    }
    i += 1;
  }

  (header, &lines[i..])
}
