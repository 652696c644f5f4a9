// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Classify one line of combined git show output (stat, numstat, name-status, patch) by its shape
// role: parsing/line classifier
// inputs: A single line without its trailing newline
// outputs: LineKind tagged variant
// invariants:
// - Matchers run in a fixed priority order; rename is tried before generic name-status
// - Never fails: anything unmatched is Unrecognized
// - LineClassifier stops stat, numstat and name-status matching after the first diff header
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;

static RE_SUMMARY: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^\s*(\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?\s*$").unwrap()
});
static RE_STAT_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+(\S.*?)\s+\|\s+(?:(\d+)|Bin\b)").unwrap());
static RE_NUMSTAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+|-)\t(\d+|-)\t(.+)$").unwrap());
static RE_RENAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^R(\d*)\t([^\t]+)\t([^\t]+)$").unwrap());
static RE_NAME_STATUS: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^([AMDCT])\d*\t([^\t]+)(?:\t([^\t]+))?$").unwrap());
static RE_INSERTIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) insertions?\(\+\)").unwrap());
static RE_DELETIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) deletions?\(-\)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLetter {
  Added,
  Modified,
  Deleted,
  Copied,
  TypeChanged,
}

impl StatusLetter {
  fn from_letter(s: &str) -> Option<Self> {
    match s {
      "A" => Some(Self::Added),
      "M" => Some(Self::Modified),
      "D" => Some(Self::Deleted),
      "C" => Some(Self::Copied),
      "T" => Some(Self::TypeChanged),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
  Summary {
    files_changed: u64,
    insertions: Option<u64>,
    deletions: Option<u64>,
  },
  StatRow {
    path: String,
    changes: u64,
  },
  /// `None` counts stand for git's `-` (binary file).
  NumstatRow {
    path: String,
    insertions: Option<u64>,
    deletions: Option<u64>,
  },
  RenameRow {
    from: &'a str,
    to: &'a str,
  },
  NameStatusRow {
    status: StatusLetter,
    path: &'a str,
  },
  DiffBodyRow(&'a str),
  Unrecognized(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
  if let Some(caps) = RE_SUMMARY.captures(line) {
    if let Ok(files_changed) = caps[1].parse::<u64>() {
      return LineKind::Summary {
        files_changed,
        insertions: caps.get(2).and_then(|m| m.as_str().parse().ok()),
        deletions: caps.get(3).and_then(|m| m.as_str().parse().ok()),
      };
    }
  }

  if let Some(caps) = RE_STAT_ROW.captures(line) {
    return LineKind::StatRow {
      path: resolve_rename_path(&caps[1]),
      changes: caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
    };
  }

  if let Some(caps) = RE_NUMSTAT.captures(line) {
    return LineKind::NumstatRow {
      path: resolve_rename_path(&caps[3]),
      insertions: caps[1].parse().ok(),
      deletions: caps[2].parse().ok(),
    };
  }

  if let Some(caps) = RE_RENAME.captures(line) {
    let (Some(from), Some(to)) = (caps.get(2), caps.get(3)) else {
      return LineKind::Unrecognized(line);
    };
    return LineKind::RenameRow {
      from: from.as_str(),
      to: to.as_str(),
    };
  }

  if let Some(caps) = RE_NAME_STATUS.captures(line) {
    let status = StatusLetter::from_letter(&caps[1]);
    // copies list source then destination; the destination is the new file
    let path = caps.get(3).or_else(|| caps.get(2));
    if let (Some(status), Some(path)) = (status, path) {
      return LineKind::NameStatusRow { status, path: path.as_str() };
    }
  }

  if is_diff_body(line) {
    return LineKind::DiffBodyRow(line);
  }

  LineKind::Unrecognized(line)
}

/// Classifies a whole stream of lines in order.
///
/// Once the first `diff ` header is seen every later line belongs to the
/// patch: it is either `DiffBodyRow` or `Unrecognized`, so hunk content shaped
/// like stat, numstat or name-status output is never read as such.
#[derive(Debug, Default)]
pub struct LineClassifier {
  in_patch: bool,
}

impl LineClassifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn in_patch(&self) -> bool {
    self.in_patch
  }

  pub fn classify<'a>(&mut self, line: &'a str) -> LineKind<'a> {
    if line.starts_with("diff ") {
      self.in_patch = true;
    }
    if !self.in_patch {
      return classify_line(line);
    }
    if is_diff_body(line) {
      LineKind::DiffBodyRow(line)
    } else {
      LineKind::Unrecognized(line)
    }
  }
}

fn is_diff_body(line: &str) -> bool {
  line.starts_with("diff ") || line.starts_with('+') || line.starts_with('-') || line.starts_with("@@")
}

/// Standalone `N insertion(s)(+)` / `N deletion(s)(-)` phrases anywhere in a line.
pub fn scan_change_phrases(line: &str) -> (Option<u64>, Option<u64>) {
  let ins = RE_INSERTIONS.captures(line).and_then(|c| c[1].parse().ok());
  let del = RE_DELETIONS.captures(line).and_then(|c| c[1].parse().ok());
  (ins, del)
}

/// Resolve git's rename notation (`old => new`, `dir/{a => b}/f`) to the destination path.
pub fn resolve_rename_path(raw: &str) -> String {
  let raw = raw.trim();
  if !raw.contains(" => ") {
    return raw.to_string();
  }

  if let (Some(open), Some(close)) = (raw.find('{'), raw.rfind('}')) {
    if open < close {
      let inner = &raw[open + 1..close];
      if let Some((_, to)) = inner.split_once(" => ") {
        let joined = format!("{}{}{}", &raw[..open], to, &raw[close + 1..]);
        return joined.replace("//", "/");
      }
    }
  }

  match raw.split_once(" => ") {
    Some((_, to)) => to.to_string(),
    None => raw.to_string(),
  }
}
