// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Split unified patches into per-file blocks and drop blocks under a reserved dependency directory
// role: filtering/diff noise
// inputs: Patch text; excluded path segment (e.g. node_modules)
// outputs: FileBlock lists; CommitDiff lists with fully-excluded commits omitted
// invariants:
// - Exclusion matches whole path components only, on either side of a rename
// - A commit is omitted only when exclusion removed every one of its blocks
// - Path headers are read only before a block's first hunk
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{CommitDiff, FileBlock};

pub const DEFAULT_EXCLUDED_SEGMENT: &str = "node_modules";

/// Split a unified diff into one block per `diff --git` header.
/// Text before the first header is ignored.
pub fn split_file_blocks(patch: &str) -> Vec<FileBlock> {
  let mut blocks: Vec<FileBlock> = Vec::new();
  let mut in_hunk = false;

  for line in patch.lines() {
    if let Some(rest) = line.strip_prefix("diff --git ") {
      let (old_path, new_path) = header_paths(rest);
      blocks.push(FileBlock { old_path, new_path, lines: vec![line.to_string()] });
      in_hunk = false;
      continue;
    }

    let Some(block) = blocks.last_mut() else {
      continue;
    };
    block.lines.push(line.to_string());

    if line.starts_with("@@") {
      in_hunk = true;
    }
    // hunk bodies may hold lines shaped like headers (`-- comment` removed)
    if in_hunk {
      continue;
    }

    // path headers refine what `diff --git` left ambiguous
    if let Some(p) = line.strip_prefix("rename from ") {
      block.old_path = Some(p.to_string());
    } else if let Some(p) = line.strip_prefix("rename to ") {
      block.new_path = Some(p.to_string());
    } else if let Some(p) = line.strip_prefix("--- ") {
      block.old_path = side_path(p, "a/");
    } else if let Some(p) = line.strip_prefix("+++ ") {
      block.new_path = side_path(p, "b/");
    } else if line.starts_with("new file mode") {
      block.old_path = None;
    } else if line.starts_with("deleted file mode") {
      block.new_path = None;
    }
  }

  blocks
}

fn side_path(raw: &str, prefix: &str) -> Option<String> {
  let raw = raw.trim_end_matches('\t');
  if raw == "/dev/null" {
    return None;
  }
  Some(raw.strip_prefix(prefix).unwrap_or(raw).to_string())
}

fn header_paths(rest: &str) -> (Option<String>, Option<String>) {
  let Some(after_a) = rest.strip_prefix("a/") else {
    return (None, None);
  };
  // prefer the split where both sides agree; paths may themselves contain " b/"
  let splits: Vec<usize> = after_a.match_indices(" b/").map(|(i, _)| i).collect();
  let pick = splits
    .iter()
    .copied()
    .find(|&i| after_a[..i] == after_a[i + 3..])
    .or_else(|| splits.first().copied());
  match pick {
    Some(i) => (Some(after_a[..i].to_string()), Some(after_a[i + 3..].to_string())),
    None => (None, None),
  }
}

/// True when any component of `path` equals `segment` exactly.
pub fn has_segment(path: &str, segment: &str) -> bool {
  path.split('/').any(|component| component == segment)
}

fn is_excluded(block: &FileBlock, segment: &str) -> bool {
  [&block.old_path, &block.new_path]
    .into_iter()
    .flatten()
    .any(|p| has_segment(p, segment))
}

/// Drop blocks whose old or new path lies under `excluded_segment`.
pub fn filter_noise(blocks: Vec<FileBlock>, excluded_segment: &str) -> Vec<FileBlock> {
  blocks.into_iter().filter(|b| !is_excluded(b, excluded_segment)).collect()
}

/// Filter every commit's blocks; commits left with nothing are omitted.
pub fn filter_commit_diffs(commits: Vec<CommitDiff>, excluded_segment: &str) -> Vec<CommitDiff> {
  commits
    .into_iter()
    .filter_map(|mut c| {
      let before = c.blocks.len();
      c.blocks = filter_noise(std::mem::take(&mut c.blocks), excluded_segment);
      if before > 0 && c.blocks.is_empty() {
        tracing::debug!(commit = %c.commit, excluded_segment, "every block excluded; omitting commit");
        None
      } else {
        Some(c)
      }
    })
    .collect()
}
