use git_contrib_stats::model::ChangeStatus;
use git_contrib_stats::noise::{filter_noise, split_file_blocks};
use git_contrib_stats::summarize_commit;
use git_contrib_stats::summary::{format_summary_line, parse_stat_totals};
use test_support::read_fixture_text;

#[test]
fn combined_show_output_is_summarized() {
  let raw = read_fixture_text("show_combined.txt");
  let s = summarize_commit(&raw);

  assert_eq!(s.commit, "9f2c4e1a7b3d5f6e8a9b0c1d2e3f4a5b6c7d8e9f");
  assert_eq!(s.author, "Dana Maintainer");
  assert_eq!(s.date, "2025-09-01T08:15:00+00:00");
  assert_eq!(s.message, "refactor: split parser, vendor deps");
  assert_eq!((s.files_changed, s.insertions, s.deletions), (5, 13, 10));
  assert_eq!(format_summary_line(&s.totals()), "5 files changed, 13 insertions(+), 10 deletions(-)");

  assert_eq!(s.file_changes.len(), 5);
  let renamed = s.file_changes.iter().find(|c| c.path == "src/parser/mod.rs").unwrap();
  assert_eq!(
    renamed.status,
    ChangeStatus::Renamed { from: "src/parse.rs".into(), to: "src/parser/mod.rs".into() }
  );
  assert_eq!((renamed.insertions, renamed.deletions), (3, 3));

  let banner = s.file_changes.iter().find(|c| c.path == "images/banner.png").unwrap();
  assert!(banner.binary);
  assert_eq!(banner.status, ChangeStatus::Added);

  let top: Vec<(&str, u64)> = s.top_files.iter().map(|t| (t.path.as_str(), t.changes)).collect();
  assert_eq!(top, vec![("src/main.rs", 12), ("src/parser/mod.rs", 6), ("assets/icon.svg", 4)]);

  let rs = &s.by_extension["rs"];
  assert_eq!((rs.files, rs.insertions, rs.deletions), (2, 8, 10));
  assert_eq!(s.by_extension["png"].files, 1);
  assert_eq!(s.by_extension.len(), 4);

  assert_eq!(s.diff_lines.len(), 40);
  assert_eq!(s.diff_lines[0], "diff --git a/assets/icon.svg b/assets/icon.svg");
  assert!(!s.diff_truncated);
  assert!(s.fetch_error.is_none());
}

#[test]
fn stat_totals_match_full_summary() {
  let raw = read_fixture_text("show_combined.txt");
  let totals = parse_stat_totals(&raw);
  assert_eq!(totals, summarize_commit(&raw).totals());
}

#[test]
fn fixture_patch_drops_vendored_block() {
  let raw = read_fixture_text("show_combined.txt");
  let blocks = split_file_blocks(&raw);
  assert_eq!(blocks.len(), 5);

  let kept = filter_noise(blocks, "node_modules");
  let paths: Vec<Option<&str>> = kept.iter().map(|b| b.new_path.as_deref()).collect();
  assert_eq!(
    paths,
    vec![Some("assets/icon.svg"), Some("src/parser/mod.rs"), Some("src/main.rs"), Some("images/banner.png")]
  );
  assert_eq!(kept[1].old_path.as_deref(), Some("src/parse.rs"));
  assert_eq!(kept[0].old_path, None);
}
