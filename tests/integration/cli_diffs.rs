use test_support::{cmd_bin, git_stdout, FixtureRepo};

fn diffs(repo: &FixtureRepo, extra: &[&str]) -> serde_json::Value {
  let out = cmd_bin("git-contrib-stats")
    .args(["--diffs", "--repo", repo.path_str()])
    .args(extra)
    .output()
    .unwrap();
  assert!(out.status.success(), "cli run failed: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn noise_only_commit_is_omitted() {
  let repo = FixtureRepo::contributors();
  let v = diffs(&repo, &[]);

  assert_eq!(v["excluded_segment"], "node_modules");
  assert_eq!(v["count"], 3);

  let newest = git_stdout(repo.path(), &["rev-parse", "HEAD"]);
  let commits = v["commits"].as_array().unwrap();
  assert!(commits.iter().all(|c| c["commit"] != newest.as_str()));

  // the rename survives; its node_modules sibling does not
  let moved = &commits[0];
  assert_eq!(moved["message"], "chore: move docs, vendor left-pad");
  let blocks = moved["blocks"].as_array().unwrap();
  assert_eq!(blocks.len(), 1);
  assert_eq!(blocks[0]["old_path"], "README.md");
  assert_eq!(blocks[0]["new_path"], "docs/README.md");
}

#[test]
fn custom_segment_changes_what_is_dropped() {
  let repo = FixtureRepo::contributors();
  let v = diffs(&repo, &["--exclude-segment", "assets"]);

  assert_eq!(v["count"], 4);
  let bob = v["commits"]
    .as_array()
    .unwrap()
    .iter()
    .find(|c| c["author"] == "bob")
    .unwrap();
  let paths: Vec<&str> = bob["blocks"]
    .as_array()
    .unwrap()
    .iter()
    .map(|b| b["new_path"].as_str().unwrap())
    .collect();
  assert_eq!(paths, vec!["src/lib.rs"]);
}

#[test]
fn segment_with_slash_is_rejected() {
  let repo = FixtureRepo::contributors();
  cmd_bin("git-contrib-stats")
    .args(["--diffs", "--exclude-segment", "a/b", "--repo", repo.path_str()])
    .assert()
    .failure()
    .stderr(predicates::str::contains("--exclude-segment"));
}
