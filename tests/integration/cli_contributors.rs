use test_support::{cmd_bin, FixtureRepo};

fn run_contributors(repo: &FixtureRepo, extra: &[&str]) -> serde_json::Value {
  let out = cmd_bin("git-contrib-stats")
    .args(["--contributors", "--tz", "utc", "--repo", repo.path_str()])
    .args(extra)
    .output()
    .unwrap();
  assert!(out.status.success(), "cli run failed: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn contributors_are_ranked_by_commit_count() {
  let repo = FixtureRepo::contributors();
  let v = run_contributors(&repo, &[]);

  assert_eq!(v["commits_scanned"], 4);
  let people = v["contributors"].as_array().unwrap();
  assert_eq!(people.len(), 2);

  assert_eq!(people[0]["username"], "alice");
  assert_eq!(people[0]["commit_count"], 3);
  assert_eq!(people[0]["total_insertions"], 8);
  assert_eq!(people[0]["total_deletions"], 1);
  assert_eq!(people[0]["commit_hashes"].as_array().unwrap().len(), 3);

  assert_eq!(people[1]["username"], "bob");
  assert_eq!(people[1]["commit_count"], 1);
  assert_eq!(people[1]["total_insertions"], 4);
}

#[test]
fn commit_hashes_follow_history_order() {
  let repo = FixtureRepo::contributors();
  let v = run_contributors(&repo, &["--jobs", "3"]);
  let log = test_support::git_stdout(repo.path(), &["log", "--author=alice", "--format=%H"]);
  let expected: Vec<&str> = log.lines().collect();
  let got: Vec<&str> = v["contributors"][0]["commit_hashes"]
    .as_array()
    .unwrap()
    .iter()
    .map(|h| h.as_str().unwrap())
    .collect();
  assert_eq!(got, expected);
}

#[test]
fn max_count_limits_history() {
  let repo = FixtureRepo::contributors();
  let v = run_contributors(&repo, &["--max-count", "2"]);
  assert_eq!(v["commits_scanned"], 2);
  let people = v["contributors"].as_array().unwrap();
  assert_eq!(people.len(), 1);
  assert_eq!(people[0]["username"], "alice");
}
