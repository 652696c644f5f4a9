use test_support::{cmd_bin, tempdir, FixtureRepo};

#[test]
fn plain_directory_is_not_a_working_copy() {
  let td = tempdir();
  cmd_bin("git-contrib-stats")
    .args(["--summaries", "--repo", td.path().to_str().unwrap()])
    .assert()
    .failure()
    .stderr(predicates::str::contains("not a git working copy"));
}

#[test]
fn a_mode_is_required() {
  let repo = FixtureRepo::contributors();
  cmd_bin("git-contrib-stats")
    .args(["--repo", repo.path_str()])
    .assert()
    .failure()
    .stderr(predicates::str::contains("Provide one of"));
}

#[test]
fn modes_are_exclusive() {
  let repo = FixtureRepo::contributors();
  cmd_bin("git-contrib-stats")
    .args(["--summaries", "--diffs", "--repo", repo.path_str()])
    .assert()
    .failure()
    .stderr(predicates::str::contains("Ambiguous mode"));
}

#[test]
fn empty_history_is_an_error() {
  let repo = FixtureRepo::empty();
  cmd_bin("git-contrib-stats")
    .args(["--contributors", "--repo", repo.path_str()])
    .assert()
    .failure()
    .stderr(predicates::str::contains("listing history"));
}
