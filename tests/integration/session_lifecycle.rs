use std::time::Duration;

use git_contrib_stats::session::{Session, Workspace};
use test_support::FixtureRepo;

const TIMEOUT: Duration = Duration::from_secs(60);

#[test]
fn checkout_replaces_the_previous_clone() {
  let repo = FixtureRepo::contributors();
  let mut ws = Workspace::new();

  let first_root = {
    let s = ws.checkout(repo.path_str(), TIMEOUT).unwrap();
    assert!(s.is_owned());
    assert_eq!(s.origin(), repo.path_str());
    assert!(s.root().join("src/lib.rs").exists());
    s.root().to_path_buf()
  };

  let second_root = ws.checkout(repo.path_str(), TIMEOUT).unwrap().root().to_path_buf();
  assert_ne!(first_root, second_root);
  assert!(!first_root.exists(), "previous clone should be removed");
  assert!(second_root.exists());

  assert!(ws.delete());
  assert!(!second_root.exists());
  assert!(ws.current().is_err());
}

#[test]
fn teardown_of_opened_copy_keeps_files() {
  let repo = FixtureRepo::contributors();
  let session = Session::open(repo.path(), TIMEOUT).unwrap();
  assert!(!session.is_owned());

  let root = session.root().to_path_buf();
  session.teardown().unwrap();
  assert!(root.join("src/lib.rs").exists());
}

#[test]
fn open_from_subdirectory_finds_top_level() {
  let repo = FixtureRepo::contributors();
  let session = Session::open(&repo.path().join("src"), TIMEOUT).unwrap();
  assert_eq!(
    std::fs::canonicalize(session.root()).unwrap(),
    std::fs::canonicalize(repo.path()).unwrap()
  );
}
