//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Then in tests:
//! ```rust,no_run
//! use test_support::{init_tracing, FixtureRepo};
//!
//! init_tracing();
//! let repo = FixtureRepo::contributors();
//! let _path = repo.path();
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};
use std::process::Command;

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// Uses the support crate's parent, so it's stable regardless
/// of the runner's working directory (cargo vs nextest).
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests dir")
        .join("fixtures")
}

/// Read a UTF-8 text fixture into a string.
pub fn read_fixture_text<P: AsRef<Path>>(rel_path: P) -> String {
    let path = fixtures_dir().join(rel_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    assert_cmd::Command::cargo_bin(bin).expect("binary target not found")
}

pub fn run(repo: &Path, args: &[&str]) {
    let status = Command::new("git").args(args).current_dir(repo).status().unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

pub fn git_stdout(repo: &Path, args: &[&str]) -> String {
    let out = Command::new("git").args(args).current_dir(repo).output().unwrap();
    assert!(out.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

/// A throwaway repository that is removed on drop.
pub struct FixtureRepo {
    dir: tempfile::TempDir,
}

impl FixtureRepo {
    pub fn empty() -> Self {
        let dir = tempdir();
        run(dir.path(), &["init", "-q", "-b", "main"]);
        run(dir.path(), &["config", "commit.gpgsign", "false"]);
        run(dir.path(), &["config", "core.autocrlf", "false"]);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> &str {
        self.dir.path().to_str().expect("utf-8 temp path")
    }

    pub fn write(&self, rel: &str, contents: &[u8]) {
        let p = self.dir.path().join(rel);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(p, contents).unwrap();
    }

    /// Stage everything and commit as `author` at `date`.
    pub fn commit_all(&self, author: &str, date: &str, message: &str) {
        run(self.path(), &["add", "-A"]);
        let email = format!("{}@example.com", author.to_lowercase());
        let env = [
            ("GIT_AUTHOR_NAME", author),
            ("GIT_AUTHOR_EMAIL", email.as_str()),
            ("GIT_AUTHOR_DATE", date),
            ("GIT_COMMITTER_NAME", author),
            ("GIT_COMMITTER_EMAIL", email.as_str()),
            ("GIT_COMMITTER_DATE", date),
        ];
        let status = Command::new("git")
            .args(["commit", "-q", "-m", message])
            .current_dir(self.path())
            .envs(env.iter().cloned())
            .status()
            .unwrap();
        assert!(status.success(), "commit {:?} failed", message);
    }

    /// Four commits, newest first:
    ///
    /// 1. alice: only `node_modules/` changes
    /// 2. alice: pure rename `README.md -> docs/README.md` plus a `node_modules/` file
    /// 3. bob: edit `src/lib.rs`, add binary `assets/logo.png`
    /// 4. alice: add `src/lib.rs` and `README.md`
    pub fn contributors() -> Self {
        let repo = Self::empty();

        repo.write("src/lib.rs", b"pub fn one() -> u32 {\n    1\n}\n");
        repo.write("README.md", b"# fixture\n\nA test repository.\n");
        repo.commit_all("alice", "2025-08-12T14:03:00+00:00", "feat: initial library");

        repo.write("src/lib.rs", b"pub fn one() -> u32 {\n    1\n}\n\npub fn two() -> u32 {\n    2\n}\n");
        repo.write("assets/logo.png", &[0x89, 0x50, 0x4e, 0x47, 0x00, 0x00, 0x01, 0xff, 0x00, 0x02]);
        repo.commit_all("bob", "2025-08-13T09:12:00+00:00", "feat: add two and a logo");

        std::fs::create_dir_all(repo.path().join("docs")).unwrap();
        run(repo.path(), &["mv", "README.md", "docs/README.md"]);
        repo.write("node_modules/left-pad/index.js", b"module.exports = 1;\n");
        repo.commit_all("alice", "2025-08-14T10:00:00+00:00", "chore: move docs, vendor left-pad");

        repo.write("node_modules/left-pad/index.js", b"module.exports = 2;\n");
        repo.commit_all("alice", "2025-08-15T11:30:00+00:00", "chore: bump left-pad");

        repo
    }
}
