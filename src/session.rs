// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Explicit checkout context (Session) and the single-slot Workspace that replaces it on each clone
// role: session/lifecycle
// inputs: Local repository paths or clone URLs; clone timeout
// outputs: Session exposing a SystemGit runner bound to the working copy
// side_effects: Clones into temp dirs; deletes owned working copies on teardown
// invariants:
// - A Workspace holds at most one Session; checkout tears the old one down before cloning
// - Sessions opened on an existing path never delete it
// errors: SessionError (NoRepository, NotARepository, Clone, Workdir)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use crate::error::SessionError;
use crate::gitio::SystemGit;
use crate::util::run_git;

#[derive(Debug)]
pub struct Session {
  root: PathBuf,
  origin: String,
  git: SystemGit,
  // owned clones are removed when this drops
  owned: Option<TempDir>,
}

impl Session {
  /// Use an existing working copy in place.
  pub fn open(path: &Path, timeout: Duration) -> Result<Self, SessionError> {
    let args: Vec<String> = vec!["rev-parse".into(), "--show-toplevel".into()];
    let top = run_git(path, &args, timeout)
      .map_err(|source| SessionError::NotARepository { path: path.to_path_buf(), source })?;
    let root = PathBuf::from(top.trim());
    tracing::info!(root = %root.display(), "opened working copy");
    Ok(Self {
      git: SystemGit::new(&root),
      origin: root.to_string_lossy().to_string(),
      root,
      owned: None,
    })
  }

  /// Clone `url` into a fresh temporary working copy owned by the session.
  pub fn clone_from(url: &str, timeout: Duration) -> Result<Self, SessionError> {
    let dir = tempfile::Builder::new()
      .prefix("git-contrib-stats-")
      .tempdir()
      .map_err(|source| SessionError::Workdir { url: url.to_string(), source })?;
    let target = dir.path().join("checkout");
    let args: Vec<String> = vec![
      "clone".into(),
      "--quiet".into(),
      "--no-tags".into(),
      url.to_string(),
      target.to_string_lossy().to_string(),
    ];
    run_git(dir.path(), &args, timeout).map_err(|source| SessionError::Clone { url: url.to_string(), source })?;
    tracing::info!(url, root = %target.display(), "cloned working copy");

    Ok(Self {
      git: SystemGit::new(&target),
      root: target,
      origin: url.to_string(),
      owned: Some(dir),
    })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Where the session came from: the clone URL or the opened path.
  pub fn origin(&self) -> &str {
    &self.origin
  }

  pub fn git(&self) -> &SystemGit {
    &self.git
  }

  pub fn is_owned(&self) -> bool {
    self.owned.is_some()
  }

  /// Remove an owned working copy now rather than at drop.
  pub fn teardown(mut self) -> std::io::Result<()> {
    match self.owned.take() {
      Some(dir) => {
        tracing::info!(root = %self.root.display(), "removing working copy");
        dir.close()
      }
      None => Ok(()),
    }
  }
}

/// Holds the currently checked-out repository, if any.
///
/// Single-tenant: a new checkout replaces the previous one wholesale.
#[derive(Debug, Default)]
pub struct Workspace {
  current: Option<Session>,
}

impl Workspace {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn current(&self) -> Result<&Session, SessionError> {
    self.current.as_ref().ok_or(SessionError::NoRepository)
  }

  /// Discard the current working copy, then clone `url`.
  pub fn checkout(&mut self, url: &str, timeout: Duration) -> Result<&Session, SessionError> {
    self.delete();
    let session = Session::clone_from(url, timeout)?;
    let current: &Session = self.current.insert(session);
    Ok(current)
  }

  pub fn open(&mut self, path: &Path, timeout: Duration) -> Result<&Session, SessionError> {
    self.delete();
    let session = Session::open(path, timeout)?;
    let current: &Session = self.current.insert(session);
    Ok(current)
  }

  /// Tear down the current session. Returns whether one existed.
  pub fn delete(&mut self) -> bool {
    match self.current.take() {
      Some(session) => {
        if let Err(e) = session.teardown() {
          tracing::warn!(error = %e, "failed to remove working copy");
        }
        true
      }
      None => false,
    }
  }
}
