use std::path::PathBuf;
use std::time::Duration;

/// Per-item failure of a single git invocation. Callers recover from these
/// locally (placeholder or zeroed entry) and keep processing siblings.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("git {args:?} timed out after {after:?}")]
  Timeout { args: Vec<String>, after: Duration },

  #[error("spawning git {args:?}")]
  Spawn {
    args: Vec<String>,
    #[source]
    source: std::io::Error,
  },

  #[error("git {args:?} failed: {stderr}")]
  Failed { args: Vec<String>, stderr: String },
}

impl FetchError {
  pub fn is_timeout(&self) -> bool {
    matches!(self, FetchError::Timeout { .. })
  }
}

/// Precondition failures around the checked-out working copy.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  #[error("no repository is checked out")]
  NoRepository,

  #[error("{path} is not a git working copy")]
  NotARepository {
    path: PathBuf,
    #[source]
    source: FetchError,
  },

  #[error("cloning {url} failed")]
  Clone {
    url: String,
    #[source]
    source: FetchError,
  },

  #[error("preparing a working directory for {url}")]
  Workdir {
    url: String,
    #[source]
    source: std::io::Error,
  },
}
