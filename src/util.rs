// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, bounded git subprocesses, time formatting, output writing, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; paths; clap CommandFactory
// outputs: Canonicalized paths, git stdout, formatted timestamps, written reports, man page text
// side_effects: run_git invokes subprocesses (killed on timeout); write_report writes files or stdout
// invariants:
// - run_git never blocks longer than its timeout plus one poll interval
// - iso_in_tz falls back to UTC for unknown zones or out-of-range epochs
// errors: run_git surfaces command + stderr as FetchError; IO errors bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use clap::CommandFactory;

use crate::error::FetchError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Run `git <args>` in `cwd`, killing it once `timeout` elapses.
pub fn run_git(cwd: &Path, args: &[String], timeout: Duration) -> Result<String, FetchError> {
  tracing::debug!(cwd = %cwd.display(), ?args, ?timeout, "running git");

  let mut child = Command::new("git")
    .args(args)
    .current_dir(cwd)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .map_err(|source| FetchError::Spawn { args: args.to_vec(), source })?;

  // drain pipes concurrently so a chatty child cannot fill them and stall
  let stdout = child.stdout.take();
  let stderr = child.stderr.take();
  let out_reader = thread::spawn(move || drain(stdout));
  let err_reader = thread::spawn(move || drain(stderr));

  let deadline = Instant::now() + timeout;
  let status = loop {
    match child.try_wait() {
      Ok(Some(status)) => break status,
      Ok(None) if Instant::now() >= deadline => {
        reap(&mut child);
        // readers are not joined: a grandchild (shell alias, credential helper)
        // may still hold the pipes, and each reader exits once the last writer closes
        drop((out_reader, err_reader));
        return Err(FetchError::Timeout { args: args.to_vec(), after: timeout });
      }
      Ok(None) => thread::sleep(POLL_INTERVAL),
      Err(source) => {
        reap(&mut child);
        drop((out_reader, err_reader));
        return Err(FetchError::Spawn { args: args.to_vec(), source });
      }
    }
  };

  let out = out_reader.join().unwrap_or_default();
  let err = err_reader.join().unwrap_or_default();

  if status.success() {
    Ok(String::from_utf8_lossy(&out).to_string())
  } else {
    Err(FetchError::Failed {
      args: args.to_vec(),
      stderr: String::from_utf8_lossy(&err).trim().to_string(),
    })
  }
}

fn reap(child: &mut Child) {
  let _ = child.kill();
  let _ = child.wait();
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
  let mut buf = Vec::new();
  if let Some(mut p) = pipe {
    let _ = p.read_to_end(&mut buf);
  }
  buf
}

/// Generates a short 12-character SHA from a full one.
pub fn short_sha(full: &str) -> String {
  full.chars().take(12).collect()
}

/// Formats a Unix epoch timestamp into an RFC3339 string in the specified timezone.
pub fn iso_in_tz(epoch: i64, tz: &str) -> String {
  let Some(dt_utc) = Utc.timestamp_opt(epoch, 0).single() else {
    return epoch.to_string();
  };

  if tz.eq_ignore_ascii_case("utc") {
    return dt_utc.to_rfc3339_opts(SecondsFormat::Secs, true);
  }

  if tz.eq_ignore_ascii_case("local") {
    let dt: DateTime<Local> = dt_utc.with_timezone(&Local);
    return dt.to_rfc3339_opts(SecondsFormat::Secs, true);
  }

  match tz.parse::<Tz>() {
    Ok(zone) => zone
      .from_utc_datetime(&dt_utc.naive_utc())
      .to_rfc3339_opts(SecondsFormat::Secs, true),
    Err(_) => dt_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
  }
}

/// Write pretty JSON to `out` (a file path) or stdout when `out` is `-`.
pub fn write_report<T: serde::Serialize>(out: &str, report: &T) -> Result<()> {
  let body = serde_json::to_string_pretty(report)?;
  if out == "-" {
    println!("{}", body);
    return Ok(());
  }

  let out_path = Path::new(out);
  if let Some(parent) = out_path.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
  }
  std::fs::write(out_path, body).with_context(|| format!("writing report to {}", out_path.display()))?;
  Ok(())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
