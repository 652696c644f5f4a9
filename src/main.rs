use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use git_contrib_stats::cli::{normalize, Cli};
use git_contrib_stats::{report, util};

fn init_logging(verbose: bool) {
  let default = if verbose { "git_contrib_stats=debug,warn" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  // stdout carries the report; logs go to stderr
  let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_logging(cli.verbose);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;
  tracing::debug!(?cfg, "effective config");

  // Phase 2: check out, walk history, write the report
  report::process(&cfg)
}
