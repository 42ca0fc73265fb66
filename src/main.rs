use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use weekly_hours_report::cli::{normalize, Cli};
use weekly_hours_report::{report_processor, util};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: logging to stderr; RUST_LOG wins over --verbose
  let default_level = if cfg.verbose { "info" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();

  // Phase 3: fetch, build and emit reports
  report_processor::process(&cfg)
}
