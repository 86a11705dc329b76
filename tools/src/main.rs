//! case-runner: batch-creates mediation cases from a spreadsheet.
//!
//! Usage:
//!   case-runner init                       write a starter config.json
//!   case-runner new                        submit rows per config.json
//!   case-runner new --fake -o replies.txt  render requests, record replies

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mediation_core::{
    config::DEFAULT_CONFIG_FILE, journal::AppendLog, rng::RunRng, source::SheetRowSource,
    CaseRunner, RunConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "case-runner", about = "Mediation case batch submitter")]
struct Cli {
    /// Configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Create one case per spreadsheet row.
    New {
        /// Append every successful response body to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render requests instead of sending them.
        #[arg(long)]
        fake: bool,
        /// Seed for the random mediation windows.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => init_config(&cli.config, force),
        Command::New { output, fake, seed } => new_cases(&cli.config, output, fake, seed),
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    init_logger(false);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    RunConfig::default_template().save(path)?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn new_cases(path: &Path, output: Option<PathBuf>, fake: bool, seed: Option<u64>) -> Result<()> {
    let mut config = RunConfig::load(path)?;
    config.debug.fake |= fake;
    init_logger(config.debug.verbose);

    let rng = seed.map_or_else(RunRng::from_entropy, RunRng::seeded);
    let mut runner = CaseRunner::from_config(&config, rng)
        .context("Pre-run check failed, fix the configuration file")?;
    if let Some(output) = output {
        runner = runner.with_response_log(AppendLog::new(output));
    }

    let mut source = SheetRowSource::open(&config.data.path, &config.data.sheet)?;
    let summary = runner.run(&mut source)?;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:     {}", summary.run_id);
    println!("  rows:       {}", summary.rows);
    println!("  submitted:  {}", summary.submitted);
    println!("  skipped:    {}", summary.skipped);
    println!("  failed:     {}", summary.failed);
    if let Some(log_path) = non_empty(&config.debug.log_path) {
        if summary.skipped + summary.failed > 0 {
            println!("  errors in:  {log_path}");
        }
    }
    Ok(())
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
