use anyhow::Result;
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod audit;
mod aws;
mod cli;
mod config;
mod error;

use audit::run_audit;
use aws::AwsCli;
use cli::Cli;
use config::Config;

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    let config = Config::from_cli(cli)?;

    info!("auditing {} with {}", config.group_id, config.aws_cli);

    let inventory = AwsCli::new(config.aws_cli.as_str());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let expected = run_audit(&inventory, &config.group_id, &mut out)?;
    out.flush()?;

    if expected.is_empty() {
        warn!("no network load balancers found");
    } else {
        let present = expected.counts().values().filter(|count| **count > 0).count();
        info!("{} of {} NLB client rule(s) present", present, expected.len());
    }

    Ok(())
}
