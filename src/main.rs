//! Enamel CLI
//!
//! Drives a file-backed cart against a fixture catalog.

use anyhow::Result;
use clap::Parser;
use enamel::observability::init_subscriber;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_subscriber(&cli.logging)?;

    cli.run()
}
