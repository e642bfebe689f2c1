// src/bin/cli.rs
use close_scrape::cli;
use color_eyre::eyre::{Result, eyre};

fn main() -> Result<()> {
    color_eyre::install()?;
    cli::run().map_err(|e| eyre!(e.to_string()))
}
