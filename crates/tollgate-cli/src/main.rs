//! Tollgate CLI Application
//!
//! Command-line and MCP front end for the approval workflow.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use tollgate_core::ProcessStoreBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        demo,
        id_prefix,
        command,
    } = Args::parse();

    let store = ProcessStoreBuilder::new()
        .with_database_path(database_file)
        .with_id_prefix(id_prefix)
        .with_demo_seed(demo)
        .build()
        .await
        .context("Failed to initialize process store")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Tollgate started");

    Cli::new(store, renderer).run(command).await
}
