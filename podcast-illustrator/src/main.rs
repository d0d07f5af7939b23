use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod server;
mod uploads;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    cli::Args::parse().run().await
}
