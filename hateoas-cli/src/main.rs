//! hateoas-cli
//!
//! Fetches a resource or a page of a collection from a HAL API and prints
//! the materialized result.
//!
//! Usage:
//!   hateoas-cli --root http://localhost:8080/api books --page 0 --size 5

use anyhow::Result;
use clap::Parser;
use hateoas_cli::{run, Args};
use hateoas_client::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let json = run(&args).await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
