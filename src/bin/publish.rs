//! Publish Binary
//!
//! Reads a configuration bundle and a metric batch as JSON and publishes
//! the batch into SQL Server.
//!
//! Options: --config <file>, --batch <file>, --policy

use clap::Parser;
use pafdb::Host;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pafdb::log()?;
    Host::parse().run().await
}
