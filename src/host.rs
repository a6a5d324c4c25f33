//! Command-line host for the publisher.
use anyhow::Context;
use clap::Parser;
use paf_metrics::Metric;
use paf_publisher::Bundle;
use paf_publisher::Publisher;
use std::io::Read;
use std::path::PathBuf;

/// Publishes one metric batch, the way the collection framework would.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Host {
    /// Configuration bundle as a JSON object.
    #[arg(long, required_unless_present = "policy")]
    pub config: Option<PathBuf>,
    /// Metric batch as a JSON array; read from stdin when absent.
    #[arg(long)]
    pub batch: Option<PathBuf>,
    /// Print the configuration policy as JSON and exit.
    #[arg(long)]
    pub policy: bool,
}

impl Host {
    pub async fn run(self) -> anyhow::Result<()> {
        let publisher = Publisher::new();
        if self.policy {
            println!("{}", serde_json::to_string_pretty(publisher.policy())?);
            return Ok(());
        }
        let path = self.config.context("--config is required")?;
        let bundle = Self::bundle(Self::open(&path)?)
            .with_context(|| format!("reading config {}", path.display()))?;
        let metrics = match self.batch {
            Some(ref path) => Self::metrics(Self::open(path)?)
                .with_context(|| format!("reading batch {}", path.display()))?,
            None => Self::metrics(std::io::stdin().lock()).context("reading batch from stdin")?,
        };
        let report = publisher.publish(&metrics, &bundle).await?;
        log::info!(
            "published {} metrics: {} sql rows, {} wait rows, {} skipped, {} failures",
            metrics.len(),
            report.sql,
            report.wait,
            report.skipped,
            report.failures.len()
        );
        Ok(())
    }
    pub fn bundle(reader: impl Read) -> anyhow::Result<Bundle> {
        Ok(serde_json::from_reader(reader)?)
    }
    pub fn metrics(reader: impl Read) -> anyhow::Result<Vec<Metric>> {
        Ok(serde_json::from_reader(reader)?)
    }
    fn open(path: &PathBuf) -> anyhow::Result<std::fs::File> {
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))
    }
}
