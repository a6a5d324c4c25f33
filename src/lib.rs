//! Metrics publisher for SQL Server bulk loads.
//!
//! This facade crate re-exports the pafdb crates and hosts the command-line
//! entry point that stands in for the collection framework.
//!
//! ## Crate Organization
//!
//! - [`plugin`] — Plugin identity, aliases, logging
//! - [`metrics`] — Metric model and routing
//! - [`mssql`] — SQL Server connectivity and bulk rows
//! - [`publisher`] — Configuration and the publish pipeline
mod host;

pub use host::*;

pub use paf_core      as plugin;
pub use paf_metrics   as metrics;
pub use paf_mssql     as mssql;
pub use paf_publisher as publisher;

// Re-export commonly used types at the root
pub use paf_core::*;
