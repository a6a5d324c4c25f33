//! Batch-to-bulk-load publish pipeline.
//!
//! Turns one batch of metrics into two bulk loads, `dpa_sql` and
//! `dpa_wait`, inside a single transaction on the shared connection.
//!
//! ## Core Types
//!
//! - [`Publisher`] — Entry point called once per delivered batch
//! - [`Bundle`] — Opaque key → setting map handed over by the framework
//! - [`Policy`] — Declared settings, requiredness and defaults
//! - [`Configuration`] — Typed settings resolved from a bundle
//! - [`Load`] — The pair of bulk sets filled during classification
//! - [`Report`] — Rows copied and failures absorbed by one publish
mod config;
mod error;
mod pipeline;
mod policy;
mod publisher;
#[cfg(test)]
mod testing;

pub use config::*;
pub use error::*;
pub use pipeline::*;
pub use policy::*;
pub use publisher::*;
