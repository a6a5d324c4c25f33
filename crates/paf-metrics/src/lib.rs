//! Metric model and routing of SQL text and wait-event samples.
//!
//! The collection pipeline hands the publisher batches of [`Metric`]s.
//! Each one is routed by the suffix of its rendered [`Namespace`] into a
//! row for one of the two destination tables, or skipped.
//!
//! ## Core Types
//!
//! - [`Metric`] — One observation: namespace, tags, payload, timestamp
//! - [`Namespace`] — Hierarchical path rendered as `/a/b/c`
//! - [`Payload`] — Tagged value decided when the metric is produced
//! - [`SqlText`] — Row for the SQL text table
//! - [`WaitEvent`] — Row for the wait-event table
//! - [`Router`] — Classifies a metric into a [`Route`]
mod error;
mod metric;
mod namespace;
mod payload;
mod router;
mod rows;

pub use error::*;
pub use metric::*;
pub use namespace::*;
pub use payload::*;
pub use router::*;
pub use rows::*;
