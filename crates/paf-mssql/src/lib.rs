//! SQL Server integration and positional bulk rows.
//!
//! Connectivity and bulk-copy plumbing for the publisher. Rows travel over
//! the TDS bulk-load path (`INSERT BULK`), which is positional: every row
//! must list its values in the exact column order of the target table.
//!
//! ## Connectivity
//!
//! - [`Endpoint`] — Host, port, database and credentials
//! - [`Connector`] — Opens a [`Session`]; [`Tds`] is the tiberius one
//! - [`ConnectionManager`] — Opens one shared session per process
//!
//! ## Serialization
//!
//! - [`Schema`] — Table name, column order and bulk statement text
//! - [`Row`] — Positional value list for one table
//! - [`Bulk`] — Rows pending for one table, flushed by [`Session::copy`]
//! - [`Column`] — Server-side column a [`Value`] is converted to
//!
//! ## Table Names
//!
//! Constants for the two destination tables.
mod bulk;
mod connect;
mod error;
mod layout;
mod manager;
mod row;
mod schema;
mod session;

pub use bulk::*;
pub use connect::*;
pub use error::*;
pub use layout::*;
pub use manager::*;
pub use row::*;
pub use schema::*;
pub use session::*;

/// tiberius client over a tokio TCP stream.
pub type Mssql = tiberius::Client<tokio_util::compat::Compat<tokio::net::TcpStream>>;

/// Table for statement text keyed by hash.
#[rustfmt::skip]
pub const DPA_SQL:  &str = "dpa_sql";
/// Table for wait-event samples.
#[rustfmt::skip]
pub const DPA_WAIT: &str = "dpa_wait";
