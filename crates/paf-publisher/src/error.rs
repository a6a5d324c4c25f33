//! Error taxonomy of a publish invocation.
//!
//! [`ConfigError`] and the connection/transaction variants of
//! [`PublishError`] reach the caller. [`Failure`]s are absorbed and logged
//! unless the configuration asks for all-or-nothing batches, or unless
//! they leave the session unusable.
use paf_metrics::RouteError;
use paf_mssql::MssqlError;
use thiserror::Error;

/// Bundle does not describe a usable configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing config field: {field}")]
    MissingField { field: &'static str },

    #[error("config field {field} must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("config field {field} has invalid value {value:?}, expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// A step of the pipeline that went wrong without stopping it.
#[derive(Debug, Error)]
pub enum Failure {
    /// Metric matched a route but could not become a row.
    #[error("metric #{index} not routed: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteError,
    },

    /// Row was refused by its bulk set.
    #[error("metric #{index} ({namespace}) not appended: {source}")]
    Append {
        index: usize,
        namespace: String,
        #[source]
        source: MssqlError,
    },

    /// Bulk load of a table failed as a whole.
    #[error("bulk load into {table} failed: {source}")]
    Finalize {
        table: &'static str,
        #[source]
        source: MssqlError,
    },

    #[error("commit failed: {0}")]
    Commit(#[source] MssqlError),
}

impl Failure {
    /// Error class as reported in logs.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Route { .. } | Self::Append { .. } => "row-append",
            Self::Finalize { .. } => "finalize",
            Self::Commit(_) => "commit",
        }
    }
    /// Whether the session this failure happened on is no longer usable.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Route { .. } => false,
            Self::Append { source, .. } | Self::Finalize { source, .. } | Self::Commit(source) => source.is_fatal(),
        }
    }
}

/// Failure returned to whoever invoked `publish`.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// First-time connection establishment failed. Nothing retries it
    /// inside this invocation; the host decides what happens next.
    #[error("open connection failed: {0}")]
    ConnectionOpen(#[source] MssqlError),

    #[error("begin transaction failed: {0}")]
    Begin(#[source] MssqlError),

    /// All-or-nothing batch rolled back because of its first failure.
    #[error("batch rolled back: {0}")]
    Aborted(#[source] Failure),

    /// The session fell out of step with the server mid-batch. Nothing
    /// more is sent on it and the shared connection is discarded.
    #[error("session broken: {0}")]
    Broken(#[source] Failure),
}

impl PublishError {
    /// Whether the shared session has to be replaced before the next batch.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Begin(source) => source.is_fatal(),
            Self::Broken(_) => true,
            Self::Config(_) | Self::ConnectionOpen(_) | Self::Aborted(_) => false,
        }
    }
}
