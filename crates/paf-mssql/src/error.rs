use thiserror::Error;

/// Failures talking to SQL Server or shaping bulk rows.
#[derive(Debug, Error)]
pub enum MssqlError {
    #[error("tds error: {0}")]
    Tds(#[from] tiberius::error::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Row has a different number of values than the table has columns.
    #[error("row for {table} has {found} values, expected {expected}")]
    Arity {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    /// Row was appended to the bulk set of another table.
    #[error("row for {found} appended to bulk set of {expected}")]
    Table {
        expected: &'static str,
        found: &'static str,
    },

    /// Server columns differ from the table's declared column list.
    #[error("table {table} has columns ({found}), expected ({expected})")]
    Layout {
        table: &'static str,
        expected: String,
        found: String,
    },

    /// A value has no lossless form in its destination column type.
    #[error("{value} value does not fit {table}.{column} of type {found}")]
    Conversion {
        table: &'static str,
        column: String,
        value: &'static str,
        found: String,
    },

    /// Bulk load broke off after `INSERT BULK` was accepted.
    #[error("bulk load into {table} interrupted: {source}")]
    Interrupted {
        table: &'static str,
        #[source]
        source: tiberius::error::Error,
    },
}

impl MssqlError {
    /// Whether the session can no longer be trusted to be in step with
    /// the server. Such a session is discarded rather than reused.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Io(_) | Self::Interrupted { .. } => true,
            Self::Tds(e) => matches!(
                e,
                tiberius::error::Error::Io { .. } | tiberius::error::Error::Protocol(_)
            ),
            Self::Arity { .. } | Self::Table { .. } | Self::Layout { .. } | Self::Conversion { .. } => false,
        }
    }
}
