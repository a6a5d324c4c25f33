use super::*;
use paf_metrics::SqlText;
use paf_metrics::WaitEvent;

/// Schema metadata for a bulk-load destination.
///
/// Describes table structure only; no I/O happens here. The column list is
/// the positional contract every [`Row`] for the table must honour.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns the column names in table order.
    fn columns() -> &'static [&'static str];
    /// Returns the `INSERT BULK` statement the load is announced with.
    fn insert() -> &'static str;
}

impl Schema for SqlText {
    fn name() -> &'static str {
        DPA_SQL
    }
    fn columns() -> &'static [&'static str] {
        &["hash", "sql"]
    }
    fn insert() -> &'static str {
        const_format::concatcp!("INSERT BULK ", DPA_SQL, " (hash, sql)")
    }
}

impl Schema for WaitEvent {
    fn name() -> &'static str {
        DPA_WAIT
    }
    fn columns() -> &'static [&'static str] {
        &["test_run_id", "hash", "type", "event_date", "value"]
    }
    fn insert() -> &'static str {
        const_format::concatcp!(
            "INSERT BULK ",
            DPA_WAIT,
            " (test_run_id, hash, type, event_date, value)"
        )
    }
}
