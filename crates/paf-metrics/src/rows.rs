use chrono::NaiveDateTime;
use paf_core::TestRun;
use paf_core::WaitValue;

/// Text of one SQL statement, keyed by its hash.
///
/// Field order matches the destination table: `(hash, sql)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlText {
    pub hash: String,
    pub text: String,
}

/// One wait-event sample attributed to a statement hash.
///
/// Field order matches the destination table:
/// `(test_run_id, hash, type, event_date, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitEvent {
    pub test_run: TestRun,
    pub hash: String,
    pub kind: String,
    pub event_date: NaiveDateTime,
    pub value: WaitValue,
}

/// Destination of a classified metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Sql(SqlText),
    Wait(WaitEvent),
}
