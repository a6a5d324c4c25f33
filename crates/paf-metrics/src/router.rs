use super::*;
use chrono::NaiveDateTime;
use paf_core::TestRun;

/// Metric classes recognised by namespace suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Sql,
    Wait,
}

impl Kind {
    pub const SQL_SUFFIX: &'static str = "/sql";
    pub const WAIT_SUFFIX: &'static str = "/wait";

    /// Class of a metric, or `None` when it is not routed anywhere.
    pub fn of(namespace: &Namespace) -> Option<Self> {
        let ref path = namespace.to_string();
        if path.ends_with(Self::SQL_SUFFIX) {
            Some(Self::Sql)
        } else if path.ends_with(Self::WAIT_SUFFIX) {
            Some(Self::Wait)
        } else {
            None
        }
    }
}

/// Tag keys read by the router.
pub mod tags {
    pub const HASH: &str = "hash";
    pub const TEXT: &str = "text";
    pub const SQL: &str = "sql";
    pub const TYPE: &str = "type";
}

/// Turns metrics into destination rows.
///
/// Wait events are stamped with the test run this router was built for
/// and with the clock reading handed to [`Router::classify`]; the metric's
/// own timestamp is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    test_run: TestRun,
}

impl Router {
    pub fn new(test_run: TestRun) -> Self {
        Self { test_run }
    }
    /// Routes one metric. `Ok(None)` means the metric is skipped.
    pub fn classify(&self, metric: &Metric, now: NaiveDateTime) -> Result<Option<Route>, RouteError> {
        match Kind::of(&metric.namespace) {
            None => Ok(None),
            Some(Kind::Sql) => Ok(Some(Route::Sql(self.sql(metric)))),
            Some(Kind::Wait) => self.wait(metric, now).map(Route::Wait).map(Some),
        }
    }
    fn sql(&self, metric: &Metric) -> SqlText {
        SqlText {
            hash: metric.get(tags::HASH).to_string(),
            text: metric.get(tags::TEXT).to_string(),
        }
    }
    fn wait(&self, metric: &Metric, now: NaiveDateTime) -> Result<WaitEvent, RouteError> {
        let value = metric
            .payload
            .wait_value()
            .ok_or_else(|| RouteError::Payload {
                namespace: metric.namespace.to_string(),
                expected: Payload::WaitValue(0).kind(),
                found: metric.payload.kind(),
            })?;
        Ok(WaitEvent {
            test_run: self.test_run,
            hash: Self::hash(metric).to_string(),
            kind: metric.get(tags::TYPE).to_string(),
            event_date: now,
            value,
        })
    }
    /// Statement hash of a wait sample: the `hash` tag, or the `sql` tag
    /// when `hash` is empty or missing.
    pub fn hash(metric: &Metric) -> &str {
        match metric.get(tags::HASH) {
            "" => metric.get(tags::SQL),
            hash => hash,
        }
    }
}
