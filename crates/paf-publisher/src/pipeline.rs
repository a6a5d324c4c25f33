use super::*;
use paf_core::Scope;
use paf_metrics::Metric;
use paf_metrics::Route;
use paf_metrics::Router;
use paf_metrics::SqlText;
use paf_metrics::WaitEvent;
use paf_mssql::Bulk;
use paf_mssql::MssqlError;
use paf_mssql::Session;

/// The pair of bulk sets filled while a batch is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Load {
    sql: Bulk,
    wait: Bulk,
}

impl Load {
    pub fn prepare() -> Self {
        Self {
            sql: Bulk::prepare::<SqlText>(),
            wait: Bulk::prepare::<WaitEvent>(),
        }
    }
    /// Appends a routed row to the bulk set of its table.
    pub fn append(&mut self, route: Route) -> Result<(), MssqlError> {
        match route {
            Route::Sql(row) => self.sql.append(row),
            Route::Wait(row) => self.wait.append(row),
        }
    }
    pub fn sql(&self) -> &Bulk {
        &self.sql
    }
    pub fn wait(&self) -> &Bulk {
        &self.wait
    }
    /// Both bulk sets in flush order.
    pub fn into_bulks(self) -> [Bulk; 2] {
        [self.sql, self.wait]
    }
}

/// What one publish did.
#[derive(Debug, Default)]
pub struct Report {
    /// Rows the server reported copied into `dpa_sql`.
    pub sql: u64,
    /// Rows the server reported copied into `dpa_wait`.
    pub wait: u64,
    /// Metrics whose namespace matched no route.
    pub skipped: usize,
    /// Failures absorbed under best-effort strictness.
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One transactional bulk load of a batch.
///
/// Begins a transaction, classifies every metric into a [`Load`], flushes
/// both bulk sets and commits. Under [`Strictness::BestEffort`] row,
/// finalize and commit failures are logged and collected in the
/// [`Report`]; under [`Strictness::AllOrNothing`] the first of them rolls
/// the transaction back and is returned. A failure that breaks the session
/// stops the batch in either mode.
pub struct Pipeline<'a> {
    router: Router,
    strictness: Strictness,
    scope: &'a Scope,
}

impl<'a> Pipeline<'a> {
    pub fn new(router: Router, strictness: Strictness, scope: &'a Scope) -> Self {
        Self {
            router,
            strictness,
            scope,
        }
    }

    pub async fn run<S>(&self, session: &mut S, metrics: &[Metric]) -> Result<Report, PublishError>
    where
        S: Session + ?Sized,
    {
        let ref mut report = Report::default();
        session.begin().await.map_err(PublishError::Begin)?;
        let mut load = Load::prepare();
        log::debug!("{} prepared {} and {}", self.scope, load.sql().insert(), load.wait().insert());
        for (index, metric) in metrics.iter().enumerate() {
            log::debug!("{} metric namespace {}", self.scope, metric.namespace);
            let now = chrono::Local::now().naive_local();
            let failure = match self.router.classify(metric, now) {
                Ok(None) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(Some(route)) => match load.append(route) {
                    Ok(()) => continue,
                    Err(source) => Failure::Append {
                        index,
                        namespace: metric.namespace.to_string(),
                        source,
                    },
                },
                Err(source) => Failure::Route { index, source },
            };
            self.absorb(session, report, failure).await?;
        }
        for bulk in load.into_bulks() {
            let table = bulk.table();
            match session.copy(bulk).await {
                Ok(n) => {
                    log::info!("{} {} rows copied into {}", self.scope, n, table);
                    match table {
                        paf_mssql::DPA_SQL => report.sql = n,
                        _ => report.wait = n,
                    }
                }
                Err(source) => {
                    let failure = Failure::Finalize { table, source };
                    self.absorb(session, report, failure).await?;
                }
            }
        }
        if let Err(source) = session.commit().await {
            let failure = Failure::Commit(source);
            if !failure.is_fatal() {
                self.rollback(session).await;
            }
            self.absorb(session, report, failure).await?;
        }
        Ok(std::mem::take(report))
    }

    /// Logs a failure, then either records it or aborts the batch.
    ///
    /// A fatal failure ends the batch whatever the strictness, without
    /// sending anything more on the session.
    async fn absorb<S>(&self, session: &mut S, report: &mut Report, failure: Failure) -> Result<(), PublishError>
    where
        S: Session + ?Sized,
    {
        log::error!("{} class={} {}", self.scope, failure.class(), failure);
        if failure.is_fatal() {
            return Err(PublishError::Broken(failure));
        }
        match self.strictness {
            Strictness::BestEffort => {
                report.failures.push(failure);
                Ok(())
            }
            Strictness::AllOrNothing => {
                if !matches!(failure, Failure::Commit(_)) {
                    self.rollback(session).await;
                }
                Err(PublishError::Aborted(failure))
            }
        }
    }

    async fn rollback<S>(&self, session: &mut S)
    where
        S: Session + ?Sized,
    {
        if let Err(e) = session.rollback().await {
            log::error!("{} rollback failed: {}", self.scope, e);
        }
    }
}
