use super::*;
use paf_core::Scope;
use paf_metrics::Metric;
use paf_metrics::Router;
use paf_mssql::ConnectionManager;
use paf_mssql::Connector;
use paf_mssql::Tds;

/// The publisher plugin.
///
/// Construct one per process and call [`publish`](Publisher::publish) for
/// every delivered batch; it owns the connection manager, so the database
/// connection is opened on the first batch and reused afterwards.
pub struct Publisher<C: Connector = Tds> {
    policy: Policy,
    connections: ConnectionManager<C>,
}

impl Publisher<Tds> {
    pub fn new() -> Self {
        Self::with_connector(Tds)
    }
}

impl Default for Publisher<Tds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Publisher<C> {
    pub fn with_connector(connector: C) -> Self {
        Self {
            policy: Policy::default(),
            connections: ConnectionManager::new(connector),
        }
    }
    /// Settings declared to the collection framework.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
    pub fn connections(&self) -> &ConnectionManager<C> {
        &self.connections
    }
    /// Publishes one batch.
    ///
    /// Configuration problems and a failed first connection are returned
    /// before any row work. Everything after that follows the configured
    /// [`Strictness`], except failures that break the session: those are
    /// returned and the shared connection is discarded, so the next batch
    /// opens a fresh one.
    pub async fn publish(&self, metrics: &[Metric], bundle: &Bundle) -> Result<Report, PublishError> {
        let config = Configuration::resolve(bundle, &self.policy)?;
        let scope = Scope::plugin().with("test-run", config.test_run);
        paf_core::threshold(&scope, &config.log_level);
        log::debug!("{} publishing {} metrics", scope, metrics.len());
        let shared = self
            .connections
            .ensure(&config.endpoint())
            .await
            .map_err(PublishError::ConnectionOpen)?;
        let mut session = shared.lock().await;
        let result = Pipeline::new(Router::new(config.test_run), config.strictness, &scope)
            .run(&mut *session, metrics)
            .await;
        drop(session);
        let report = match result {
            Err(e) if e.is_fatal() => {
                self.connections.invalidate(&shared).await;
                return Err(e);
            }
            result => result?,
        };
        if !report.is_clean() {
            log::warn!(
                "{} batch committed with {} absorbed failures",
                scope,
                report.failures.len()
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use paf_mssql::DPA_SQL;
    use paf_mssql::DPA_WAIT;
    use paf_mssql::Value;
    use std::sync::Arc;

    fn batch() -> Vec<Metric> {
        vec![
            Metric::new("a/b/sql").tag("hash", "h1").tag("text", "select 1"),
            Metric::new("a/b/wait").tag("hash", "h1").tag("type", "cpu").payload(42),
            Metric::new("a/b/other"),
        ]
    }

    #[tokio::test]
    async fn end_to_end_batch() {
        let publisher = Publisher::with_connector(Recording::default());
        let before = chrono::Local::now().naive_local();
        let report = publisher.publish(&batch(), &bundle()).await.unwrap();
        let after = chrono::Local::now().naive_local();
        let session = &publisher.connections().connector().session;
        assert_eq!(
            session.rows(DPA_SQL),
            vec![vec![
                Value::NVarChar("h1".into()),
                Value::NVarChar("select 1".into())
            ]]
        );
        let wait = session.rows(DPA_WAIT);
        assert_eq!(wait.len(), 1);
        let [test_run, hash, kind, Value::DateTime(when), value] = wait[0].as_slice() else {
            panic!("unexpected wait row {:?}", wait[0]);
        };
        assert_eq!(test_run, &Value::BigInt(7));
        assert_eq!(hash, &Value::NVarChar("h1".into()));
        assert_eq!(kind, &Value::NVarChar("cpu".into()));
        assert!(before <= *when && *when <= after);
        assert_eq!(value, &Value::Int(42));
        assert_eq!(report.skipped, 1);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn missing_field_fails_without_connecting() {
        let publisher = Publisher::with_connector(Recording::default());
        let mut b = bundle();
        b.remove(keys::USER);
        let err = publisher.publish(&batch(), &b).await.unwrap_err();
        assert!(matches!(
            err,
            PublishError::Config(ConfigError::MissingField { field: "user" })
        ));
        assert_eq!(publisher.connections().connector().opens(), 0);
        assert!(publisher.connections().connector().session.calls().is_empty());
    }

    #[tokio::test]
    async fn refused_connection_is_returned() {
        let publisher = Publisher::with_connector(Recording {
            refuse: true,
            ..Recording::default()
        });
        let err = publisher.publish(&batch(), &bundle()).await.unwrap_err();
        assert!(matches!(err, PublishError::ConnectionOpen(_)));
        assert!(!publisher.connections().initialized().await);
    }

    #[tokio::test]
    async fn connection_is_reused_across_batches() {
        let publisher = Publisher::with_connector(Recording::default());
        for _ in 0..3 {
            publisher.publish(&batch(), &bundle()).await.unwrap();
        }
        assert_eq!(publisher.connections().connector().opens(), 1);
        let session = &publisher.connections().connector().session;
        assert_eq!(session.rows(DPA_SQL).len(), 3);
        assert_eq!(session.rows(DPA_WAIT).len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_batches_share_one_connection() {
        let publisher = Arc::new(Publisher::with_connector(Recording::default()));
        let tasks = (0..8)
            .map(|_| {
                let publisher = publisher.clone();
                tokio::spawn(async move { publisher.publish(&batch(), &bundle()).await })
            })
            .collect::<Vec<_>>();
        for joined in futures::future::join_all(tasks).await {
            assert!(joined.unwrap().is_ok());
        }
        assert_eq!(publisher.connections().connector().opens(), 1);
        let calls = publisher.connections().connector().session.calls();
        let begins = calls.iter().filter(|c| **c == Call::Begin).count();
        let commits = calls.iter().filter(|c| **c == Call::Commit).count();
        assert_eq!((begins, commits), (8, 8));
        // transactions never interleave on the shared session
        for pair in calls.chunks(4) {
            assert_eq!(pair[0], Call::Begin);
            assert_eq!(pair[3], Call::Commit);
        }
    }

    #[tokio::test]
    async fn all_or_nothing_is_reported() {
        let publisher = Publisher::with_connector(Recording::default());
        let b = bundle().with(keys::STRICTNESS, "all-or-nothing");
        let batch = vec![Metric::new("a/wait").payload("not a number")];
        let err = publisher.publish(&batch, &b).await.unwrap_err();
        assert!(matches!(err, PublishError::Aborted(_)));
    }

    #[tokio::test]
    async fn broken_session_is_discarded_and_reopened() {
        let publisher = Publisher::with_connector(Recording {
            session: Recorder::failing(Faults {
                sever: Some(DPA_WAIT),
                ..Faults::default()
            }),
            ..Recording::default()
        });
        let err = publisher.publish(&batch(), &bundle()).await.unwrap_err();
        assert!(matches!(
            err,
            PublishError::Broken(Failure::Finalize { table: DPA_WAIT, .. })
        ));
        assert!(!publisher.connections().initialized().await);
        assert!(publisher.publish(&batch(), &bundle()).await.is_err());
        assert_eq!(publisher.connections().connector().opens(), 2);
    }

    #[tokio::test]
    async fn refused_flush_keeps_the_connection() {
        let publisher = Publisher::with_connector(Recording {
            session: Recorder::failing(Faults {
                copy: Some(DPA_WAIT),
                ..Faults::default()
            }),
            ..Recording::default()
        });
        for _ in 0..2 {
            let report = publisher.publish(&batch(), &bundle()).await.unwrap();
            assert_eq!(report.failures.len(), 1);
        }
        assert!(publisher.connections().initialized().await);
        assert_eq!(publisher.connections().connector().opens(), 1);
    }

    #[test]
    fn policy_is_exposed() {
        let publisher = Publisher::new();
        assert!(publisher.policy().rule(keys::TEST_RUN).unwrap().required);
    }
}
