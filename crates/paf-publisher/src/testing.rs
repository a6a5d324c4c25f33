//! Recording stand-ins for the database used across this crate's tests.
use super::*;
use paf_mssql::Bulk;
use paf_mssql::Connector;
use paf_mssql::Endpoint;
use paf_mssql::MssqlError;
use paf_mssql::Session;
use paf_mssql::Value;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Complete bundle pointing at a local server with test run 7.
pub fn bundle() -> Bundle {
    Bundle::default()
        .with(keys::HOST, "localhost")
        .with(keys::PORT, 1433)
        .with(keys::DATABASE, "dpa")
        .with(keys::USER, "sa")
        .with(keys::PASSWORD, "secret")
        .with(keys::TEST_RUN, 7)
}

/// What a session was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Begin,
    Copy(&'static str, Vec<Vec<Value>>),
    Commit,
    Rollback,
}

/// Which session steps should fail.
///
/// `begin`, `copy` and `commit` fail the way a server refusal does and
/// leave the session usable. `sever` and `sever_commit` drop the wire.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub begin: bool,
    pub copy: Option<&'static str>,
    pub commit: bool,
    pub sever: Option<&'static str>,
    pub sever_commit: bool,
}

fn refused() -> MssqlError {
    MssqlError::Tds(tiberius::error::Error::Conversion("injected".into()))
}

fn reset() -> tiberius::error::Error {
    tiberius::error::Error::Io {
        kind: std::io::ErrorKind::ConnectionReset,
        message: "injected".into(),
    }
}

/// Session that records every call into a shared log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub faults: Faults,
}

impl Recorder {
    pub fn failing(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
    /// Rows shipped to `table`, across all copies.
    pub fn rows(&self, table: &str) -> Vec<Vec<Value>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Copy(t, rows) if t == table => Some(rows),
                _ => None,
            })
            .flatten()
            .collect()
    }
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl Session for Recorder {
    async fn begin(&mut self) -> Result<(), MssqlError> {
        self.push(Call::Begin);
        if self.faults.begin { Err(refused()) } else { Ok(()) }
    }
    async fn copy(&mut self, bulk: Bulk) -> Result<u64, MssqlError> {
        let table = bulk.table();
        let n = bulk.len() as u64;
        self.push(Call::Copy(table, bulk.into_rows()));
        if self.faults.sever == Some(table) {
            Err(MssqlError::Interrupted { table, source: reset() })
        } else if self.faults.copy == Some(table) {
            Err(refused())
        } else {
            Ok(n)
        }
    }
    async fn commit(&mut self) -> Result<(), MssqlError> {
        self.push(Call::Commit);
        if self.faults.sever_commit {
            Err(MssqlError::Tds(reset()))
        } else if self.faults.commit {
            Err(refused())
        } else {
            Ok(())
        }
    }
    async fn rollback(&mut self) -> Result<(), MssqlError> {
        self.push(Call::Rollback);
        Ok(())
    }
}

/// Connector handing out clones of one recorder and counting opens.
#[derive(Debug, Default)]
pub struct Recording {
    pub session: Recorder,
    pub opens: AtomicUsize,
    pub refuse: bool,
}

impl Recording {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Connector for Recording {
    type Session = Recorder;
    async fn connect(&self, _: &Endpoint) -> Result<Recorder, MssqlError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            Err(MssqlError::Io(std::io::Error::other("refused")))
        } else {
            Ok(self.session.clone())
        }
    }
}
