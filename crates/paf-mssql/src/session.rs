use super::*;

/// Begins an explicit transaction.
pub const BEGIN: &str = "BEGIN TRANSACTION";
/// Commits the open transaction.
pub const COMMIT: &str = "COMMIT TRANSACTION";
/// Rolls the open transaction back.
pub const ROLLBACK: &str = "IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION";

/// Transactional bulk-load interface of one database session.
///
/// The publish pipeline only ever talks to the database through this
/// trait, so tests can stand in a recording session for a live server.
#[async_trait::async_trait]
pub trait Session: Send {
    async fn begin(&mut self) -> Result<(), MssqlError>;
    /// Ships every pending row of `bulk` as one bulk load and returns the
    /// number of rows the server reports as copied. Rows that do not fit
    /// the table fail before the load is announced; a failure after that
    /// is fatal to the session (see [`MssqlError::is_fatal`]).
    async fn copy(&mut self, bulk: Bulk) -> Result<u64, MssqlError>;
    async fn commit(&mut self) -> Result<(), MssqlError>;
    async fn rollback(&mut self) -> Result<(), MssqlError>;
}

#[async_trait::async_trait]
impl Session for Mssql {
    async fn begin(&mut self) -> Result<(), MssqlError> {
        self.simple_query(BEGIN).await?.into_results().await?;
        Ok(())
    }
    async fn copy(&mut self, bulk: Bulk) -> Result<u64, MssqlError> {
        log::debug!("{} ({} rows)", bulk.insert(), bulk.len());
        let table = bulk.table();
        let columns = layout(self, table).await?;
        let rows = bulk.encode(&columns)?;
        let mut request = self.bulk_insert(table).await?;
        for row in rows {
            request
                .send(row)
                .await
                .map_err(|source| MssqlError::Interrupted { table, source })?;
        }
        let result = request.finalize().await?;
        Ok(result.total())
    }
    async fn commit(&mut self) -> Result<(), MssqlError> {
        self.simple_query(COMMIT).await?.into_results().await?;
        Ok(())
    }
    async fn rollback(&mut self) -> Result<(), MssqlError> {
        self.simple_query(ROLLBACK).await?.into_results().await?;
        Ok(())
    }
}
