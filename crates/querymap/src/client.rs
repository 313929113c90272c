//! Connection trait for executing compiled statements.

use crate::compiler::{Compiler, PgCompiler};
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A database handle paired with the compiler for its dialect.
///
/// Implemented for `tokio_postgres::Client`, `tokio_postgres::Transaction` and,
/// with the `pool` feature, `deadpool_postgres::Client`. Driver errors are
/// surfaced unchanged apart from constraint classification in
/// [`OrmError::from_db_error`].
pub trait Connection: Send + Sync {
    /// Compiler used to render statements for this connection.
    fn compiler(&self) -> &dyn Compiler;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Record>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;
}

fn to_records(rows: Vec<Row>) -> OrmResult<Vec<Record>> {
    rows.iter().map(Record::from_pg_row).collect()
}

impl Connection for tokio_postgres::Client {
    fn compiler(&self) -> &dyn Compiler {
        &PgCompiler
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Record>> {
        let rows = tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)?;
        to_records(rows)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)
    }
}

impl Connection for tokio_postgres::Transaction<'_> {
    fn compiler(&self) -> &dyn Compiler {
        &PgCompiler
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Record>> {
        let rows = tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)?;
        to_records(rows)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(OrmError::from_db_error)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Connection for deadpool_postgres::Client {
    fn compiler(&self) -> &dyn Compiler {
        &PgCompiler
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Record>> {
        // Delegate to the deref target (ClientWrapper -> tokio_postgres::Client).
        let client: &tokio_postgres::Client = self;
        Connection::query(client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        let client: &tokio_postgres::Client = self;
        Connection::execute(client, sql, params).await
    }
}
