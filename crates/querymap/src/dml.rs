//! UPDATE and DELETE executors.
//!
//! Both take ownership of a prepared [`Statement`] (usually the WHERE clause of an
//! entity query), bind it to a table, compile it with the connection's compiler
//! and return the affected-row count. Neither reads rows back.

use crate::client::Connection;
use crate::config::{ManagerConfig, StatementKind};
use crate::error::OrmResult;
use crate::stmt::{Statement, Value};

/// DELETE bound to one target table.
pub struct Delete<'a, C: Connection> {
    connection: &'a C,
    config: &'a ManagerConfig,
    statement: Statement,
}

impl<'a, C: Connection> Delete<'a, C> {
    /// Bind `statement` to delete from `table`.
    pub fn new(
        connection: &'a C,
        config: &'a ManagerConfig,
        table: impl Into<String>,
        mut statement: Statement,
    ) -> Self {
        statement.set_from([table.into()]);
        Self {
            connection,
            config,
            statement,
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Execute the DELETE. `tables` names additional tables referenced by the
    /// WHERE clause; it replaces any previously set table list.
    pub async fn delete<I, S>(mut self, tables: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_tables(tables);
        let compiled = self.connection.compiler().delete(&self.statement);
        let target = self.statement.from().join(", ");
        self.config
            .log_statement(StatementKind::Delete, &target, &compiled);
        self.connection
            .execute(&compiled.sql, &compiled.params_ref())
            .await
    }
}

/// UPDATE bound to one target table.
pub struct Update<'a, C: Connection> {
    connection: &'a C,
    config: &'a ManagerConfig,
    statement: Statement,
}

impl<'a, C: Connection> Update<'a, C> {
    /// Bind `statement` to update `table`.
    pub fn new(
        connection: &'a C,
        config: &'a ManagerConfig,
        table: impl Into<String>,
        mut statement: Statement,
    ) -> Self {
        statement.add_tables([table.into()]);
        Self {
            connection,
            config,
            statement,
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Execute the UPDATE with one assignment per entry, in order.
    pub async fn update<I, K, V>(mut self, columns: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.statement.add_update_columns(columns);
        let compiled = self.connection.compiler().update(&self.statement);
        let target = self.statement.tables().join(", ");
        self.config
            .log_statement(StatementKind::Update, &target, &compiled);
        self.connection
            .execute(&compiled.sql, &compiled.params_ref())
            .await
    }
}
