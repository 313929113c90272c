//! Nested SELECT used by `IN (...)` and `EXISTS (...)` predicates.

use crate::stmt::condition::ConditionGroup;
use crate::stmt::join::JoinKind;
use crate::stmt::statement::{Order, Statement};

/// A select-only view over a nested [`Statement`].
///
/// ```ignore
/// group.add_in_subquery("id", |q| {
///     q.from(["orders"]).select(["user_id"]);
///     q.and_where("total").gt(100i64);
/// }, Separator::And, false);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Subquery {
    statement: Statement,
}

impl Subquery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a fresh subquery and return it.
    pub fn build(f: impl FnOnce(&mut Subquery)) -> Self {
        let mut subquery = Self::new();
        f(&mut subquery);
        subquery
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn statement_mut(&mut self) -> &mut Statement {
        &mut self.statement
    }

    /// Set the FROM tables.
    pub fn from<I, S>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_tables(tables);
        self
    }

    /// Set the projected columns.
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.set_columns(columns);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.statement.set_distinct(true);
        self
    }

    pub fn join<I, S>(
        &mut self,
        kind: JoinKind,
        tables: I,
        f: impl FnOnce(&mut ConditionGroup),
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_join(kind, tables, f);
        self
    }

    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.statement.add_group_by(column);
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, order: Order) -> &mut Self {
        self.statement.add_order(column, order);
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.statement.set_limit(limit);
        self
    }
}
