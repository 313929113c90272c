//! The statement aggregate handed to a [`crate::compiler::Compiler`].

use crate::stmt::condition::{ConditionGroup, Value};
use crate::stmt::expression::Expression;
use crate::stmt::having::HavingGroup;
use crate::stmt::join::{JoinKind, JoinSpec};

/// One `column = value` entry of an UPDATE.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

/// A projected column, optionally aliased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectColumn {
    pub expr: String,
    pub alias: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub order: Order,
}

/// Mutable statement state built incrementally and consumed once by a compiler.
///
/// For SELECT, `tables` is the FROM list. For DELETE, `from` holds the target
/// table and `tables` the extra tables named by the caller. For UPDATE, `tables`
/// holds the updated table.
#[derive(Clone, Debug, Default)]
pub struct Statement {
    wheres: ConditionGroup,
    having: HavingGroup,
    joins: Vec<JoinSpec>,
    tables: Vec<String>,
    assignments: Vec<Assignment>,
    columns: Vec<SelectColumn>,
    distinct: bool,
    from: Vec<String>,
    group_by: Vec<String>,
    order: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    pub fn wheres(&self) -> &ConditionGroup {
        &self.wheres
    }

    pub fn wheres_mut(&mut self) -> &mut ConditionGroup {
        &mut self.wheres
    }

    pub fn having(&self) -> &HavingGroup {
        &self.having
    }

    pub fn having_mut(&mut self) -> &mut HavingGroup {
        &mut self.having
    }

    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn columns(&self) -> &[SelectColumn] {
        &self.columns
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn from(&self) -> &[String] {
        &self.from
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn order(&self) -> &[OrderBy] {
        &self.order
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    // ==================== Mutators ====================

    /// Append a join whose ON clause is built by `f`. Join order is preserved.
    pub fn add_join<I, S>(
        &mut self,
        kind: JoinKind,
        tables: I,
        f: impl FnOnce(&mut ConditionGroup),
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.joins.push(JoinSpec::build(kind, tables, f));
        self
    }

    /// Replace the table list. Repeated calls reset it.
    pub fn add_tables<I, S>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Append one assignment per entry, in order.
    ///
    /// Entries are not merged by column name: assigning the same column twice
    /// yields two assignments.
    pub fn add_update_columns<I, C, V>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        for (column, value) in columns {
            self.assignments.push(Assignment {
                column: column.into(),
                value: value.into(),
            });
        }
        self
    }

    /// Append an assignment whose value is built by `f`.
    pub fn add_update_column_with(
        &mut self,
        column: impl Into<String>,
        f: impl FnOnce(&mut Expression),
    ) -> &mut Self {
        self.assignments.push(Assignment {
            column: column.into(),
            value: Value::Expression(Expression::build(f)),
        });
        self
    }

    /// Append a projected column.
    pub fn add_column(&mut self, expr: impl Into<String>, alias: Option<String>) -> &mut Self {
        self.columns.push(SelectColumn {
            expr: expr.into(),
            alias,
        });
        self
    }

    /// Replace the projection. An empty list selects `*`.
    pub fn set_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns
            .into_iter()
            .map(|c| SelectColumn {
                expr: c.into(),
                alias: None,
            })
            .collect();
        self
    }

    pub fn set_distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    pub fn set_from<I, S>(&mut self, from: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from = from.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.group_by.push(column.into());
        self
    }

    pub fn add_order(&mut self, column: impl Into<String>, order: Order) -> &mut Self {
        self.order.push(OrderBy {
            column: column.into(),
            order,
        });
        self
    }

    pub fn set_limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn set_offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }
}
