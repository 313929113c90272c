//! Fluent WHERE/HAVING layer.
//!
//! This layer decides separators and negation; the groups below it only store
//! what they are given.
//!
//! ```ignore
//! query
//!     .and_where("status").is("active")
//!     .or_where_group(|g| {
//!         g.and_where("role").is("admin").and_where("age").at_least(18i32);
//!     })
//!     .and_where("deleted_at").is_null();
//! ```

use crate::param::Param;
use crate::stmt::condition::{ConditionGroup, Separator, Value};
use crate::stmt::expression::Expression;
use crate::stmt::having::HavingGroup;
use crate::stmt::statement::Statement;
use crate::stmt::subquery::Subquery;
use tokio_postgres::types::ToSql;

/// Anything that owns a WHERE (or ON) condition group.
pub trait Conditional: Sized {
    fn conditions_mut(&mut self) -> &mut ConditionGroup;

    /// Start an AND-joined predicate on `column`.
    fn and_where(&mut self, column: impl Into<String>) -> WhereClause<'_, Self> {
        WhereClause::new(self, column.into(), Separator::And)
    }

    /// Start an OR-joined predicate on `column`.
    fn or_where(&mut self, column: impl Into<String>) -> WhereClause<'_, Self> {
        WhereClause::new(self, column.into(), Separator::Or)
    }

    /// AND-joined parenthesized group built by `f`.
    fn and_where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.conditions_mut().add_nested(f, Separator::And);
        self
    }

    /// OR-joined parenthesized group built by `f`.
    fn or_where_group(&mut self, f: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        self.conditions_mut().add_nested(f, Separator::Or);
        self
    }

    fn where_exists(&mut self, f: impl FnOnce(&mut Subquery)) -> &mut Self {
        self.conditions_mut().add_exists(f, Separator::And, false);
        self
    }

    fn where_not_exists(&mut self, f: impl FnOnce(&mut Subquery)) -> &mut Self {
        self.conditions_mut().add_exists(f, Separator::And, true);
        self
    }

    fn or_where_exists(&mut self, f: impl FnOnce(&mut Subquery)) -> &mut Self {
        self.conditions_mut().add_exists(f, Separator::Or, false);
        self
    }

    fn or_where_not_exists(&mut self, f: impl FnOnce(&mut Subquery)) -> &mut Self {
        self.conditions_mut().add_exists(f, Separator::Or, true);
        self
    }
}

impl Conditional for ConditionGroup {
    fn conditions_mut(&mut self) -> &mut ConditionGroup {
        self
    }
}

impl Conditional for Statement {
    fn conditions_mut(&mut self) -> &mut ConditionGroup {
        self.wheres_mut()
    }
}

impl Conditional for Subquery {
    fn conditions_mut(&mut self) -> &mut ConditionGroup {
        self.statement_mut().wheres_mut()
    }
}

/// A pending predicate on one column. Each terminal method appends exactly one
/// node and hands the target back for chaining.
#[must_use = "a WhereClause does nothing until a comparison method is called"]
pub struct WhereClause<'a, T: Conditional> {
    target: &'a mut T,
    column: String,
    separator: Separator,
}

impl<'a, T: Conditional> WhereClause<'a, T> {
    fn new(target: &'a mut T, column: String, separator: Separator) -> Self {
        Self {
            target,
            column,
            separator,
        }
    }

    fn apply(self, f: impl FnOnce(&mut ConditionGroup, String, Separator)) -> &'a mut T {
        let WhereClause {
            target,
            column,
            separator,
        } = self;
        f(target.conditions_mut(), column, separator);
        target
    }

    /// `column <op> value` with an arbitrary operator.
    pub fn compare(self, op: &str, value: impl Into<Value>) -> &'a mut T {
        let value = value.into();
        let op = op.to_string();
        self.apply(|g, c, s| {
            g.add_column(c, value, op, s);
        })
    }

    /// `column <op> <expression>` with the expression built by `f`.
    pub fn compare_with(self, op: &str, f: impl FnOnce(&mut Expression)) -> &'a mut T {
        let op = op.to_string();
        self.apply(|g, c, s| {
            g.add_column_with(c, f, op, s);
        })
    }

    /// `column = value`
    pub fn is<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("=", Value::literal(value))
    }

    /// `column != value`
    pub fn is_not<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("!=", Value::literal(value))
    }

    /// `column < value`
    pub fn lt<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("<", Value::literal(value))
    }

    /// `column > value`
    pub fn gt<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare(">", Value::literal(value))
    }

    /// `column <= value`
    pub fn at_most<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("<=", Value::literal(value))
    }

    /// `column >= value`
    pub fn at_least<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare(">=", Value::literal(value))
    }

    /// `column = other_column`
    pub fn is_column(self, other: impl Into<String>) -> &'a mut T {
        self.compare("=", Value::column(other))
    }

    pub fn like(self, pattern: impl Into<String>) -> &'a mut T {
        let pattern = pattern.into();
        self.apply(|g, c, s| {
            g.add_like(c, pattern, s, false);
        })
    }

    pub fn not_like(self, pattern: impl Into<String>) -> &'a mut T {
        let pattern = pattern.into();
        self.apply(|g, c, s| {
            g.add_like(c, pattern, s, true);
        })
    }

    pub fn between<V: ToSql + Send + Sync + 'static>(self, low: V, high: V) -> &'a mut T {
        self.apply(|g, c, s| {
            g.add_between(c, Param::new(low), Param::new(high), s, false);
        })
    }

    pub fn not_between<V: ToSql + Send + Sync + 'static>(self, low: V, high: V) -> &'a mut T {
        self.apply(|g, c, s| {
            g.add_between(c, Param::new(low), Param::new(high), s, true);
        })
    }

    pub fn in_list<V, I>(self, values: I) -> &'a mut T
    where
        V: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Param::new).collect();
        self.apply(|g, c, s| {
            g.add_in(c, values, s, false);
        })
    }

    pub fn not_in<V, I>(self, values: I) -> &'a mut T
    where
        V: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Param::new).collect();
        self.apply(|g, c, s| {
            g.add_in(c, values, s, true);
        })
    }

    pub fn in_subquery(self, f: impl FnOnce(&mut Subquery)) -> &'a mut T {
        self.apply(|g, c, s| {
            g.add_in_subquery(c, f, s, false);
        })
    }

    pub fn not_in_subquery(self, f: impl FnOnce(&mut Subquery)) -> &'a mut T {
        self.apply(|g, c, s| {
            g.add_in_subquery(c, f, s, true);
        })
    }

    pub fn is_null(self) -> &'a mut T {
        self.apply(|g, c, s| {
            g.add_null(c, s, false);
        })
    }

    pub fn not_null(self) -> &'a mut T {
        self.apply(|g, c, s| {
            g.add_null(c, s, true);
        })
    }
}

/// Anything that owns a HAVING group.
pub trait Havingable: Sized {
    fn having_conditions_mut(&mut self) -> &mut HavingGroup;

    /// Start an AND-joined predicate on an aggregate expression such as `COUNT(id)`.
    fn and_having(&mut self, aggregate: impl Into<String>) -> HavingClause<'_, Self> {
        HavingClause::new(self, aggregate.into(), Separator::And)
    }

    fn or_having(&mut self, aggregate: impl Into<String>) -> HavingClause<'_, Self> {
        HavingClause::new(self, aggregate.into(), Separator::Or)
    }

    fn and_having_group(&mut self, f: impl FnOnce(&mut HavingGroup)) -> &mut Self {
        self.having_conditions_mut().add_nested(f, Separator::And);
        self
    }

    fn or_having_group(&mut self, f: impl FnOnce(&mut HavingGroup)) -> &mut Self {
        self.having_conditions_mut().add_nested(f, Separator::Or);
        self
    }
}

impl Havingable for HavingGroup {
    fn having_conditions_mut(&mut self) -> &mut HavingGroup {
        self
    }
}

impl Havingable for Statement {
    fn having_conditions_mut(&mut self) -> &mut HavingGroup {
        self.having_mut()
    }
}

impl Havingable for Subquery {
    fn having_conditions_mut(&mut self) -> &mut HavingGroup {
        self.statement_mut().having_mut()
    }
}

/// A pending predicate on one aggregate expression.
#[must_use = "a HavingClause does nothing until a comparison method is called"]
pub struct HavingClause<'a, T: Havingable> {
    target: &'a mut T,
    aggregate: String,
    separator: Separator,
}

impl<'a, T: Havingable> HavingClause<'a, T> {
    fn new(target: &'a mut T, aggregate: String, separator: Separator) -> Self {
        Self {
            target,
            aggregate,
            separator,
        }
    }

    fn apply(self, f: impl FnOnce(&mut HavingGroup, String, Separator)) -> &'a mut T {
        let HavingClause {
            target,
            aggregate,
            separator,
        } = self;
        f(target.having_conditions_mut(), aggregate, separator);
        target
    }

    pub fn compare(self, op: &str, value: impl Into<Value>) -> &'a mut T {
        let value = value.into();
        let op = op.to_string();
        self.apply(|g, a, s| {
            g.add_aggregate(a, value, op, s);
        })
    }

    pub fn compare_with(self, op: &str, f: impl FnOnce(&mut Expression)) -> &'a mut T {
        let op = op.to_string();
        self.apply(|g, a, s| {
            g.add_aggregate_with(a, f, op, s);
        })
    }

    pub fn is<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("=", Value::literal(value))
    }

    pub fn is_not<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("!=", Value::literal(value))
    }

    pub fn lt<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("<", Value::literal(value))
    }

    pub fn gt<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare(">", Value::literal(value))
    }

    pub fn at_most<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare("<=", Value::literal(value))
    }

    pub fn at_least<V: ToSql + Send + Sync + 'static>(self, value: V) -> &'a mut T {
        self.compare(">=", Value::literal(value))
    }

    pub fn in_list<V, I>(self, values: I) -> &'a mut T
    where
        V: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Param::new).collect();
        self.apply(|g, a, s| {
            g.add_in(a, values, s, false);
        })
    }

    pub fn not_in<V, I>(self, values: I) -> &'a mut T
    where
        V: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Param::new).collect();
        self.apply(|g, a, s| {
            g.add_in(a, values, s, true);
        })
    }

    pub fn in_subquery(self, f: impl FnOnce(&mut Subquery)) -> &'a mut T {
        self.apply(|g, a, s| {
            g.add_in_subquery(a, f, s, false);
        })
    }

    pub fn not_in_subquery(self, f: impl FnOnce(&mut Subquery)) -> &'a mut T {
        self.apply(|g, a, s| {
            g.add_in_subquery(a, f, s, true);
        })
    }

    pub fn between<V: ToSql + Send + Sync + 'static>(self, low: V, high: V) -> &'a mut T {
        self.apply(|g, a, s| {
            g.add_between(a, Param::new(low), Param::new(high), s, false);
        })
    }

    pub fn not_between<V: ToSql + Send + Sync + 'static>(self, low: V, high: V) -> &'a mut T {
        self.apply(|g, a, s| {
            g.add_between(a, Param::new(low), Param::new(high), s, true);
        })
    }
}
