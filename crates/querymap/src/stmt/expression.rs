//! Programmatically built right-hand sides.
//!
//! An [`Expression`] is an ordered list of parts that the compiler renders one after
//! another, separated by spaces. It is used wherever a value is not a plain literal,
//! e.g. column-to-column comparisons or `SET total = total + $1`.

use crate::param::Param;
use tokio_postgres::types::ToSql;

/// Aggregate functions an expression can call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFn {
    /// SQL function name.
    pub fn as_sql(self) -> &'static str {
        match self {
            AggregateFn::Count => "COUNT",
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
        }
    }
}

/// One part of an [`Expression`].
#[derive(Clone, Debug)]
pub enum ExprPart {
    /// Column reference, rendered verbatim.
    Column(String),
    /// Operator token such as `+` or `||`.
    Op(String),
    /// Bound value, rendered as a placeholder.
    Value(Param),
    /// Parenthesized sub-expression.
    Group(Expression),
    /// Aggregate call over a column: `COUNT(DISTINCT col)`.
    Function {
        func: AggregateFn,
        column: String,
        distinct: bool,
    },
    /// Raw SQL fragment without parameters.
    Raw(String),
}

/// Builder for a computed value.
#[derive(Clone, Debug, Default)]
pub struct Expression {
    parts: Vec<ExprPart>,
}

impl Expression {
    /// Create an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression consisting of a single column reference.
    pub fn of_column(column: impl Into<String>) -> Self {
        let mut expr = Self::new();
        expr.column(column);
        expr
    }

    /// Run `f` against a fresh expression and return the result.
    pub fn build(f: impl FnOnce(&mut Expression)) -> Self {
        let mut expr = Self::new();
        f(&mut expr);
        expr
    }

    /// Append a column reference.
    pub fn column(&mut self, column: impl Into<String>) -> &mut Self {
        self.parts.push(ExprPart::Column(column.into()));
        self
    }

    /// Append an operator.
    pub fn op(&mut self, op: impl Into<String>) -> &mut Self {
        self.parts.push(ExprPart::Op(op.into()));
        self
    }

    /// Append a bound value.
    pub fn value<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.parts.push(ExprPart::Value(Param::new(value)));
        self
    }

    /// Append a parenthesized sub-expression built by `f`.
    pub fn group(&mut self, f: impl FnOnce(&mut Expression)) -> &mut Self {
        self.parts.push(ExprPart::Group(Expression::build(f)));
        self
    }

    /// Append a raw SQL fragment.
    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.parts.push(ExprPart::Raw(sql.into()));
        self
    }

    pub fn plus(&mut self) -> &mut Self {
        self.op("+")
    }

    pub fn minus(&mut self) -> &mut Self {
        self.op("-")
    }

    pub fn times(&mut self) -> &mut Self {
        self.op("*")
    }

    pub fn divide(&mut self) -> &mut Self {
        self.op("/")
    }

    /// Append `COUNT(column)`, optionally `COUNT(DISTINCT column)`.
    pub fn count(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.function(AggregateFn::Count, column, distinct)
    }

    pub fn sum(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.function(AggregateFn::Sum, column, distinct)
    }

    pub fn avg(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.function(AggregateFn::Avg, column, distinct)
    }

    pub fn min(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.function(AggregateFn::Min, column, distinct)
    }

    pub fn max(&mut self, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.function(AggregateFn::Max, column, distinct)
    }

    fn function(&mut self, func: AggregateFn, column: impl Into<String>, distinct: bool) -> &mut Self {
        self.parts.push(ExprPart::Function {
            func,
            column: column.into(),
            distinct,
        });
        self
    }

    /// The recorded parts, in order.
    pub fn parts(&self) -> &[ExprPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Aggregate text helpers for HAVING clauses, which are keyed by expression text.
///
/// ```ignore
/// query.having(Aggregate::count("id")).gt(5i64);
/// ```
pub struct Aggregate;

impl Aggregate {
    pub fn count(column: &str) -> String {
        format!("COUNT({column})")
    }

    pub fn count_distinct(column: &str) -> String {
        format!("COUNT(DISTINCT {column})")
    }

    pub fn sum(column: &str) -> String {
        format!("SUM({column})")
    }

    pub fn avg(column: &str) -> String {
        format!("AVG({column})")
    }

    pub fn min(column: &str) -> String {
        format!("MIN({column})")
    }

    pub fn max(column: &str) -> String {
        format!("MAX({column})")
    }
}
