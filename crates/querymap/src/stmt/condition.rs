//! WHERE/ON predicate trees.
//!
//! A [`ConditionGroup`] is an ordered sequence of [`Condition`] nodes. Every node
//! stores the [`Separator`] joining it to the node before it; the compiler ignores
//! the separator of the node at position 0. Grouping comes only from
//! [`Condition::Nested`], there is no implicit precedence between nodes.
//!
//! The `add_*` methods store exactly what they are given. Separators and negation
//! are decided by the caller (usually the fluent layer in [`super::fluent`]), and
//! nothing is validated here: an empty `IN` list is kept as-is and left to the
//! compiler.

use crate::param::Param;
use crate::stmt::expression::Expression;
use crate::stmt::subquery::Subquery;
use tokio_postgres::types::ToSql;

/// Boolean connective joining a node to its predecessor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Separator {
    #[default]
    And,
    Or,
}

impl Separator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Separator::And => "AND",
            Separator::Or => "OR",
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Clone, Debug)]
pub enum Value {
    /// A bound literal.
    Literal(Param),
    /// A value built through an [`Expression`].
    Expression(Expression),
}

impl Value {
    /// Wrap a literal value.
    pub fn literal<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Value::Literal(Param::new(value))
    }

    /// Reference another column.
    pub fn column(column: impl Into<String>) -> Self {
        Value::Expression(Expression::of_column(column))
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Value::Expression(expr) => Some(expr),
            Value::Literal(_) => None,
        }
    }
}

impl From<Param> for Value {
    fn from(param: Param) -> Self {
        Value::Literal(param)
    }
}

impl From<Expression> for Value {
    fn from(expr: Expression) -> Self {
        Value::Expression(expr)
    }
}

/// One predicate node of a WHERE or ON clause.
#[derive(Clone, Debug)]
pub enum Condition {
    /// `column <operator> value`
    Column {
        column: String,
        value: Value,
        operator: String,
        separator: Separator,
    },
    /// `column [NOT] LIKE pattern`
    Like {
        column: String,
        pattern: String,
        separator: Separator,
        negated: bool,
    },
    /// `column [NOT] BETWEEN low AND high`
    Between {
        column: String,
        low: Param,
        high: Param,
        separator: Separator,
        negated: bool,
    },
    /// `column [NOT] IN (values...)`
    In {
        column: String,
        values: Vec<Param>,
        separator: Separator,
        negated: bool,
    },
    /// `column [NOT] IN (SELECT ...)`
    InSubquery {
        column: String,
        subquery: Box<Subquery>,
        separator: Separator,
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    IsNull {
        column: String,
        separator: Separator,
        negated: bool,
    },
    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        subquery: Box<Subquery>,
        separator: Separator,
        negated: bool,
    },
    /// Parenthesized sub-tree.
    Nested {
        children: Vec<Condition>,
        separator: Separator,
    },
}

impl Condition {
    /// Separator joining this node to the previous one.
    pub fn separator(&self) -> Separator {
        match self {
            Condition::Column { separator, .. }
            | Condition::Like { separator, .. }
            | Condition::Between { separator, .. }
            | Condition::In { separator, .. }
            | Condition::InSubquery { separator, .. }
            | Condition::IsNull { separator, .. }
            | Condition::Exists { separator, .. }
            | Condition::Nested { separator, .. } => *separator,
        }
    }
}

/// Ordered sequence of condition nodes.
#[derive(Clone, Debug, Default)]
pub struct ConditionGroup {
    conditions: Vec<Condition>,
}

impl ConditionGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in insertion order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn into_conditions(self) -> Vec<Condition> {
        self.conditions
    }

    /// Append an already built node.
    pub fn push(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Append `column <operator> value`.
    pub fn add_column(
        &mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
        operator: impl Into<String>,
        separator: Separator,
    ) -> &mut Self {
        self.push(Condition::Column {
            column: column.into(),
            value: value.into(),
            operator: operator.into(),
            separator,
        })
    }

    /// Append `column <operator> <expression>` where the expression is built by `f`.
    pub fn add_column_with(
        &mut self,
        column: impl Into<String>,
        f: impl FnOnce(&mut Expression),
        operator: impl Into<String>,
        separator: Separator,
    ) -> &mut Self {
        let expr = Expression::build(f);
        self.add_column(column, Value::Expression(expr), operator, separator)
    }

    pub fn add_like(
        &mut self,
        column: impl Into<String>,
        pattern: impl Into<String>,
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        self.push(Condition::Like {
            column: column.into(),
            pattern: pattern.into(),
            separator,
            negated,
        })
    }

    pub fn add_between(
        &mut self,
        column: impl Into<String>,
        low: Param,
        high: Param,
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        self.push(Condition::Between {
            column: column.into(),
            low,
            high,
            separator,
            negated,
        })
    }

    pub fn add_in(
        &mut self,
        column: impl Into<String>,
        values: Vec<Param>,
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        self.push(Condition::In {
            column: column.into(),
            values,
            separator,
            negated,
        })
    }

    /// Append `column [NOT] IN (subquery)` where the subquery is built by `f`.
    pub fn add_in_subquery(
        &mut self,
        column: impl Into<String>,
        f: impl FnOnce(&mut Subquery),
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        let subquery = Subquery::build(f);
        self.push(Condition::InSubquery {
            column: column.into(),
            subquery: Box::new(subquery),
            separator,
            negated,
        })
    }

    pub fn add_null(
        &mut self,
        column: impl Into<String>,
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        self.push(Condition::IsNull {
            column: column.into(),
            separator,
            negated,
        })
    }

    pub fn add_exists(
        &mut self,
        f: impl FnOnce(&mut Subquery),
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        let subquery = Subquery::build(f);
        self.push(Condition::Exists {
            subquery: Box::new(subquery),
            separator,
            negated,
        })
    }

    /// Run `f` against a fresh group and append its nodes as one nested node.
    pub fn add_nested(
        &mut self,
        f: impl FnOnce(&mut ConditionGroup),
        separator: Separator,
    ) -> &mut Self {
        let mut child = ConditionGroup::new();
        f(&mut child);
        self.push(Condition::Nested {
            children: child.into_conditions(),
            separator,
        })
    }

    /// Join predicate `left = right` between two columns.
    pub fn on(&mut self, left: impl Into<String>, right: impl Into<String>) -> &mut Self {
        self.add_column(left, Value::column(right), "=", Separator::And)
    }

    /// OR-joined column equality, for alternative join keys.
    pub fn or_on(&mut self, left: impl Into<String>, right: impl Into<String>) -> &mut Self {
        self.add_column(left, Value::column(right), "=", Separator::Or)
    }
}
