//! HAVING predicate trees.
//!
//! Same sequencing and nesting rules as [`super::condition`], but nodes are keyed by
//! aggregate expression text (e.g. `COUNT(id)`) and only comparison, `IN`,
//! `BETWEEN` and nested variants exist.

use crate::param::Param;
use crate::stmt::condition::{Separator, Value};
use crate::stmt::expression::Expression;
use crate::stmt::subquery::Subquery;

/// One predicate node of a HAVING clause.
#[derive(Clone, Debug)]
pub enum HavingCondition {
    /// `aggregate <operator> value`
    Aggregate {
        aggregate: String,
        value: Value,
        operator: String,
        separator: Separator,
    },
    In {
        aggregate: String,
        values: Vec<Param>,
        separator: Separator,
        negated: bool,
    },
    InSubquery {
        aggregate: String,
        subquery: Box<Subquery>,
        separator: Separator,
        negated: bool,
    },
    Between {
        aggregate: String,
        low: Param,
        high: Param,
        separator: Separator,
        negated: bool,
    },
    Nested {
        children: Vec<HavingCondition>,
        separator: Separator,
    },
}

impl HavingCondition {
    pub fn separator(&self) -> Separator {
        match self {
            HavingCondition::Aggregate { separator, .. }
            | HavingCondition::In { separator, .. }
            | HavingCondition::InSubquery { separator, .. }
            | HavingCondition::Between { separator, .. }
            | HavingCondition::Nested { separator, .. } => *separator,
        }
    }
}

/// Ordered sequence of HAVING nodes.
#[derive(Clone, Debug, Default)]
pub struct HavingGroup {
    conditions: Vec<HavingCondition>,
}

impl HavingGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[HavingCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn into_conditions(self) -> Vec<HavingCondition> {
        self.conditions
    }

    pub fn push(&mut self, condition: HavingCondition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn add_aggregate(
        &mut self,
        aggregate: impl Into<String>,
        value: impl Into<Value>,
        operator: impl Into<String>,
        separator: Separator,
    ) -> &mut Self {
        self.push(HavingCondition::Aggregate {
            aggregate: aggregate.into(),
            value: value.into(),
            operator: operator.into(),
            separator,
        })
    }

    /// Append `aggregate <operator> <expression>` with the expression built by `f`.
    pub fn add_aggregate_with(
        &mut self,
        aggregate: impl Into<String>,
        f: impl FnOnce(&mut Expression),
        operator: impl Into<String>,
        separator: Separator,
    ) -> &mut Self {
        let expr = Expression::build(f);
        self.add_aggregate(aggregate, Value::Expression(expr), operator, separator)
    }

    pub fn add_in(
        &mut self,
        aggregate: impl Into<String>,
        values: Vec<Param>,
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        self.push(HavingCondition::In {
            aggregate: aggregate.into(),
            values,
            separator,
            negated,
        })
    }

    pub fn add_in_subquery(
        &mut self,
        aggregate: impl Into<String>,
        f: impl FnOnce(&mut Subquery),
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        let subquery = Subquery::build(f);
        self.push(HavingCondition::InSubquery {
            aggregate: aggregate.into(),
            subquery: Box::new(subquery),
            separator,
            negated,
        })
    }

    pub fn add_between(
        &mut self,
        aggregate: impl Into<String>,
        low: Param,
        high: Param,
        separator: Separator,
        negated: bool,
    ) -> &mut Self {
        self.push(HavingCondition::Between {
            aggregate: aggregate.into(),
            low,
            high,
            separator,
            negated,
        })
    }

    pub fn add_nested(
        &mut self,
        f: impl FnOnce(&mut HavingGroup),
        separator: Separator,
    ) -> &mut Self {
        let mut child = HavingGroup::new();
        f(&mut child);
        self.push(HavingCondition::Nested {
            children: child.into_conditions(),
            separator,
        })
    }
}
