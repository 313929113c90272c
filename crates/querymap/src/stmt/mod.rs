//! Statement AST.
//!
//! This module holds the in-memory representation of a SELECT/UPDATE/DELETE that a
//! [`crate::compiler::Compiler`] turns into SQL text and parameters:
//!
//! - [`ConditionGroup`] / [`Condition`]: WHERE and ON predicate trees
//! - [`HavingGroup`] / [`HavingCondition`]: HAVING predicate trees keyed by aggregate text
//! - [`Expression`]: values built programmatically instead of passed as literals
//! - [`Subquery`]: nested SELECTs for `IN` / `EXISTS`
//! - [`JoinSpec`]: join kind, target tables and ON clause
//! - [`Statement`]: the aggregate owning all of the above
//!
//! Nested structures are built by closures that run to completion against a fresh
//! child builder before the parent continues.

mod condition;
mod expression;
mod fluent;
mod having;
mod join;
mod statement;
mod subquery;

pub use condition::{Condition, ConditionGroup, Separator, Value};
pub use expression::{Aggregate, AggregateFn, ExprPart, Expression};
pub use fluent::{Conditional, HavingClause, Havingable, WhereClause};
pub use having::{HavingCondition, HavingGroup};
pub use join::{JoinKind, JoinSpec};
pub use statement::{Assignment, Order, OrderBy, SelectColumn, Statement};
pub use subquery::Subquery;

#[cfg(test)]
mod tests;
