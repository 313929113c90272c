//! Statement compilers.
//!
//! A [`Compiler`] turns a [`Statement`] into SQL text plus the ordered parameter
//! list to bind. [`PgCompiler`] is the PostgreSQL implementation used by the
//! tokio-postgres connections in [`crate::client`].

mod pg;

pub use pg::PgCompiler;

use crate::param::ParamList;
use crate::stmt::Statement;
use tokio_postgres::types::ToSql;

/// Rendered SQL and its parameters, numbered `$1..$n` in list order.
#[derive(Clone, Debug)]
pub struct Compiled {
    pub sql: String,
    pub params: ParamList,
}

impl Compiled {
    pub fn new(sql: String, params: ParamList) -> Self {
        Self { sql, params }
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }
}

/// Renders statements for one SQL dialect.
///
/// Implementations must resolve every [`crate::stmt::Value`], expression and
/// subquery embedded in the statement, and must ignore the separator of the
/// first node of every condition sequence.
pub trait Compiler: Send + Sync {
    fn select(&self, statement: &Statement) -> Compiled;

    fn update(&self, statement: &Statement) -> Compiled;

    fn delete(&self, statement: &Statement) -> Compiled;
}
