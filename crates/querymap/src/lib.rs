//! # querymap
//!
//! A SQL statement builder with an entity-mapping layer for PostgreSQL.
//!
//! ## Features
//!
//! - **Statement AST**: WHERE/HAVING predicate trees, joins, subqueries and update
//!   assignments built with fluent calls and closures
//! - **Pluggable compilers**: a [`Compiler`] renders a [`Statement`] to SQL and
//!   parameters; [`PgCompiler`] targets PostgreSQL
//! - **Entity mapping**: table, foreign-key and sequence names derived from the type
//!   name, casts, column hooks and relation descriptors
//! - **Conventions on read**: primary-key projection, `deleted_at` soft delete and
//!   read-only detection for joined queries
//! - **Transaction-friendly**: pass a transaction anywhere a [`Connection`] is expected
//!
//! ## Statements
//!
//! ```ignore
//! use querymap::{Conditional, PgCompiler, Compiler, Statement};
//!
//! let mut stmt = Statement::new();
//! stmt.add_tables(["users"]);
//! stmt.and_where("status").is("active")
//!     .or_where_group(|g| {
//!         g.and_where("role").is("admin").and_where("age").at_least(18i32);
//!     });
//!
//! let compiled = PgCompiler.select(&stmt);
//! // SELECT * FROM users WHERE status = $1 OR (role = $2 AND age >= $3)
//! ```
//!
//! ## Entities
//!
//! ```ignore
//! use querymap::{Conditional, EntityManager};
//!
//! let manager = EntityManager::new(client);
//! let posts = manager
//!     .query::<Post>()?
//!     .and_where("author_id").is(7i64)
//!     .all(&["title"])
//!     .await?;
//! // SELECT title, id FROM posts WHERE author_id = $1 AND deleted_at IS NULL
//! ```

pub mod client;
pub mod compiler;
pub mod config;
pub mod dml;
pub mod entity;
pub mod entity_query;
pub mod error;
pub mod manager;
pub mod mapper;
pub mod param;
pub mod record;
pub mod stmt;

pub use client::Connection;
pub use compiler::{Compiled, Compiler, PgCompiler};
pub use config::{ManagerConfig, StatementKind};
pub use dml::{Delete, Update};
pub use entity::{Entity, EntityState};
pub use entity_query::{EntityQuery, SoftDeleteScope};
pub use error::{OrmError, OrmResult};
pub use manager::EntityManager;
pub use mapper::{
    EntityMapper, EntityMapperBuilder, Junction, Relation, RelationFactory, RelationKind,
    SOFT_DELETE_CAST, SOFT_DELETE_COLUMN,
};
pub use param::{Param, ParamList};
pub use record::Record;
pub use stmt::{
    Aggregate, Condition, ConditionGroup, Conditional, Expression, HavingClause, HavingCondition,
    HavingGroup, Havingable, JoinKind, JoinSpec, Order, Separator, Statement, Subquery, Value,
    WhereClause,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_builder, create_pool_with_config};

// Re-export tokio_postgres for convenience
pub use tokio_postgres;
