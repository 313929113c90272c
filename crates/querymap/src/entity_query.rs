//! Queries over one mapped entity type.
//!
//! An [`EntityQuery`] wraps a [`Statement`] and applies the entity's mapping
//! conventions when a read runs:
//!
//! - an explicit column list always gets the primary key appended
//! - soft-deletable entities are filtered on `deleted_at` according to the
//!   query's [`SoftDeleteScope`]
//! - the FROM list is the mapper's table
//! - entities loaded through a query with joins are read-only
//!
//! Writes (`update`, `delete`) use the WHERE clause and joins as built and never
//! apply the soft-delete filter.

use crate::client::Connection;
use crate::config::StatementKind;
use crate::dml::{Delete, Update};
use crate::entity::{Entity, EntityState};
use crate::error::OrmResult;
use crate::manager::EntityManager;
use crate::mapper::{EntityMapper, SOFT_DELETE_COLUMN};
use crate::record::Record;
use crate::stmt::{
    Condition, ConditionGroup, Conditional, HavingGroup, Havingable, JoinKind, Order, Separator,
    Statement, Value,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Which rows of a soft-deletable entity a read returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SoftDeleteScope {
    /// Only rows whose `deleted_at` is NULL.
    #[default]
    Exclude,
    /// All rows.
    Include,
    /// Only rows whose `deleted_at` is set.
    Only,
}

/// A query on entity type `E` over connection `C`.
///
/// Terminal operations work on a copy of the statement, so the query itself is
/// left as built.
pub struct EntityQuery<'a, E: Entity, C: Connection> {
    manager: &'a EntityManager<C>,
    mapper: Arc<EntityMapper>,
    statement: Statement,
    soft_delete: SoftDeleteScope,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity, C: Connection> EntityQuery<'a, E, C> {
    pub fn new(manager: &'a EntityManager<C>, mapper: Arc<EntityMapper>) -> Self {
        Self::with_statement(manager, mapper, Statement::new())
    }

    /// Start from an already built statement.
    pub fn with_statement(
        manager: &'a EntityManager<C>,
        mapper: Arc<EntityMapper>,
        statement: Statement,
    ) -> Self {
        Self {
            manager,
            mapper,
            statement,
            soft_delete: SoftDeleteScope::default(),
            _entity: PhantomData,
        }
    }

    pub fn mapper(&self) -> &EntityMapper {
        &self.mapper
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn soft_delete_scope(&self) -> SoftDeleteScope {
        self.soft_delete
    }

    // ==================== Fluent surface ====================

    /// Include soft-deleted rows in reads.
    pub fn with_soft_deleted(&mut self) -> &mut Self {
        self.soft_delete = SoftDeleteScope::Include;
        self
    }

    /// Read only soft-deleted rows.
    pub fn only_soft_deleted(&mut self) -> &mut Self {
        self.soft_delete = SoftDeleteScope::Only;
        self
    }

    pub fn join<I, S>(&mut self, tables: I, on: impl FnOnce(&mut ConditionGroup)) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_join(JoinKind::Inner, tables, on);
        self
    }

    pub fn left_join<I, S>(&mut self, tables: I, on: impl FnOnce(&mut ConditionGroup)) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_join(JoinKind::Left, tables, on);
        self
    }

    pub fn right_join<I, S>(&mut self, tables: I, on: impl FnOnce(&mut ConditionGroup)) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_join(JoinKind::Right, tables, on);
        self
    }

    pub fn cross_join<I, S>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.add_join(JoinKind::Cross, tables, |_| {});
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.statement.add_order(column, Order::Asc);
        self
    }

    pub fn order_by_desc(&mut self, column: impl Into<String>) -> &mut Self {
        self.statement.add_order(column, Order::Desc);
        self
    }

    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.statement.add_group_by(column);
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.statement.set_limit(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.statement.set_offset(offset);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.statement.set_distinct(true);
        self
    }

    // ==================== Terminal operations ====================

    /// First matching entity, or `None` when no row matches.
    ///
    /// An empty `columns` slice selects every column.
    pub async fn get(&self, columns: &[&str]) -> OrmResult<Option<E>> {
        self.load_first(self.statement.clone(), columns).await
    }

    /// Every matching entity.
    pub async fn all(&self, columns: &[&str]) -> OrmResult<Vec<E>> {
        self.load(self.statement.clone(), columns).await
    }

    /// Entity whose primary key equals `id`.
    pub async fn find<T>(&self, id: T, columns: &[&str]) -> OrmResult<Option<E>>
    where
        T: ToSql + Send + Sync + 'static,
    {
        let mut statement = self.statement.clone();
        statement.and_where(self.mapper.primary_key()).is(id);
        self.load_first(statement, columns).await
    }

    /// Entities whose primary key is one of `ids`.
    pub async fn find_all<T, I>(&self, ids: I, columns: &[&str]) -> OrmResult<Vec<E>>
    where
        T: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        let mut statement = self.statement.clone();
        statement.and_where(self.mapper.primary_key()).in_list(ids);
        self.load(statement, columns).await
    }

    /// Delete matching rows from the entity's table and return the affected count.
    ///
    /// `tables` names extra tables referenced by the WHERE clause.
    pub async fn delete(&self, tables: &[&str]) -> OrmResult<u64> {
        Delete::new(
            self.manager.connection(),
            self.manager.config(),
            self.mapper.table(),
            self.statement.clone(),
        )
        .delete(tables.iter().copied())
        .await
    }

    /// Update matching rows of the entity's table and return the affected count.
    pub async fn update<I, K, V>(&self, columns: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Update::new(
            self.manager.connection(),
            self.manager.config(),
            self.mapper.table(),
            self.statement.clone(),
        )
        .update(columns)
        .await
    }

    // ==================== Internals ====================

    /// Apply the read conventions to `statement`.
    fn prepare_select(&self, statement: &mut Statement, columns: &[&str]) {
        let primary_key = self.mapper.primary_key();

        if !columns.is_empty() {
            let mut projection: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
            if !columns.contains(&primary_key) {
                projection.push(primary_key.to_string());
            }
            statement.set_columns(projection);
        }

        if self.mapper.supports_soft_delete() {
            match self.soft_delete {
                SoftDeleteScope::Exclude => {
                    group_disjunction(statement.wheres_mut());
                    statement.and_where(SOFT_DELETE_COLUMN).is_null();
                }
                SoftDeleteScope::Only => {
                    group_disjunction(statement.wheres_mut());
                    statement.and_where(SOFT_DELETE_COLUMN).not_null();
                }
                SoftDeleteScope::Include => {}
            }
        }

        statement.add_tables([self.mapper.table()]);
    }

    /// Run the SELECT and return the rows with the read-only flag they hydrate with.
    async fn fetch(
        &self,
        mut statement: Statement,
        columns: &[&str],
    ) -> OrmResult<(Vec<Record>, bool)> {
        self.prepare_select(&mut statement, columns);

        let connection = self.manager.connection();
        let compiled = connection.compiler().select(&statement);
        self.manager.config().log_statement(
            StatementKind::Select,
            self.mapper.entity_name(),
            &compiled,
        );
        let records = connection
            .query(&compiled.sql, &compiled.params_ref())
            .await?;

        Ok((records, !statement.joins().is_empty()))
    }

    async fn load(&self, statement: Statement, columns: &[&str]) -> OrmResult<Vec<E>> {
        let (records, read_only) = self.fetch(statement, columns).await?;
        records
            .into_iter()
            .map(|record| self.hydrate(record, read_only))
            .collect()
    }

    /// Hydrate the first returned row only.
    async fn load_first(&self, statement: Statement, columns: &[&str]) -> OrmResult<Option<E>> {
        let (records, read_only) = self.fetch(statement, columns).await?;
        records
            .into_iter()
            .next()
            .map(|record| self.hydrate(record, read_only))
            .transpose()
    }

    fn hydrate(&self, record: Record, read_only: bool) -> OrmResult<E> {
        E::from_record(&self.mapper, record, EntityState::persisted(read_only))
    }
}

/// Wrap the top-level conditions in one nested group when they contain an OR,
/// so that an appended AND applies to the whole clause.
fn group_disjunction(wheres: &mut ConditionGroup) {
    let has_or = wheres
        .conditions()
        .iter()
        .skip(1)
        .any(|c| c.separator() == Separator::Or);
    if !has_or {
        return;
    }
    let children = std::mem::take(wheres).into_conditions();
    wheres.push(Condition::Nested {
        children,
        separator: Separator::And,
    });
}

impl<E: Entity, C: Connection> Conditional for EntityQuery<'_, E, C> {
    fn conditions_mut(&mut self) -> &mut ConditionGroup {
        self.statement.wheres_mut()
    }
}

impl<E: Entity, C: Connection> Havingable for EntityQuery<'_, E, C> {
    fn having_conditions_mut(&mut self) -> &mut HavingGroup {
        self.statement.having_mut()
    }
}
