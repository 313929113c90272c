//! Entity manager: connection, configuration and mapper cache.

use crate::client::Connection;
use crate::config::ManagerConfig;
use crate::entity::Entity;
use crate::entity_query::EntityQuery;
use crate::error::{OrmError, OrmResult};
use crate::mapper::{EntityMapper, EntityMapperBuilder};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_postgres::types::ToSql;

/// Entry point for entity queries over one connection.
///
/// Mappers are built from [`Entity::map_entity`] the first time an entity type is
/// used and shared by every later query on that type.
///
/// ```ignore
/// let manager = EntityManager::new(client);
/// let active = manager
///     .query::<User>()?
///     .and_where("status").is("active")
///     .all(&[])
///     .await?;
/// ```
pub struct EntityManager<C: Connection> {
    connection: C,
    config: ManagerConfig,
    mappers: Mutex<HashMap<TypeId, Arc<EntityMapper>>>,
}

impl<C: Connection> EntityManager<C> {
    pub fn new(connection: C) -> Self {
        Self::with_config(connection, ManagerConfig::default())
    }

    pub fn with_config(connection: C, config: ManagerConfig) -> Self {
        Self {
            connection,
            config,
            mappers: Mutex::new(HashMap::new()),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Shared mapper of `E`, built on first use.
    pub fn mapper<E: Entity>(&self) -> OrmResult<Arc<EntityMapper>> {
        let key = TypeId::of::<E>();
        let mut mappers = self
            .mappers
            .lock()
            .map_err(|_| OrmError::Other("entity mapper cache poisoned".to_string()))?;
        if let Some(mapper) = mappers.get(&key) {
            return Ok(Arc::clone(mapper));
        }

        let mut builder = EntityMapperBuilder::for_type::<E>();
        E::map_entity(&mut builder);
        let mapper = Arc::new(builder.build()?);
        mappers.insert(key, Arc::clone(&mapper));
        Ok(mapper)
    }

    /// Start a query on `E`.
    pub fn query<E: Entity>(&self) -> OrmResult<EntityQuery<'_, E, C>> {
        Ok(EntityQuery::new(self, self.mapper::<E>()?))
    }

    /// Load the entity whose primary key equals `id`, selecting all columns.
    pub async fn find<E, T>(&self, id: T) -> OrmResult<Option<E>>
    where
        E: Entity,
        T: ToSql + Send + Sync + 'static,
    {
        self.query::<E>()?.find(id, &[]).await
    }
}
