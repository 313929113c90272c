//! Entity hydration contract.

use crate::error::{OrmError, OrmResult};
use crate::mapper::{EntityMapper, EntityMapperBuilder};
use crate::record::Record;

/// Persistence flags attached to a hydrated entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityState {
    is_new: bool,
    read_only: bool,
}

impl EntityState {
    /// State of an entity created in memory and not yet stored.
    pub fn new_entity() -> Self {
        Self {
            is_new: true,
            read_only: false,
        }
    }

    /// State of an entity loaded from the database.
    pub fn persisted(read_only: bool) -> Self {
        Self {
            is_new: false,
            read_only,
        }
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Fails with [`OrmError::ReadOnly`] if the entity was loaded through a joined query.
    ///
    /// Call this before writing an entity back to `table`.
    pub fn ensure_writable(&self, table: &str) -> OrmResult<()> {
        if self.read_only {
            return Err(OrmError::read_only(table));
        }
        Ok(())
    }
}

impl Default for EntityState {
    fn default() -> Self {
        Self::new_entity()
    }
}

/// A domain type that can be mapped to a table and built from a row.
///
/// ```ignore
/// struct Tag {
///     id: i64,
///     name: String,
///     state: EntityState,
/// }
///
/// impl Entity for Tag {
///     fn from_record(mapper: &EntityMapper, record: Record, state: EntityState) -> OrmResult<Self> {
///         Ok(Tag {
///             id: record.try_get(mapper.primary_key())?,
///             name: serde_json::from_value(mapper.read_column(&record, "name"))
///                 .map_err(|e| OrmError::decode("name", e.to_string()))?,
///             state,
///         })
///     }
/// }
/// ```
pub trait Entity: Sized + Send + 'static {
    /// Configure the mapping. The default keeps every convention.
    fn map_entity(mapper: &mut EntityMapperBuilder) {
        let _ = mapper;
    }

    fn from_record(mapper: &EntityMapper, record: Record, state: EntityState) -> OrmResult<Self>;
}
