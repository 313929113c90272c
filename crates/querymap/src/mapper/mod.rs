//! Per-entity schema mapping.
//!
//! An [`EntityMapperBuilder`] collects the table, primary key, casts, column hooks
//! and relations of one entity type. [`EntityMapperBuilder::build`] freezes it into
//! an [`EntityMapper`], which is shared behind an `Arc` by every query on that
//! entity.
//!
//! Names that are not configured explicitly are derived from the entity's type
//! name on first use and cached:
//!
//! | type name     | table           | foreign key       | sequence               |
//! |---------------|-----------------|-------------------|------------------------|
//! | `UserProfile` | `user_profiles` | `user_profile_id` | `user_profiles_id_seq` |
//! | `Tag`         | `tags`          | `tag_id`          | `tags_id_seq`          |
//!
//! ```ignore
//! impl Entity for User {
//!     fn map_entity(mapper: &mut EntityMapperBuilder) {
//!         mapper
//!             .table("app_users")
//!             .cast([("deleted_at", "?date"), ("age", "integer")]);
//!         mapper.relation("posts").has_many::<Post>(None);
//!     }
//!     // ...
//! }
//! ```

mod relation;

pub use relation::{Junction, Relation, RelationFactory, RelationKind};

use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Column whose cast marks an entity as soft-deletable.
pub const SOFT_DELETE_COLUMN: &str = "deleted_at";

/// Cast descriptor (nullable date) that enables soft delete on [`SOFT_DELETE_COLUMN`].
///
/// The check is plain string equality against the configured cast.
pub const SOFT_DELETE_CAST: &str = "?date";

pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Produces a primary-key value for drivers without native key generation.
pub type PrimaryKeyGenerator = Arc<dyn Fn(&Record) -> JsonValue + Send + Sync>;

/// Transforms a column value on read (getter) or write (setter).
pub type ColumnTransform = Arc<dyn Fn(JsonValue) -> JsonValue + Send + Sync>;

/// Mutable mapper configuration, frozen by [`EntityMapperBuilder::build`].
pub struct EntityMapperBuilder {
    entity_name: String,
    table: Option<String>,
    primary_key: String,
    primary_key_generator: Option<PrimaryKeyGenerator>,
    sequence: Option<String>,
    casts: BTreeMap<String, String>,
    getters: BTreeMap<String, ColumnTransform>,
    setters: BTreeMap<String, ColumnTransform>,
    relations: BTreeMap<String, Relation>,
}

impl EntityMapperBuilder {
    /// Start a mapping for the entity named `entity_name`.
    ///
    /// The name may be module-qualified (`app::models::UserProfile`); only the
    /// last segment feeds name derivation.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            table: None,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            primary_key_generator: None,
            sequence: None,
            casts: BTreeMap::new(),
            getters: BTreeMap::new(),
            setters: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Start a mapping named after the Rust type `E`.
    pub fn for_type<E: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<E>())
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn primary_key(&mut self, primary_key: impl Into<String>) -> &mut Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn primary_key_generator<F>(&mut self, generator: F) -> &mut Self
    where
        F: Fn(&Record) -> JsonValue + Send + Sync + 'static,
    {
        self.primary_key_generator = Some(Arc::new(generator));
        self
    }

    pub fn sequence(&mut self, sequence: impl Into<String>) -> &mut Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Replace the whole cast map.
    pub fn cast<I, K, V>(&mut self, casts: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.casts = casts
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn getter<F>(&mut self, column: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        self.getters.insert(column.into(), Arc::new(f));
        self
    }

    pub fn setter<F>(&mut self, column: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        self.setters.insert(column.into(), Arc::new(f));
        self
    }

    /// Register the relation `name`. A later registration under the same name wins.
    pub fn relation(&mut self, name: impl Into<String>) -> RelationFactory<'_> {
        RelationFactory::new(name.into(), &mut self.relations)
    }

    /// Freeze the configuration.
    ///
    /// Fails with [`OrmError::Configuration`] when the entity name or primary key
    /// is empty, or when an explicit table or sequence is empty.
    pub fn build(self) -> OrmResult<EntityMapper> {
        if short_name(&self.entity_name).is_empty() {
            return Err(OrmError::configuration("entity name must not be empty"));
        }
        if self.primary_key.is_empty() {
            return Err(OrmError::configuration(format!(
                "primary key of {} must not be empty",
                self.entity_name
            )));
        }
        if self.table.as_deref() == Some("") {
            return Err(OrmError::configuration(format!(
                "table of {} must not be empty",
                self.entity_name
            )));
        }
        if self.sequence.as_deref() == Some("") {
            return Err(OrmError::configuration(format!(
                "sequence of {} must not be empty",
                self.entity_name
            )));
        }

        Ok(EntityMapper {
            table: self.table.map(OnceLock::from).unwrap_or_default(),
            sequence: self.sequence.map(OnceLock::from).unwrap_or_default(),
            foreign_key: OnceLock::new(),
            entity_name: self.entity_name,
            primary_key: self.primary_key,
            primary_key_generator: self.primary_key_generator,
            casts: self.casts,
            getters: self.getters,
            setters: self.setters,
            relations: self.relations,
        })
    }
}

impl fmt::Debug for EntityMapperBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMapperBuilder")
            .field("entity_name", &self.entity_name)
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("sequence", &self.sequence)
            .field("casts", &self.casts)
            .field("relations", &self.relations)
            .finish_non_exhaustive()
    }
}

/// Frozen schema mapping of one entity type.
pub struct EntityMapper {
    entity_name: String,
    table: OnceLock<String>,
    primary_key: String,
    primary_key_generator: Option<PrimaryKeyGenerator>,
    sequence: OnceLock<String>,
    foreign_key: OnceLock<String>,
    casts: BTreeMap<String, String>,
    getters: BTreeMap<String, ColumnTransform>,
    setters: BTreeMap<String, ColumnTransform>,
    relations: BTreeMap<String, Relation>,
}

impl EntityMapper {
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Configured table, or `snake_case(short name) + "s"`.
    pub fn table(&self) -> &str {
        self.table
            .get_or_init(|| format!("{}s", snake_case(short_name(&self.entity_name))))
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn primary_key_generator(&self) -> Option<&PrimaryKeyGenerator> {
        self.primary_key_generator.as_ref()
    }

    /// `snake_case(short name)` with `-` turned into `_`, plus `_id`. Not pluralized.
    pub fn foreign_key(&self) -> &str {
        self.foreign_key.get_or_init(|| {
            format!(
                "{}_id",
                snake_case(short_name(&self.entity_name)).replace('-', "_")
            )
        })
    }

    /// Configured sequence, or `{table}_{primary_key}_seq`.
    pub fn sequence(&self) -> &str {
        self.sequence
            .get_or_init(|| format!("{}_{}_seq", self.table(), self.primary_key))
    }

    pub fn casts(&self) -> &BTreeMap<String, String> {
        &self.casts
    }

    pub fn cast_for(&self, column: &str) -> Option<&str> {
        self.casts.get(column).map(String::as_str)
    }

    pub fn getters(&self) -> &BTreeMap<String, ColumnTransform> {
        &self.getters
    }

    pub fn setters(&self) -> &BTreeMap<String, ColumnTransform> {
        &self.setters
    }

    pub fn relations(&self) -> &BTreeMap<String, Relation> {
        &self.relations
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// True iff `deleted_at` is cast exactly as `"?date"`.
    pub fn supports_soft_delete(&self) -> bool {
        self.cast_for(SOFT_DELETE_COLUMN) == Some(SOFT_DELETE_CAST)
    }

    /// Value of `column` in `record`, passed through its getter if one is registered.
    ///
    /// Missing columns read as `null`.
    pub fn read_column(&self, record: &Record, column: &str) -> JsonValue {
        let value = record.get(column).cloned().unwrap_or(JsonValue::Null);
        match self.getters.get(column) {
            Some(getter) => getter(value),
            None => value,
        }
    }

    /// `value` passed through the setter of `column`, if one is registered.
    pub fn write_column(&self, column: &str, value: JsonValue) -> JsonValue {
        match self.setters.get(column) {
            Some(setter) => setter(value),
            None => value,
        }
    }

    pub fn generate_primary_key(&self, record: &Record) -> Option<JsonValue> {
        self.primary_key_generator
            .as_ref()
            .map(|generator| generator(record))
    }
}

impl fmt::Debug for EntityMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMapper")
            .field("entity_name", &self.entity_name)
            .field("table", &self.table())
            .field("primary_key", &self.primary_key)
            .field("casts", &self.casts)
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("relations", &self.relations)
            .finish_non_exhaustive()
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_name(entity_name: &str) -> &str {
    let base = entity_name.split('<').next().unwrap_or(entity_name);
    base.rsplit("::").next().unwrap_or(base).trim()
}

/// Insert `_` at every boundary between a character other than an uppercase
/// letter or `-` and a following uppercase letter, then lowercase.
fn snake_case(name: &str) -> String {
    static BOUNDARY_RE: OnceLock<Regex> = OnceLock::new();
    let re = BOUNDARY_RE.get_or_init(|| {
        Regex::new(r"([^A-Z\-])([A-Z])").expect("invalid built-in name boundary regex")
    });
    re.replace_all(name, "${1}_${2}").to_lowercase()
}

#[cfg(test)]
mod tests;
