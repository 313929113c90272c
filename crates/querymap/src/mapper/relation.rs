//! Relation descriptors registered on an entity mapper.
//!
//! Descriptors only record how two entities are linked. Loading related rows is
//! left to callers.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// How the owning entity is linked to the related one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
    /// Related table holds a foreign key to the owner; at most one row.
    HasOne,
    /// Related table holds a foreign key to the owner; any number of rows.
    HasMany,
    /// Owner table holds a foreign key to the related entity.
    BelongsTo,
    /// Linked through a junction table; at most one row.
    ShareOne,
    /// Linked through a junction table; any number of rows.
    ShareMany,
}

/// Junction table used by `share_one` / `share_many`.
///
/// `keys` maps junction columns to the columns they reference. When no junction
/// is given, callers derive one from both entities' table and foreign-key names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Junction {
    pub table: String,
    pub keys: BTreeMap<String, String>,
}

impl Junction {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Map junction column `column` to `references`.
    pub fn key(mut self, column: impl Into<String>, references: impl Into<String>) -> Self {
        self.keys.insert(column.into(), references.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    /// Fully qualified type name of the related entity.
    pub entity: &'static str,
    /// Explicit foreign key; `None` means the mapper's derived foreign key applies.
    pub foreign_key: Option<String>,
    pub junction: Option<Junction>,
}

impl Relation {
    pub fn is_many(&self) -> bool {
        matches!(self.kind, RelationKind::HasMany | RelationKind::ShareMany)
    }
}

/// Registers one named relation on a mapper builder.
///
/// Registering a name twice replaces the earlier descriptor.
pub struct RelationFactory<'a> {
    name: String,
    relations: &'a mut BTreeMap<String, Relation>,
}

impl<'a> RelationFactory<'a> {
    pub(crate) fn new(name: String, relations: &'a mut BTreeMap<String, Relation>) -> Self {
        Self { name, relations }
    }

    fn store(self, relation: Relation) -> &'a Relation {
        match self.relations.entry(self.name) {
            Entry::Occupied(mut entry) => {
                entry.insert(relation);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(relation),
        }
    }

    fn direct<E: ?Sized + 'static>(
        self,
        kind: RelationKind,
        foreign_key: Option<&str>,
    ) -> &'a Relation {
        self.shared::<E>(kind, foreign_key, None)
    }

    fn shared<E: ?Sized + 'static>(
        self,
        kind: RelationKind,
        foreign_key: Option<&str>,
        junction: Option<Junction>,
    ) -> &'a Relation {
        self.store(Relation {
            kind,
            entity: std::any::type_name::<E>(),
            foreign_key: foreign_key.map(str::to_string),
            junction,
        })
    }

    pub fn has_one<E: ?Sized + 'static>(self, foreign_key: Option<&str>) -> &'a Relation {
        self.direct::<E>(RelationKind::HasOne, foreign_key)
    }

    pub fn has_many<E: ?Sized + 'static>(self, foreign_key: Option<&str>) -> &'a Relation {
        self.direct::<E>(RelationKind::HasMany, foreign_key)
    }

    pub fn belongs_to<E: ?Sized + 'static>(self, foreign_key: Option<&str>) -> &'a Relation {
        self.direct::<E>(RelationKind::BelongsTo, foreign_key)
    }

    pub fn share_one<E: ?Sized + 'static>(
        self,
        foreign_key: Option<&str>,
        junction: Option<Junction>,
    ) -> &'a Relation {
        self.shared::<E>(RelationKind::ShareOne, foreign_key, junction)
    }

    pub fn share_many<E: ?Sized + 'static>(
        self,
        foreign_key: Option<&str>,
        junction: Option<Junction>,
    ) -> &'a Relation {
        self.shared::<E>(RelationKind::ShareMany, foreign_key, junction)
    }
}
