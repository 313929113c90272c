//! In-memory connection that records every statement it is asked to run.

#![allow(dead_code)]

use querymap::tokio_postgres::types::ToSql;
use querymap::{
    Compiler, Connection, Entity, EntityMapper, EntityMapperBuilder, EntityState, OrmError,
    OrmResult, PgCompiler, Record,
};
use serde_json::json;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Execute,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub kind: CallKind,
    pub sql: String,
    pub param_count: usize,
}

#[derive(Default)]
pub struct RecordingConnection {
    rows: Vec<Record>,
    affected: u64,
    fail: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_affected(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_sql(&self) -> String {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|c| c.sql.clone())
            .expect("no statement was run")
    }

    fn record(&self, kind: CallKind, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<()> {
        self.calls.lock().unwrap().push(Call {
            kind,
            sql: sql.to_string(),
            param_count: params.len(),
        });
        if self.fail {
            return Err(OrmError::Connection("connection reset".to_string()));
        }
        Ok(())
    }
}

impl Connection for RecordingConnection {
    fn compiler(&self) -> &dyn Compiler {
        &PgCompiler
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Record>> {
        self.record(CallKind::Query, sql, params)?;
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        self.record(CallKind::Execute, sql, params)?;
        Ok(self.affected)
    }
}

pub fn row(id: i64, name: &str) -> Record {
    [("id", json!(id)), ("name", json!(name))]
        .into_iter()
        .collect()
}

/// Plain entity: every convention, no soft delete.
#[derive(Debug)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub state: EntityState,
}

impl Entity for User {
    fn from_record(mapper: &EntityMapper, record: Record, state: EntityState) -> OrmResult<Self> {
        Ok(User {
            id: record.try_get(mapper.primary_key())?,
            name: record.try_get("name")?,
            state,
        })
    }
}

/// Soft-deletable entity.
#[derive(Debug)]
pub struct Post {
    pub id: i64,
    pub state: EntityState,
}

impl Entity for Post {
    fn map_entity(mapper: &mut EntityMapperBuilder) {
        mapper.cast([("deleted_at", "?date"), ("views", "integer")]);
    }

    fn from_record(mapper: &EntityMapper, record: Record, state: EntityState) -> OrmResult<Self> {
        Ok(Post {
            id: record.try_get(mapper.primary_key())?,
            state,
        })
    }
}

/// Entity with an explicit table and primary key.
#[derive(Debug)]
pub struct Tag {
    pub tag_id: i64,
}

impl Entity for Tag {
    fn map_entity(mapper: &mut EntityMapperBuilder) {
        mapper.table("labels").primary_key("tag_id");
    }

    fn from_record(mapper: &EntityMapper, record: Record, _state: EntityState) -> OrmResult<Self> {
        Ok(Tag {
            tag_id: record.try_get(mapper.primary_key())?,
        })
    }
}

/// Soft-deletable entity that must never be hydrated.
pub struct Archive;

impl Entity for Archive {
    fn map_entity(mapper: &mut EntityMapperBuilder) {
        mapper.cast([("deleted_at", "?date")]);
    }

    fn from_record(_mapper: &EntityMapper, _record: Record, _state: EntityState) -> OrmResult<Self> {
        panic!("unexpected Archive::from_record() call")
    }
}

/// Entity whose mapping cannot be built.
pub struct Broken;

impl Entity for Broken {
    fn map_entity(mapper: &mut EntityMapperBuilder) {
        mapper.primary_key("");
    }

    fn from_record(_mapper: &EntityMapper, _record: Record, _state: EntityState) -> OrmResult<Self> {
        Ok(Broken)
    }
}
