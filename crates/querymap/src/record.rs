//! Column-keyed row data.
//!
//! A [`Record`] is what the entity layer hands to [`crate::Entity::from_record`]
//! and what primary-key generators receive. Values are stored as JSON so that
//! getters, setters and generators can work without knowing the Rust type of a
//! column.

use crate::error::{OrmError, OrmResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

/// A map of column name to JSON value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    columns: Map<String, JsonValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of `column`, if present.
    pub fn get(&self, column: &str) -> Option<&JsonValue> {
        self.columns.get(column)
    }

    /// Deserialize `column` into `T`.
    ///
    /// A missing column decodes as JSON `null`, so `Option<T>` targets yield `None`.
    pub fn try_get<T: DeserializeOwned>(&self, column: &str) -> OrmResult<T> {
        let value = self.columns.get(column).cloned().unwrap_or(JsonValue::Null);
        serde_json::from_value(value).map_err(|e| OrmError::decode(column, e.to_string()))
    }

    pub fn insert(&mut self, column: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.columns.insert(column.into(), value)
    }

    pub fn remove(&mut self, column: &str) -> Option<JsonValue> {
        self.columns.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.columns.iter()
    }

    pub fn into_map(self) -> Map<String, JsonValue> {
        self.columns
    }

    /// Decode every column of a driver row.
    ///
    /// Temporal types are rendered as RFC 3339 / ISO 8601 strings and UUIDs as
    /// hyphenated strings. Unsupported column types yield [`OrmError::Decode`].
    pub fn from_pg_row(row: &Row) -> OrmResult<Self> {
        let mut record = Record::new();
        for (idx, column) in row.columns().iter().enumerate() {
            let value = decode_column(row, idx, column.name(), column.type_())?;
            record.insert(column.name(), value);
        }
        Ok(record)
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(columns: Map<String, JsonValue>) -> Self {
        Self { columns }
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn get<'a, T>(row: &'a Row, idx: usize, name: &str) -> OrmResult<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| OrmError::decode(name, e.to_string()))
}

fn decode_column(row: &Row, idx: usize, name: &str, ty: &Type) -> OrmResult<JsonValue> {
    let value = if *ty == Type::BOOL {
        get::<bool>(row, idx, name)?.map(JsonValue::from)
    } else if *ty == Type::INT2 {
        get::<i16>(row, idx, name)?.map(JsonValue::from)
    } else if *ty == Type::INT4 {
        get::<i32>(row, idx, name)?.map(JsonValue::from)
    } else if *ty == Type::INT8 {
        get::<i64>(row, idx, name)?.map(JsonValue::from)
    } else if *ty == Type::FLOAT4 {
        get::<f32>(row, idx, name)?.map(JsonValue::from)
    } else if *ty == Type::FLOAT8 {
        get::<f64>(row, idx, name)?.map(JsonValue::from)
    } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
        get::<String>(row, idx, name)?.map(JsonValue::from)
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        get::<JsonValue>(row, idx, name)?
    } else if *ty == Type::UUID {
        get::<uuid::Uuid>(row, idx, name)?.map(|u| JsonValue::from(u.to_string()))
    } else if *ty == Type::TIMESTAMPTZ {
        get::<chrono::DateTime<chrono::Utc>>(row, idx, name)?
            .map(|t| JsonValue::from(t.to_rfc3339()))
    } else if *ty == Type::TIMESTAMP {
        get::<chrono::NaiveDateTime>(row, idx, name)?
            .map(|t| JsonValue::from(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
    } else if *ty == Type::DATE {
        get::<chrono::NaiveDate>(row, idx, name)?.map(|d| JsonValue::from(d.to_string()))
    } else {
        return Err(OrmError::decode(
            name,
            format!("unsupported column type {}", ty.name()),
        ));
    };
    Ok(value.unwrap_or(JsonValue::Null))
}
