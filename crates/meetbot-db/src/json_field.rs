//! Adapter for structured values stored in JSON TEXT columns.

use std::ops::{Deref, DerefMut};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonFieldError {
    #[error("not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("JSON does not match the expected shape: {0}")]
    Validation(#[source] serde_json::Error),
    #[error("cannot store {0} in a JSON column")]
    Unsupported(&'static str),
}

/// A structured value persisted in a single JSON column.
///
/// Writes serialize the inner value to a JSON string; reads validate the
/// stored mapping back into the structured type, failing loudly on
/// malformed data rather than repairing it. A nullable column is modeled
/// as `Option<JsonField<T>>`, so NULL bypasses conversion entirely.
///
/// In-place mutation is tracked explicitly: every mutable access marks the
/// field dirty *before* the mutation point is handed out. The query layer
/// checks the flag to decide whether the column needs rewriting even
/// though the field itself was never reassigned, and clears it once the
/// write lands. Marking repeatedly is idempotent. The wrapper is not
/// shared across threads; each request owns its row graph.
#[derive(Debug, Clone)]
pub struct JsonField<T> {
    value: T,
    dirty: bool,
}

impl<T> JsonField<T> {
    /// A freshly constructed value counts as a pending change, so a field
    /// assigned after load is flushed on the next save.
    pub fn new(value: T) -> Self {
        Self { value, dirty: true }
    }

    /// A value materialized from storage starts clean.
    fn loaded(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    /// Replace the inner value outright.
    pub fn set(&mut self, value: T) {
        self.dirty = true;
        self.value = value;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: DeserializeOwned> JsonField<T> {
    /// Entry point for values assigned into the column from the outside.
    ///
    /// JSON null is legal and means "no value". A JSON-encoded string is
    /// parsed and validated; a plain mapping is materialized into the
    /// structured type. Anything else is rejected.
    pub fn coerce(input: serde_json::Value) -> Result<Option<Self>, JsonFieldError> {
        match input {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(raw) => {
                let parsed: serde_json::Value =
                    serde_json::from_str(&raw).map_err(JsonFieldError::InvalidJson)?;
                let value = serde_json::from_value(parsed).map_err(JsonFieldError::Validation)?;
                Ok(Some(Self::new(value)))
            }
            mapping @ serde_json::Value::Object(_) => {
                let value =
                    serde_json::from_value(mapping).map_err(JsonFieldError::Validation)?;
                Ok(Some(Self::new(value)))
            }
            serde_json::Value::Bool(_) => Err(JsonFieldError::Unsupported("a boolean")),
            serde_json::Value::Number(_) => Err(JsonFieldError::Unsupported("a number")),
            serde_json::Value::Array(_) => Err(JsonFieldError::Unsupported("an array")),
        }
    }
}

impl<T> From<T> for JsonField<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for JsonField<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for JsonField<T> {
    fn deref_mut(&mut self) -> &mut T {
        // Flag first: the caller may mutate through the reference at any
        // point after this returns.
        self.dirty = true;
        &mut self.value
    }
}

impl<T: Serialize> ToSql for JsonField<T> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let json = serde_json::to_string(&self.value)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(json))
    }
}

impl<T: DeserializeOwned> FromSql for JsonField<T> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        let parsed: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| FromSqlError::Other(Box::new(JsonFieldError::InvalidJson(e))))?;
        let value = serde_json::from_value(parsed)
            .map_err(|e| FromSqlError::Other(Box::new(JsonFieldError::Validation(e))))?;
        Ok(Self::loaded(value))
    }
}
