use super::ServerRecord;
use crate::error::EditorError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Structural check of a single server entry in its JSON form.
///
/// `null` for `args` or `env` counts as absent. Returns the normalized record.
pub fn validate_record(value: &Value) -> Result<ServerRecord, EditorError> {
    let obj = value.as_object().ok_or(EditorError::MissingCommand)?;
    validate_fields(obj)
}

pub(crate) fn validate_fields(obj: &Map<String, Value>) -> Result<ServerRecord, EditorError> {
    let command = match obj.get("command") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return Err(EditorError::MissingCommand),
    };

    let args = match obj.get("args") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or(EditorError::InvalidArgs)?,
        Some(_) => return Err(EditorError::InvalidArgs),
    };

    let env = match obj.get("env") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(value) => parse_env(value)?,
    };

    Ok(ServerRecord { command, args, env })
}

/// A flat object of string values.
pub(crate) fn parse_env(value: &Value) -> Result<BTreeMap<String, String>, EditorError> {
    let obj = value.as_object().ok_or(EditorError::InvalidEnv)?;
    obj.iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), s.clone())),
            _ => Err(EditorError::InvalidEnv),
        })
        .collect()
}

pub fn validate_name(name: &str) -> Result<(), EditorError> {
    if name.trim().is_empty() {
        return Err(EditorError::MissingName);
    }
    Ok(())
}

impl ServerRecord {
    /// Checks an already-typed record before it is committed to a collection.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.command.trim().is_empty() {
            return Err(EditorError::MissingCommand);
        }
        Ok(())
    }
}
