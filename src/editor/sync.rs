//! Conversions between the three representations of a server entry: form
//! fields, JSON text, and [`ServerRecord`]. Views never read each other
//! directly; every derivation goes through this module.

use crate::config::{
    parse_env, validate_fields, validate_name, validate_record, McpConfig, ServerRecord,
};
use crate::error::EditorError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const SERVERS_KEY: &str = "mcpServers";

/// Raw text of the server form, exactly as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub command: String,
    /// One argument per line.
    pub args: String,
    /// JSON object text, or blank.
    pub env: String,
}

impl FormFields {
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.command, &self.args, &self.env]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

pub fn form_to_record(form: &FormFields) -> Result<(String, ServerRecord), EditorError> {
    validate_name(&form.name)?;
    if form.command.trim().is_empty() {
        return Err(EditorError::MissingCommand);
    }

    let args = form
        .args
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    let env = if form.env.trim().is_empty() {
        BTreeMap::new()
    } else {
        let value: Value = serde_json::from_str(&form.env)
            .map_err(|e| EditorError::InvalidEnvJson(e.to_string()))?;
        parse_env(&value)?
    };

    let record = ServerRecord {
        command: form.command.clone(),
        args,
        env,
    };
    Ok((form.name.clone(), record))
}

pub fn record_to_form(name: &str, record: &ServerRecord) -> FormFields {
    let env = if record.env.is_empty() {
        String::new()
    } else {
        format!("{:#}", env_value(&record.env))
    };

    FormFields {
        name: name.to_string(),
        command: record.command.clone(),
        args: record.args.join("\n"),
        env,
    }
}

/// Single-entry `{"mcpServers": {name: record}}` document, pretty-printed.
pub fn record_to_json_text(name: &str, record: &ServerRecord) -> String {
    let mut servers = Map::new();
    servers.insert(name.to_string(), record_value(record));

    let mut doc = Map::new();
    doc.insert(SERVERS_KEY.to_string(), Value::Object(servers));
    format!("{:#}", Value::Object(doc))
}

/// Accepts the `mcpServers` wrapper (first entry wins) or a flat
/// `{name, command, args, env}` object.
pub fn json_text_to_record(text: &str) -> Result<(String, ServerRecord), EditorError> {
    let value = parse_document(text)?;
    let obj = value
        .as_object()
        .ok_or_else(|| EditorError::MalformedJson("expected a JSON object".to_string()))?;

    match obj.get(SERVERS_KEY) {
        Some(Value::Object(servers)) => {
            // Additional entries are ignored when editing a single server.
            let (name, entry) = servers.iter().next().ok_or(EditorError::EmptyServerSet)?;
            let record = validate_record(entry)?;
            validate_name(name)?;
            Ok((name.clone(), record))
        }
        Some(_) => Err(EditorError::MalformedJson(format!(
            "{} must be an object",
            SERVERS_KEY
        ))),
        None => {
            let record = validate_fields(obj)?;
            let name = match obj.get("name") {
                Some(Value::String(name)) => name.clone(),
                _ => return Err(EditorError::MissingName),
            };
            validate_name(&name)?;
            Ok((name, record))
        }
    }
}

pub fn config_to_json_text(config: &McpConfig) -> String {
    let servers = config
        .servers
        .iter()
        .map(|(name, record)| (name.clone(), record_value(record)))
        .collect::<Map<_, _>>();

    let mut doc = Map::new();
    doc.insert(SERVERS_KEY.to_string(), Value::Object(servers));
    format!("{:#}", Value::Object(doc))
}

/// Parses a whole-configuration document; every entry must pass record validation.
pub fn json_text_to_config(text: &str) -> Result<McpConfig, EditorError> {
    let value = parse_document(text)?;
    let servers = value
        .get(SERVERS_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            EditorError::MalformedJson(format!("Invalid structure: {} field is required", SERVERS_KEY))
        })?;

    let mut config = McpConfig::default();
    for (name, entry) in servers {
        let in_server = |reason: EditorError| EditorError::InvalidServer {
            name: name.clone(),
            reason: Box::new(reason),
        };
        validate_name(name).map_err(in_server)?;
        let record = validate_record(entry).map_err(in_server)?;
        config.servers.insert(name.clone(), record);
    }
    Ok(config)
}

/// Re-indents arbitrary JSON text.
pub fn format_json(text: &str) -> Result<String, EditorError> {
    Ok(format!("{:#}", parse_document(text)?))
}

/// Summary of a whole-configuration document, for display before applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPreview {
    pub servers: Vec<(String, String)>,
}

pub fn preview_config(text: &str) -> Result<ConfigPreview, EditorError> {
    let config = json_text_to_config(text)?;
    let servers = config
        .servers
        .iter()
        .map(|(name, record)| {
            let mut summary = record.display_command();
            if !record.env.is_empty() {
                summary.push_str(&format!(" ({} env vars)", record.env.len()));
            }
            (name.clone(), summary)
        })
        .collect();
    Ok(ConfigPreview { servers })
}

fn parse_document(text: &str) -> Result<Value, EditorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EditorError::MalformedJson("no JSON input".to_string()));
    }
    serde_json::from_str(text).map_err(|e| EditorError::MalformedJson(e.to_string()))
}

fn record_value(record: &ServerRecord) -> Value {
    let mut obj = Map::new();
    obj.insert("command".to_string(), Value::String(record.command.clone()));
    if !record.args.is_empty() {
        obj.insert(
            "args".to_string(),
            Value::Array(record.args.iter().cloned().map(Value::String).collect()),
        );
    }
    if !record.env.is_empty() {
        obj.insert("env".to_string(), env_value(&record.env));
    }
    Value::Object(obj)
}

fn env_value(env: &BTreeMap<String, String>) -> Value {
    Value::Object(
        env.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

/// Which editor tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorView {
    #[default]
    Form,
    Json,
}

/// The two editor views of one server. Only the active view is authoritative;
/// the other is re-derived from it on every switch.
#[derive(Debug, Clone, Default)]
pub struct ServerEditor {
    form: FormFields,
    json: String,
    view: EditorView,
}

impl ServerEditor {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn for_record(name: &str, record: &ServerRecord) -> Self {
        Self {
            form: record_to_form(name, record),
            json: record_to_json_text(name, record),
            view: EditorView::Form,
        }
    }

    pub fn view(&self) -> EditorView {
        self.view
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormFields {
        &mut self.form
    }

    pub fn json_text(&self) -> &str {
        &self.json
    }

    pub fn set_json_text(&mut self, text: impl Into<String>) {
        self.json = text.into();
    }

    /// On failure the editor stays on the current view with its text untouched.
    pub fn switch_to(&mut self, view: EditorView) -> Result<(), EditorError> {
        if view == self.view {
            return Ok(());
        }

        match view {
            EditorView::Json => {
                self.json = if self.form.is_blank() {
                    String::new()
                } else {
                    let (name, record) = form_to_record(&self.form)?;
                    record_to_json_text(&name, &record)
                };
            }
            EditorView::Form => {
                self.form = if self.json.trim().is_empty() {
                    FormFields::default()
                } else {
                    let (name, record) = json_text_to_record(&self.json)?;
                    record_to_form(&name, &record)
                };
            }
        }
        self.view = view;
        Ok(())
    }

    /// The entry described by the active view.
    pub fn resolve(&self) -> Result<(String, ServerRecord), EditorError> {
        match self.view {
            EditorView::Form => form_to_record(&self.form),
            EditorView::Json => json_text_to_record(&self.json),
        }
    }
}
