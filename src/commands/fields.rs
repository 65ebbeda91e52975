use crate::cli::{ServerChanges, ServerFields};
use crate::editor::{EditorView, ServerEditor};
use crate::error::EditorError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fill a blank editor from command-line flags.
pub fn fill_new(
    editor: &mut ServerEditor,
    name: Option<String>,
    fields: ServerFields,
) -> Result<(), EditorError> {
    if let Some(json) = fields.json {
        let json = match &name {
            Some(name) => name_bare_record(json, name),
            None => json,
        };
        editor.switch_to(EditorView::Json)?;
        editor.set_json_text(json);
        if let Some(name) = name {
            editor.switch_to(EditorView::Form)?;
            editor.form_mut().name = name;
        }
        return Ok(());
    }

    let form = editor.form_mut();
    form.name = name.unwrap_or_default();
    form.command = fields.cmd.unwrap_or_default();
    form.args = fields.args.join("\n");
    form.env = match fields.env_json {
        Some(text) => text,
        None if fields.env.is_empty() => String::new(),
        None => env_text(fields.env),
    };
    Ok(())
}

/// Apply flags on top of an editor prefilled from an existing entry.
pub fn apply_changes(editor: &mut ServerEditor, changes: ServerChanges) -> Result<(), EditorError> {
    if let Some(json) = changes.json {
        editor.switch_to(EditorView::Json)?;
        editor.set_json_text(json);
        return Ok(());
    }

    let form = editor.form_mut();
    if let Some(name) = changes.rename {
        form.name = name;
    }
    if let Some(cmd) = changes.cmd {
        form.command = cmd;
    }
    if changes.clear_args {
        form.args.clear();
    } else if !changes.args.is_empty() {
        form.args = changes.args.join("\n");
    }
    if changes.clear_env {
        form.env.clear();
    }
    if let Some(text) = changes.env_json {
        form.env = text;
    }
    if !changes.env.is_empty() {
        let mut env: BTreeMap<String, String> = if form.env.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&form.env).map_err(|e| EditorError::InvalidEnvJson(e.to_string()))?
        };
        env.extend(changes.env);
        form.env = env_text(env);
    }
    Ok(())
}

/// A bare `{command, ...}` object takes the positional name unless it names itself.
fn name_bare_record(json: String, name: &str) -> String {
    let Ok(Value::Object(mut obj)) = serde_json::from_str::<Value>(&json) else {
        return json;
    };
    if obj.contains_key("mcpServers") || obj.contains_key("name") {
        return json;
    }
    obj.insert("name".to_string(), Value::String(name.to_string()));
    format!("{:#}", Value::Object(obj))
}

fn env_text(pairs: impl IntoIterator<Item = (String, String)>) -> String {
    let obj: Map<String, Value> = pairs
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    format!("{:#}", Value::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerRecord;

    #[test]
    fn test_fill_new_from_flags() {
        let mut editor = ServerEditor::blank();
        fill_new(
            &mut editor,
            Some("gh".into()),
            ServerFields {
                cmd: Some("docker".into()),
                args: vec!["run".into(), "-i".into()],
                env: vec![("TOKEN".into(), "t".into())],
                ..Default::default()
            },
        )
        .unwrap();

        let (name, record) = editor.resolve().unwrap();
        assert_eq!(name, "gh");
        assert_eq!(
            record,
            ServerRecord::new("docker").with_args(["run", "-i"]).with_env([("TOKEN", "t")])
        );
    }

    #[test]
    fn test_fill_new_from_json_with_name_override() {
        let mut editor = ServerEditor::blank();
        fill_new(
            &mut editor,
            Some("renamed".into()),
            ServerFields {
                json: Some(r#"{"mcpServers": {"orig": {"command": "uvx"}}}"#.into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(editor.resolve().unwrap(), ("renamed".to_string(), ServerRecord::new("uvx")));
    }

    #[test]
    fn test_fill_new_names_bare_json_record() {
        let mut editor = ServerEditor::blank();
        fill_new(
            &mut editor,
            Some("mine".into()),
            ServerFields {
                json: Some(r#"{"command": "node", "args": ["server.js"]}"#.into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            editor.resolve().unwrap(),
            ("mine".to_string(), ServerRecord::new("node").with_args(["server.js"]))
        );
    }

    #[test]
    fn test_apply_changes_merges_env() {
        let record = ServerRecord::new("node").with_args(["a.js"]).with_env([("A", "1")]);
        let mut editor = ServerEditor::for_record("n", &record);
        apply_changes(
            &mut editor,
            ServerChanges {
                rename: Some("m".into()),
                env: vec![("B".into(), "2".into())],
                clear_args: true,
                ..Default::default()
            },
        )
        .unwrap();

        let (name, updated) = editor.resolve().unwrap();
        assert_eq!(name, "m");
        assert!(updated.args.is_empty());
        assert_eq!(updated.env.len(), 2);
    }

    #[test]
    fn test_apply_changes_keeps_untouched_fields() {
        let record = ServerRecord::new("node").with_args(["a.js"]);
        let mut editor = ServerEditor::for_record("n", &record);
        apply_changes(&mut editor, ServerChanges::default()).unwrap();
        assert_eq!(editor.resolve().unwrap(), ("n".to_string(), record));
    }
}
