use super::server::{report, write_project};
use super::{apply_changes, fill_new, notify, open_project, render_servers, Context};
use crate::cli::{OutputFormat, ServerChanges, ServerFields};
use crate::editor::{record_to_json_text, App, Confirm};
use crate::error::EditorError;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn list_saved(app: &App, ctx: &Context) -> Result<()> {
    match ctx.format {
        OutputFormat::Human => {
            if app.library().is_empty() {
                println!(
                    "{}",
                    "No saved servers. Use `mcpdesk saved add` to save one.".dimmed()
                );
                return Ok(());
            }
            let saved = app.library().entries().iter().map(|(n, r)| (n, r));
            println!("{}", render_servers(saved));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(app.library())?);
        }
    }
    Ok(())
}

pub fn show_saved(app: &App, name: &str) -> Result<()> {
    let record = app
        .library()
        .get(name)
        .ok_or_else(|| EditorError::SavedServerNotFound(name.to_string()))?;
    println!("{}", record_to_json_text(name, record));
    Ok(())
}

/// Saves a preset without opening a project.
pub async fn add_saved(
    app: &mut App,
    ctx: &Context,
    name: Option<String>,
    fields: ServerFields,
) -> Result<()> {
    let editor = app.begin_create();
    fill_new(editor, name, fields)?;
    let (name, record) = editor.resolve()?;
    app.add_saved(name.clone(), record).await?;
    app.cancel();

    report(ctx, "saved", &name, format!("Saved server: {}", name.cyan()))
}

pub async fn edit_saved(
    app: &mut App,
    ctx: &Context,
    name: String,
    changes: ServerChanges,
) -> Result<()> {
    let editor = app.begin_edit_saved(&name)?;
    apply_changes(editor, changes)?;
    let (new_name, record) = editor.resolve()?;
    app.update_saved(&name, new_name.clone(), record).await?;
    app.cancel();

    if new_name != name {
        report(
            ctx,
            "updated",
            &new_name,
            format!("Renamed saved server: {} → {}", name.cyan(), new_name.cyan()),
        )
    } else {
        report(ctx, "updated", &name, format!("Saved server updated: {}", name.cyan()))
    }
}

pub async fn remove_saved(app: &mut App, ctx: &Context, name: String) -> Result<()> {
    if !app.library().contains(&name) {
        return Err(EditorError::SavedServerNotFound(name).into());
    }
    let prompt = format!("Delete saved server \"{}\"?", name);
    if !ctx.prompter().confirm(&prompt) {
        notify::warning("Cancelled");
        return Ok(());
    }

    app.remove_saved(&name).await?;
    report(ctx, "removed", &name, format!("Deleted saved server: {}", name.cyan()))
}

pub async fn use_saved(app: &mut App, ctx: &Context, name: String) -> Result<()> {
    open_project(app, ctx).await?;

    app.copy_saved_to_current(&name)?;
    write_project(app, ctx).await?;

    report(
        ctx,
        "added",
        &name,
        format!("Server {} added to current configuration", name.cyan()),
    )
}
