use super::{apply_changes, fill_new, notify, open_project, render_servers, Context};
use crate::cli::{OutputFormat, ServerChanges, ServerFields};
use crate::editor::{preview_config, record_to_json_text, App, Confirm, SaveOutcome};
use crate::error::EditorError;
use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::{Path, PathBuf};

pub async fn list_servers(app: &mut App, ctx: &Context) -> Result<()> {
    open_project(app, ctx).await?;

    match ctx.format {
        OutputFormat::Human => {
            let dir = app.directory().map(|d| d.display().to_string()).unwrap_or_default();
            println!("{} {}", "Project:".bold(), dir.cyan());
            if app.current().is_empty() {
                println!("{}", "No servers configured. Use `mcpdesk add` to add one.".dimmed());
            } else {
                println!("{}", render_servers(app.current().servers.iter()));
            }

            println!();
            println!("{}", "Saved servers:".bold());
            if app.library().is_empty() {
                println!("{}", "No saved servers.".dimmed());
            } else {
                let saved = app.library().entries().iter().map(|(n, r)| (n, r));
                println!("{}", render_servers(saved));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "directory": app.directory(),
                "mcpServers": app.current().servers,
                "saved": app.library(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub async fn show_config(app: &mut App, ctx: &Context, name: Option<String>) -> Result<()> {
    open_project(app, ctx).await?;

    let text = match name {
        Some(name) => {
            let record = app
                .current()
                .servers
                .get(&name)
                .ok_or(EditorError::ServerNotFound(name.clone()))?;
            record_to_json_text(&name, record)
        }
        None => app.current_json_text(),
    };
    println!("{}", text);
    Ok(())
}

pub async fn add_server(
    app: &mut App,
    ctx: &Context,
    name: Option<String>,
    fields: ServerFields,
) -> Result<()> {
    open_project(app, ctx).await?;

    fill_new(app.begin_create(), name, fields)?;
    let name = app.submit().await?;
    write_project(app, ctx).await?;

    report(ctx, "added", &name, format!("Added server: {}", name.cyan()))
}

pub async fn edit_server(
    app: &mut App,
    ctx: &Context,
    name: String,
    changes: ServerChanges,
) -> Result<()> {
    open_project(app, ctx).await?;

    apply_changes(app.begin_edit_current(&name)?, changes)?;
    let new_name = app.submit().await?;
    write_project(app, ctx).await?;

    if new_name != name {
        report(
            ctx,
            "updated",
            &new_name,
            format!("Renamed server: {} → {}", name.cyan(), new_name.cyan()),
        )
    } else {
        report(ctx, "updated", &name, format!("Updated server: {}", name.cyan()))
    }
}

pub async fn remove_server(app: &mut App, ctx: &Context, name: String) -> Result<()> {
    open_project(app, ctx).await?;

    if !app.current().servers.contains_key(&name) {
        return Err(EditorError::ServerNotFound(name).into());
    }
    let prompt = format!("Are you sure you want to remove server \"{}\"?", name);
    if !ctx.prompter().confirm(&prompt) {
        notify::warning("Cancelled");
        return Ok(());
    }

    app.remove_current(&name);
    write_project(app, ctx).await?;

    report(ctx, "removed", &name, format!("Removed server: {}", name.cyan()))
}

pub async fn import_config(app: &mut App, ctx: &Context, file: PathBuf) -> Result<()> {
    open_project(app, ctx).await?;

    let text = read_input(&file)?;
    let preview = preview_config(&text)?;
    if let OutputFormat::Human = ctx.format {
        println!("{} server(s) in document:", preview.servers.len());
        for (name, summary) in &preview.servers {
            println!("  {} {}", name.cyan(), summary.dimmed());
        }
    }

    let count = app.apply_config_json(&text).await?;
    write_project(app, ctx).await?;

    match ctx.format {
        OutputFormat::Human => notify::success(format!("Applied {} server configuration(s)", count)),
        OutputFormat::Json => {
            let output = serde_json::json!({ "applied": count });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

pub async fn validate_config(app: &mut App, ctx: &Context) -> Result<()> {
    open_project(app, ctx).await?;

    app.validate_current().await?;

    match ctx.format {
        OutputFormat::Human => notify::success("Configuration is valid"),
        OutputFormat::Json => {
            let output = serde_json::json!({ "valid": true, "servers": app.current().len() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

pub async fn clear_config(app: &mut App, ctx: &Context) -> Result<()> {
    open_project(app, ctx).await?;
    app.clear_current();
    write_project(app, ctx).await
}

/// One-shot commands are explicit user actions, so they end by writing the file.
pub(crate) async fn write_project(app: &mut App, ctx: &Context) -> Result<()> {
    let mut confirm = ctx.prompter();
    match app.save_current(&mut confirm).await? {
        SaveOutcome::Saved(_) => {}
        SaveOutcome::Cleared => {
            if let OutputFormat::Human = ctx.format {
                notify::success(".mcp.json contents cleared");
            }
        }
        SaveOutcome::Cancelled => notify::warning(".mcp.json left unchanged"),
    }
    Ok(())
}

pub(crate) fn report(
    ctx: &Context,
    action: &str,
    name: &str,
    message: impl std::fmt::Display,
) -> Result<()> {
    match ctx.format {
        OutputFormat::Human => notify::success(message),
        OutputFormat::Json => {
            let output = serde_json::json!({ action: name });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read JSON from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))
}
