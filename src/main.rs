mod backend;
mod cli;
mod commands;
mod config;
mod editor;
mod error;

use backend::LocalBackend;
use clap::Parser;
use cli::{Cli, Commands, SavedCommands};
use commands::{Context, TerminalPicker};
use config::AppConfigStore;
use editor::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .init();

    // Support MCPDESK_CONFIG env var for testing
    let store = if let Ok(path) = std::env::var("MCPDESK_CONFIG") {
        AppConfigStore::with_path(path.into())
    } else {
        AppConfigStore::new()?
    };

    let mut app = App::new(Box::new(LocalBackend::new(store, Box::new(TerminalPicker))));
    if let Err(err) = app.init().await {
        commands::notify::error(format!("{:#}", err));
        commands::notify::warning(
            "Continuing with an empty library; saved servers will not be written until the app config is fixed",
        );
    }

    let ctx = Context {
        format: cli.format,
        dir: cli.dir,
        yes: cli.yes,
    };

    match cli.command {
        Commands::List => commands::list_servers(&mut app, &ctx).await?,
        Commands::Show { name } => commands::show_config(&mut app, &ctx, name).await?,
        Commands::Add { name, fields } => {
            commands::add_server(&mut app, &ctx, name, fields).await?;
        }
        Commands::Edit { name, changes } => {
            commands::edit_server(&mut app, &ctx, name, changes).await?;
        }
        Commands::Remove { name } => commands::remove_server(&mut app, &ctx, name).await?,
        Commands::Import { file } => commands::import_config(&mut app, &ctx, file).await?,
        Commands::Validate => commands::validate_config(&mut app, &ctx).await?,
        Commands::Clear => commands::clear_config(&mut app, &ctx).await?,
        Commands::Saved { command } => match command {
            SavedCommands::List => commands::list_saved(&app, &ctx)?,
            SavedCommands::Show { name } => commands::show_saved(&app, &name)?,
            SavedCommands::Add { name, fields } => {
                commands::add_saved(&mut app, &ctx, name, fields).await?;
            }
            SavedCommands::Edit { name, changes } => {
                commands::edit_saved(&mut app, &ctx, name, changes).await?;
            }
            SavedCommands::Remove { name } => commands::remove_saved(&mut app, &ctx, name).await?,
            SavedCommands::Use { name } => commands::use_saved(&mut app, &ctx, name).await?,
        },
        Commands::Shell => commands::run_shell(&mut app, &ctx).await?,
    }

    Ok(())
}
