use std::io::stdout;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wt_cli::app::App;
use wt_cli::commands::{
    clear, delete, describe, entries, export, start, status, stop, workspaces,
};
use wt_cli::{Cli, Commands, Config, WorkspacesAction};
use wt_core::filter::{RecordsFilter, WorkspaceScope};

/// Load config and open the engine against its database.
fn open_app(config_path: Option<&Path>) -> Result<(App, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let app = App::open(&config)?;
    Ok((app, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut out = stdout();

    match cli.command {
        Some(Commands::Status) => {
            let (app, config) = open_app(cli.config.as_deref())?;
            status::run(&mut out, &app, &config.database_path)?;
        }
        Some(Commands::Start { workspace }) => {
            let (mut app, _config) = open_app(cli.config.as_deref())?;
            start::run(&mut out, &mut app, workspace)?;
        }
        Some(Commands::Stop { message }) => {
            let (mut app, _config) = open_app(cli.config.as_deref())?;
            stop::run(&mut out, &mut app, message.as_deref())?;
        }
        Some(Commands::Workspaces { action }) => {
            let (mut app, _config) = open_app(cli.config.as_deref())?;
            match action {
                WorkspacesAction::List { json } => workspaces::list(&mut out, &app, json)?,
                WorkspacesAction::Rename { workspace, name } => {
                    workspaces::rename(&mut out, &mut app, workspace, &name)?;
                }
                WorkspacesAction::Count { count } => {
                    workspaces::count(&mut out, &mut app, count)?;
                }
            }
        }
        Some(Commands::Entries {
            workspace,
            period,
            json,
        }) => {
            let (app, _config) = open_app(cli.config.as_deref())?;
            let filter = RecordsFilter {
                workspace: workspace.map_or(WorkspaceScope::All, WorkspaceScope::Only),
                date: period.into(),
            };
            entries::run(&mut out, &app, filter, json)?;
        }
        Some(Commands::Describe { entry, description }) => {
            let (mut app, _config) = open_app(cli.config.as_deref())?;
            describe::run(&mut out, &mut app, entry, &description)?;
        }
        Some(Commands::Delete { entry }) => {
            let (mut app, _config) = open_app(cli.config.as_deref())?;
            delete::run(&mut out, &mut app, entry)?;
        }
        Some(Commands::Clear) => {
            let (mut app, _config) = open_app(cli.config.as_deref())?;
            clear::run(&mut out, &mut app)?;
        }
        Some(Commands::Export { output }) => {
            let (app, _config) = open_app(cli.config.as_deref())?;
            export::run(&mut out, &app, output.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
