//! Prompter CLI
//!
//! Main entry point for the prompter command-line tool.
//! Manages markdown prompts and exports them for any LLM provider.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    CreateCommand, DeleteCommand, EditCommand, ExportCommand, InitCommand, ListCommand,
    ProvidersCommand, RenderCommand, ShowCommand,
};
use prompter_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Prompter - prompt engineering toolkit
#[derive(Parser, Debug)]
#[command(name = "prompter")]
#[command(about = "Manage prompts and export them for any LLM provider", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PROMPTER_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PROMPTER_CONFIG")]
    config: Option<PathBuf>,

    /// Prompts directory (default: <workspace>/prompts)
    #[arg(short, long, global = true, env = "PROMPTER_DIR")]
    dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a prompts directory and provider override file
    Init(InitCommand),

    /// List all prompts
    List(ListCommand),

    /// Display a prompt
    Show(ShowCommand),

    /// Create a new prompt
    Create(CreateCommand),

    /// Open a prompt in $EDITOR
    Edit(EditCommand),

    /// Delete a prompt
    Delete(DeleteCommand),

    /// Render a prompt with variable substitution
    Render(RenderCommand),

    /// Export a prompt for a format or provider
    Export(ExportCommand),

    /// List supported providers and their export formats
    Providers(ProvidersCommand),
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace, cli.config)?.with_overrides(
        cli.dir,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Prompts directory: {:?}", config.prompts_path());
    tracing::debug!("Provider overrides: {:?}", config.providers_path());

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Init(_) => "init",
        Commands::List(_) => "list",
        Commands::Show(_) => "show",
        Commands::Create(_) => "create",
        Commands::Edit(_) => "edit",
        Commands::Delete(_) => "delete",
        Commands::Render(_) => "render",
        Commands::Export(_) => "export",
        Commands::Providers(_) => "providers",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Init(cmd) => cmd.execute(&config),
        Commands::List(cmd) => cmd.execute(&config),
        Commands::Show(cmd) => cmd.execute(&config),
        Commands::Create(cmd) => cmd.execute(&config),
        Commands::Edit(cmd) => cmd.execute(&config),
        Commands::Delete(cmd) => cmd.execute(&config),
        Commands::Render(cmd) => cmd.execute(&config),
        Commands::Export(cmd) => cmd.execute(&config),
        Commands::Providers(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
