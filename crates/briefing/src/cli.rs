use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use crate::cmd::{
    self, compose::ComposeArgs, lint::LintArgs, resolve::ResolveArgs, schema::SchemaArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "briefing",
    about = "Compose and resolve architecture briefing questionnaires",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Engine config file (overrides BRIEFING_CONFIG and the user config dir)
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate catalog documents and report authoring issues
    Lint(LintArgs),
    /// Compose the questionnaire for a configuration
    Compose(ComposeArgs),
    /// Resolve active questions and progress for an answer set
    Resolve(ResolveArgs),
    /// Print JSON Schemas for catalog documents or answer sets
    Schema(SchemaArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Lint(args) => cmd::lint::run(args),
        Commands::Compose(args) => cmd::compose::run(args),
        Commands::Resolve(args) => cmd::resolve::run(args, cli.config.as_deref()),
        Commands::Schema(args) => cmd::schema::run(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
