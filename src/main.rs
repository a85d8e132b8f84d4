use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod build;
mod commands;
mod config;

#[derive(Parser)]
#[command(version, about = "A minimal static site generator for Markdown posts")]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// The command to execute (defaults to `build`)
    #[command(subcommand)]
    command: Option<MdsiteCommand>,
}

#[derive(Parser, Default)]
struct BuildArgs {
    /// The path to the configuration file (defaults to an optional mdsite.yaml)
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file (defaults to an optional mdsite.yaml)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Only print what would be deleted
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Subcommand)]
enum MdsiteCommand {
    /// Build the site (the default when no command is given)
    Build(BuildArgs),

    /// Delete the generated site
    Clean(CleanArgs),

    /// Initialize a new site with starter templates
    Init(InitArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "mdsite=debug" } else { "mdsite=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        None => {
            commands::build::run(&BuildArgs::default()).await?;
        }
        Some(MdsiteCommand::Build(args)) => {
            commands::build::run(&args).await?;
        }
        Some(MdsiteCommand::Clean(args)) => {
            commands::clean::run(&args).await?;
        }
        Some(MdsiteCommand::Init(args)) => {
            commands::init::run(&args).await?;
        }
    }

    Ok(())
}
