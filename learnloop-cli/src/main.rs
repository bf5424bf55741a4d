use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod problems;

#[derive(Parser)]
#[command(name = "learnloop", about = "Run iterative problems through composed strategies")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a demo problem
    Run(commands::run::RunArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Config(args) => commands::config::run(args),
    }
}
