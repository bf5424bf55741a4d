use crate::config::ConfigLoader;
use crate::problems::{self, Mode, Problem};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args)]
pub struct RunArgs {
    /// Problem to solve
    #[arg(long, value_enum, default_value_t = Problem::Sqrt)]
    pub problem: Problem,

    /// Feed one data item per iteration, or the whole dataset every iteration
    #[arg(long, value_enum, default_value_t = Mode::Online)]
    pub mode: Mode,

    /// Extra config file layered over user and project config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override run.max_iter
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RunArgs, verbose: bool) -> Result<()> {
    let mut config = ConfigLoader::load(args.config.as_deref())?;
    if let Some(max_iter) = args.max_iter {
        config.run.max_iter = max_iter;
    }
    debug!(problem = %args.problem, mode = %args.mode, ?config, "starting run");

    let report = problems::solve(args.problem, args.mode, &config, verbose)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
