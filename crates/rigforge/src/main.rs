use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod build;
mod candidates;
mod catalog;
mod checkout;
mod config;
mod context;
mod format;
mod selection;

use config::Config;
use context::Context;

#[derive(Parser)]
#[command(name = "rigforge")]
#[command(about = "Custom PC builder with compatibility checks", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Config file (defaults to <config dir>/rigforge/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read the catalog from a JSON file instead of the shop API
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog parts
    #[command(alias = "ls")]
    Catalog(catalog::CatalogArgs),

    /// List parts that fit a slot of the given build
    Candidates(candidates::CandidatesArgs),

    /// Assemble a build and show its compatibility, power and cost
    #[command(alias = "b")]
    Build(build::BuildArgs),

    /// Place an order for a build
    Checkout(checkout::CheckoutArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still overrides the default level.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let config = Config::load(cli.config.as_deref())?;
    let ctx = Context::new(config, cli.catalog);

    match cli.command {
        Commands::Catalog(args) => catalog::execute(args, &ctx),
        Commands::Candidates(args) => candidates::execute(args, &ctx),
        Commands::Build(args) => build::execute(args, &ctx),
        Commands::Checkout(args) => checkout::execute(args, &ctx),
    }
}
