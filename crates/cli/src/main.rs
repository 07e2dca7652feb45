#![forbid(unsafe_code)]

mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::OptionFlags;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "notesnap=info,ns_storage=info";
const VERBOSE_FILTER: &str = "notesnap=debug,ns_storage=debug";

#[derive(Parser)]
#[command(name = "notesnap")]
#[command(about = "Turn presentation speaker notes into speak buttons on a grid pageset")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one button per note chunk into a copy of a blank pageset.
    Generate(GenerateArgs),
    /// Report layouts, free cells and existing buttons of a pageset.
    Inspect {
        #[arg(long)]
        pageset: PathBuf,
    },
    /// Print the buttons a run would create without touching any pageset.
    Plan {
        #[arg(long)]
        slides: PathBuf,
        #[command(flatten)]
        options: OptionFlags,
        /// Emit the plan as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    slides: PathBuf,
    #[arg(long)]
    pageset: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// Pageset holding the Home button to copy when the target lacks one.
    #[arg(long, env = "NOTESNAP_REFERENCE")]
    reference: PathBuf,
    #[command(flatten)]
    options: OptionFlags,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => commands::generate(
            &args.slides,
            &args.pageset,
            &args.output,
            &args.reference,
            &args.options,
        ),
        Command::Inspect { pageset } => commands::inspect(&pageset),
        Command::Plan {
            slides,
            options,
            json,
        } => commands::plan(&slides, &options, json),
    }
}
