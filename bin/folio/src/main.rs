//! Folio CLI
//!
//! Validates and inspects the site's content collections.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use folio::cmd::{self, list::CollectionName};

/// Command-line interface for folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Validate the content collections of a personal site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = folio_core::config::CONFIG_FILE)]
    config: std::path::PathBuf,

    /// Override the project root collections are resolved against
    #[arg(long)]
    root: Option<std::path::PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Validate every content collection
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the validated entries of a collection
    List {
        /// Collection to list
        #[arg(value_enum)]
        collection: CollectionName,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the site identity constants
    Site {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { strict } => {
            let config = cmd::load_config(&cli.config, cli.root.as_deref())?;
            cmd::check::run(&config, strict)?;
        }
        Commands::List { collection, json } => {
            let config = cmd::load_config(&cli.config, cli.root.as_deref())?;
            cmd::list::run(&config, collection, json)?;
        }
        Commands::Site { json } => {
            cmd::site::run(json)?;
        }
    }

    Ok(())
}
