//! tmesh: Command-line generator for T-structure shell meshes.
//!
//! Builds the T-junction shell mesh from mesh-tstruct, then exports it,
//! summarizes it or validates it. Suitable for scripting solver test cases.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=mesh_tstruct=info` - Basic operation logging
//! - `RUST_LOG=mesh_tstruct=debug` - Layout and mesh counts
//! - `RUST_LOG=mesh_tstruct::timing=debug` - Performance timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Quad mesh with a finer upper plate
//! tmesh generate --nx1 8 --ny1 8 --nx2 8 -o tstruct.msh
//!
//! # Parameters from a file, with one override
//! tmesh validate --config params.json --ratio 0.25
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{generate, info, validate};

/// tmesh - Generate structured T-junction shell meshes.
///
/// Two rectangular plates joined along a seam, with eight named boundaries.
#[derive(Parser)]
#[command(name = "tmesh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Mesh parameters shared by every subcommand.
///
/// Flags override values read from `--config`.
#[derive(Args, Clone, Default)]
pub struct ParamArgs {
    /// Parameter file (JSON, or TOML for any other extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build triangles instead of quads
    #[arg(long, conflicts_with = "quads")]
    triangles: bool,

    /// Build quads (overrides a config file that asks for triangles)
    #[arg(long)]
    quads: bool,

    /// Upper plate subdivisions along x
    #[arg(long)]
    nx1: Option<usize>,

    /// Upper plate subdivisions along y (must be even)
    #[arg(long)]
    ny1: Option<usize>,

    /// Lower plate subdivisions along x (must equal nx1)
    #[arg(long)]
    nx2: Option<usize>,

    /// Lower plate subdivisions along z
    #[arg(long)]
    ny2: Option<usize>,

    /// Position of the lower plate along y, in [0, 1]
    #[arg(long)]
    ratio: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the mesh and write it to a file
    Generate {
        /// Output file path (.msh, .vtk or .obj)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Build the mesh and display counts, bounds and boundary groups
    Info {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Build the mesh and check its boundary chains and open edges
    Validate {
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "mesh_tstruct=info",
            2 => "mesh_tstruct=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Generate { output, params } => generate::run(params, output, &cli),
        Commands::Info { params } => info::run(params, &cli),
        Commands::Validate { params } => validate::run(params, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(mesh_err) = e.downcast_ref::<mesh_tstruct::MeshError>() {
                eprintln!("{}: {}", "Error".red().bold(), mesh_err);
                eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    mesh_err.recovery_suggestion()
                );
                if let Some(location) = mesh_err.location() {
                    eprintln!("  {}: {}", "Location".yellow(), location);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
