//! medrule CLI - learn diagnostic rules from patient cases and apply them.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use medrule::prelude::Target;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "medrule")]
#[command(author, version, about = "medrule - Rule-based diagnosis from learned rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new medrule project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Learn rules from the labeled patients of a knowledge base
    Learn {
        /// Knowledge base JSON file (default: from medrule.toml)
        #[arg(short, long)]
        kb: Option<String>,

        /// Where to write the learned rules (default: from medrule.toml)
        #[arg(short, long)]
        output: Option<String>,

        /// Outcome to learn: disease, test or treatment
        #[arg(short, long)]
        target: Option<Target>,

        /// Beam width of the star search
        #[arg(short, long)]
        beam_width: Option<usize>,
    },

    /// Apply learned rules to patients
    Diagnose {
        /// Knowledge base JSON file (default: from medrule.toml)
        #[arg(short, long)]
        kb: Option<String>,

        /// Rules JSON file (default: from medrule.toml)
        #[arg(short, long)]
        rules: Option<String>,

        /// Only diagnose this patient (default: every unlabeled patient)
        #[arg(short, long)]
        patient: Option<String>,

        /// Print diagnoses as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show knowledge base contents and validate it
    Inspect {
        /// Knowledge base JSON file (default: from medrule.toml)
        #[arg(short, long)]
        kb: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Learn {
            kb,
            output,
            target,
            beam_width,
        } => commands::learn::run(kb, output, target, beam_width, cli.verbose),
        Commands::Diagnose {
            kb,
            rules,
            patient,
            json,
        } => commands::diagnose::run(kb, rules, patient, json),
        Commands::Inspect { kb } => commands::inspect::run(kb),
    }
}
