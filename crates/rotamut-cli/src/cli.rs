use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "rotamut - Rotamer-driven point mutation of residue side chains in macromolecular structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the side chain of one residue using a sampled rotamer.
    Mutate(MutateArgs),
    /// Inspect, validate or export chi-angle libraries.
    Library(LibraryArgs),
}

/// Arguments for the `mutate` subcommand.
#[derive(Args, Debug)]
pub struct MutateArgs {
    /// Path to the mutation job file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub job: PathBuf,

    /// Write the mutation report to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override the chi library named by the job file.
    #[arg(short = 'l', long, value_name = "PATH")]
    pub chi_library: Option<PathBuf>,

    /// Keep the atoms of the existing side chain that the new residue type
    /// does not replace.
    #[arg(long)]
    pub keep_sidechain: bool,
}

/// Arguments for the `library` subcommand.
#[derive(Args, Debug)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommands,
}

/// Available commands for chi libraries.
#[derive(Subcommand, Debug)]
pub enum LibraryCommands {
    /// Print the chi definitions of one or more residue types.
    Show {
        /// Residue names to print. Prints every residue type when omitted.
        residues: Vec<String>,

        /// Read definitions from this TOML library instead of the built-in one.
        #[arg(short = 'l', long, value_name = "PATH")]
        library: Option<PathBuf>,
    },
    /// Check that a TOML chi library parses and is self-consistent.
    Validate {
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Write the built-in chi library as TOML.
    Export {
        /// Destination file. Prints to standard output when omitted.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
