//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// modinfo - generate module-info.java descriptors from classpaths
#[derive(Parser)]
#[command(name = "modinfo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate module-info.java for one or more source sets
    Generate(GenerateArgs),

    /// List the named modules on a module path
    List(ListArgs),

    /// Validate ModInfo.toml without running java
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to ModInfo.toml (defaults to searching upward from cwd)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Source sets to generate (defaults to all)
    #[arg(long = "source-set")]
    pub source_set: Vec<String>,

    /// Java launcher used for module listing
    #[arg(long, env = "MODINFO_JAVA")]
    pub java: Option<PathBuf>,

    /// Kill a listing after this many seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output directory (requires a single source set)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Fail when an explicit requires contradicts the classpaths
    #[arg(long)]
    pub strict: bool,

    /// Print the descriptor instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Module path entries
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Java launcher used for module listing
    #[arg(long, env = "MODINFO_JAVA")]
    pub java: Option<PathBuf>,

    /// Kill the listing after this many seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also show modules without a location (platform modules)
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Path to ModInfo.toml (defaults to searching upward from cwd)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Print the normalized [module] table of each source set
    #[arg(long)]
    pub print: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
