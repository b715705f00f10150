//! modinfo CLI - generate module-info.java descriptors from classpaths

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modinfo::util::context::ManifestError;
use modinfo::util::diagnostic::{emit, suggestions, Diagnostic};
use modinfo::GenerateError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        emit(&to_diagnostic(&e), color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("modinfo=debug")
    } else {
        EnvFilter::new("modinfo=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Render an error chain, preferring the typed diagnostic of the root cause.
fn to_diagnostic(err: &anyhow::Error) -> Diagnostic {
    if let Some(cause) = err.chain().find_map(|c| c.downcast_ref::<GenerateError>()) {
        let mut diag = cause.to_diagnostic();
        // outer anyhow contexts name the source set or manifest
        for outer in err
            .chain()
            .take_while(|c| c.downcast_ref::<GenerateError>().is_none())
        {
            diag = diag.with_context(outer.to_string());
        }
        return diag;
    }

    let diag = Diagnostic::error(format!("{:#}", err));
    if err.downcast_ref::<ManifestError>().is_some() {
        diag.with_suggestion(suggestions::NO_MANIFEST)
    } else {
        diag
    }
}
