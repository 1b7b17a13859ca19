#![deny(
    // This is overly strict, of course. The intent is somewhat of a "quality seal," less to fix everything, and more to force us to add inline allows, which are even more needlessly verbose, but give us a mechanism to say "we think this is okay, but you might want to take a second look here."
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
)]
//! `erctl`: command-line front end for the evacuation router.
//!
//! Loads a network definition, applies road closures and answers routing questions with both the
//! full Dijkstra engine and the shortcut hierarchy. See `erctl --help`.
mod completions;
mod dot;
mod road;
mod route;
mod shortcuts;

use anyhow::Result;
use clap::{
    crate_version,
    CommandFactory,
    Parser,
    Subcommand,
};

/// Evacuation router command-line interface
#[derive(Parser)]
#[command(about, version = crate_version!(), propagate_version = true)]
struct Cli {
    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`) or an env-filter
    /// directive.
    #[arg(short, long, global = true, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    subcommand: ErSubcommand,
}

#[derive(Subcommand)]
enum ErSubcommand {
    #[command(about = "route between two nodes with both engines")]
    Route(route::Args),

    #[command(about = "build contraction shortcuts for a network")]
    Shortcuts(shortcuts::Args),

    #[command(about = "render a network as a Graphviz DOT file")]
    Dot(dot::Args),

    #[command(about = "generate shell completions for erctl")]
    Completions(completions::Args),
}

fn main() -> Result<()> {
    let args = Cli::parse();
    er_core::logging::setup(&args.verbosity);

    match &args.subcommand {
        ErSubcommand::Route(args) => route::cmd(args),
        ErSubcommand::Shortcuts(args) => shortcuts::cmd(args),
        ErSubcommand::Dot(args) => dot::cmd(args),
        ErSubcommand::Completions(args) => completions::cmd(args, Cli::command()),
    }
}
