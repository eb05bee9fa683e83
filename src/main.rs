//! Glacial - add glacial-ui components to your Vue project
//!
//! A command line tool that materializes registry items into a consumer
//! project's directory layout, rewriting internal references to match the
//! project's own alias scheme and reconciling the result against whatever
//! already exists on disk.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod installer;
mod paths;
mod project;
mod registry;
mod transform;
mod ui;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add(args) => commands::add::run(cli.cwd, args),
        Commands::Init(args) => commands::init::run(cli.cwd, args),
        Commands::Info => commands::info::run(cli.cwd),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", ui::error("Error:"), e);
        std::process::exit(1);
    }
}
