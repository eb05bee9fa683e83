//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Glacial - add UI components to your Vue project
#[derive(Parser, Debug)]
#[command(
    name = "glacial",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Add glacial-ui components and blocks to your project",
    long_about = "Glacial materializes registry items (components, composables, blocks) \
                  into your project's own directory layout, rewriting their imports to \
                  match your alias configuration.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  glacial init\n    \
                  glacial add button\n    \
                  glacial add dialog --overwrite\n    \
                  glacial add card --path ./widgets\n    \
                  glacial info\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/glacial-ui/glacial"
)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, short = 'c', global = true)]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add components to your project
    Add(AddArgs),

    /// Create a components.json for this project
    Init(InitArgs),

    /// Print detected project information
    Info,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Add a component:\n    glacial add button\n\n\
                   Add several components:\n    glacial add button card dialog\n\n\
                   Overwrite differing files without prompting:\n    glacial add button --overwrite\n\n\
                   Place files under a custom directory:\n    glacial add button --path ./widgets\n\n\
                   Read items from another registry directory:\n    glacial add button --registry ../registry")]
pub struct AddArgs {
    /// Names of the registry items to add
    #[arg(required = true)]
    pub components: Vec<String>,

    /// Registry directory to read items from
    #[arg(long, default_value = "registry")]
    pub registry: PathBuf,

    /// Custom output path for the item's files
    #[arg(long)]
    pub path: Option<String>,

    /// Overwrite existing files without prompting
    #[arg(long, short = 'o')]
    pub overwrite: bool,

    /// Answer yes to every confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Mute all output
    #[arg(long, short = 's')]
    pub silent: bool,
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Recreate components.json even if one exists
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_requires_component() {
        let result = Cli::try_parse_from(["glacial", "add"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_parses_flags() {
        let cli = Cli::try_parse_from([
            "glacial", "add", "button", "card", "--overwrite", "--path", "./widgets",
        ])
        .unwrap();

        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.components, vec!["button", "card"]);
                assert!(args.overwrite);
                assert_eq!(args.path.as_deref(), Some("./widgets"));
                assert!(!args.yes);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_global_cwd_flag() {
        let cli = Cli::try_parse_from(["glacial", "add", "button", "--cwd", "/tmp/app"]).unwrap();
        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp/app")));
    }
}
