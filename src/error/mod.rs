//! Error types and handling for Glacial
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! The taxonomy follows the pipeline: configuration errors abort the whole
//! command, path and filesystem errors are fatal for the file being
//! processed, and registry errors distinguish not-found, unauthorized,
//! forbidden and parse failures so callers can report them precisely.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Glacial operations
#[derive(Error, Diagnostic, Debug)]
pub enum GlacialError {
    // Configuration errors
    #[error("Configuration file not found in {path}")]
    #[diagnostic(
        code(glacial::config::not_found),
        help("Run 'glacial init' to create a components.json for this project")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(glacial::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(glacial::config::invalid))]
    ConfigInvalid { message: String },

    #[error("\"{name}\" is a built-in registry and cannot be overridden")]
    #[diagnostic(
        code(glacial::config::registry_reserved),
        help("Pick a different name for your registry in components.json")
    )]
    RegistryNameReserved { name: String },

    #[error("Failed to load {path}")]
    #[diagnostic(
        code(glacial::config::tsconfig_load_failed),
        help("Alias resolution needs a readable tsconfig.json or jsconfig.json")
    )]
    TsconfigLoadFailed { path: String, reason: String },

    #[error("Could not resolve the \"{alias}\" alias to a directory")]
    #[diagnostic(
        code(glacial::config::alias_not_resolved),
        help("Check the compilerOptions.paths table of your tsconfig.json")
    )]
    AliasNotResolved { alias: String },

    // Destination path errors
    #[error("Refusing to write outside the project root: {path}")]
    #[diagnostic(code(glacial::paths::unsafe_target))]
    PathSafetyViolation { path: String },

    #[error("Cannot write to {path}: path exists and is a directory")]
    #[diagnostic(
        code(glacial::paths::directory_conflict),
        help("Provide a file path instead")
    )]
    DirectoryConflict { path: String },

    // Registry errors
    #[error("Item '{name}' not found in registry")]
    #[diagnostic(
        code(glacial::registry::not_found),
        help("Check that the item name is correct and the registry is accessible")
    )]
    RegistryNotFound { name: String },

    #[error("Unauthorized to read '{name}' from registry")]
    #[diagnostic(code(glacial::registry::unauthorized))]
    #[allow(dead_code)]
    RegistryUnauthorized { name: String },

    #[error("Access to '{name}' is forbidden")]
    #[diagnostic(code(glacial::registry::forbidden))]
    RegistryForbidden { name: String },

    #[error("Failed to parse registry item '{name}'")]
    #[diagnostic(code(glacial::registry::parse_failed))]
    RegistryParseFailed { name: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(glacial::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(glacial::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    // Prompt errors
    #[error("Prompt failed: {reason}")]
    #[diagnostic(code(glacial::prompt::failed))]
    PromptFailed { reason: String },

    // Project preflight errors
    #[error("No Tailwind project detected at {path}")]
    #[diagnostic(
        code(glacial::project::not_detected),
        help(
            "Glacial needs a Tailwind CSS entry file (and a tailwind.config for v3 projects) \
             before it can write a configuration"
        )
    )]
    ProjectNotDetected { path: String },
}

/// Result type alias for Glacial operations
pub type Result<T> = std::result::Result<T, GlacialError>;

impl GlacialError {
    /// Wrap an I/O error as a read failure for `path`
    pub fn read(path: &std::path::Path, e: std::io::Error) -> Self {
        GlacialError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    }

    /// Wrap an I/O error as a write failure for `path`
    pub fn write(path: &std::path::Path, e: std::io::Error) -> Self {
        GlacialError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    }
}
