//! Error handling for create-local-app.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while resolving, materializing or extracting templates.
///
/// Registry and configuration errors abort the invocation. `ProcessError` is the
/// per-file variant: the materializer records it and keeps walking.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents malformed or unreadable configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Failed to parse JSON: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents registry and archive extraction failures
    #[error("Template error: {0}.")]
    TemplateError(String),

    #[error("Template '{name}' not found in contributed or system templates.")]
    TemplateNotFound { name: String },

    #[error("Default template not found at '{path}' (run initialization to set up templates).")]
    DefaultTemplateMissing { path: String },

    /// Represents invalid user input: missing fields, bad template names
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// A single file failed during materialization
    #[error("Failed to process '{path}': {reason}.")]
    ProcessError { path: String, reason: String },

    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),

    #[error("Directory walk error: {0}.")]
    WalkDirError(#[from] walkdir::Error),

    #[error("Pattern error: {0}.")]
    GlobError(#[from] globset::Error),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
