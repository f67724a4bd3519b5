//! create-local-app instantiates parameterized template trees into new projects
//! and turns finished projects back into reusable templates.
//! It also keeps a local registry of system (bundled) and contributed templates.

/// Bundled template archives and their extraction
pub mod archive;

/// Command-line interface module for the create-local-app application
pub mod cli;

/// Configuration record at its project-local and user-global scopes
pub mod config;

/// Common constants: file names, registry layout, fixed module paths
pub mod constants;

/// Error types and handling for the create-local-app application
pub mod error;

/// File and directory exclusion rules
/// Decides which entries of a live project are left out of a template
pub mod ignore;

/// env_logger initialization
pub mod logger;

/// Forward and reverse materialization of template trees
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Two-tier template registry with version-gated system template extraction
pub mod registry;

/// Token substitution between template and project content
pub mod substitution;

/// Resolved substitution variables for a single run
pub mod vars;
