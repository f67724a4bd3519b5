//! Command-line interface implementation for create-local-app.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, ArgGroup, Parser};
use std::path::PathBuf;

use crate::registry::validate_template_name;

/// Command-line arguments structure for create-local-app.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "create-local-app: scaffold desktop projects from reversible templates",
    long_about = None,
    after_help = "With no options, creates a project in the current directory, prompting for its details."
)]
#[command(group(ArgGroup::new("mode").args(["auto", "create", "snapshot", "remove", "list"])))]
pub struct Args {
    /// Use saved configuration without prompts
    #[arg(long)]
    pub auto: bool,

    /// Create a template from the current directory, replacing values with tokens
    #[arg(long, value_name = "TEMPLATE", value_parser = parse_template_name)]
    pub create: Option<String>,

    /// Copy the current directory into a template as is
    #[arg(long, value_name = "TEMPLATE", value_parser = parse_template_name)]
    pub snapshot: Option<String>,

    /// Remove a contributed template
    #[arg(long, value_name = "TEMPLATE", value_parser = parse_template_name)]
    pub remove: Option<String>,

    /// Template to create the project from
    #[arg(long, value_name = "TEMPLATE", value_parser = parse_template_name)]
    pub template: Option<String>,

    /// List system and contributed templates
    #[arg(long)]
    pub list: bool,

    /// Proceed without confirmation (overwrite existing files)
    #[arg(short, long)]
    pub force: bool,

    /// Directory holding the configuration and template registry
    /// (defaults to ~/.create-local-app)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_template_name(name: &str) -> Result<String, String> {
    validate_template_name(name).map_err(|e| e.to_string())?;
    Ok(name.to_string())
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 0 after printing help or version
/// * With status code 1 on any argument error
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}
