//! Command-line interface implementation for mktree.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::config::parse_assignment;

/// Command-line arguments structure for mktree.
#[derive(Parser, Debug)]
#[command(author, version, about = "mktree: create files and directories from a tree source", long_about = None)]
pub struct Args {
    /// Path to the tree source file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory the tree is created in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Variable substituted for %(KEY) while preprocessing; may be repeated
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// JSON or YAML file of variables; --var values take precedence
    #[arg(long, value_name = "PATH")]
    pub vars_file: Option<PathBuf>,

    /// Leave references to undefined variables as they are instead of failing
    #[arg(long)]
    pub allow_undefined_vars: bool,

    /// Print the tree without creating any files or directories
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    parse_assignment(s).map_err(|e| e.to_string())
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
