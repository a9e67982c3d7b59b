use crate::constants::{exit_codes, verbosity, DEFAULT_TEMPLATE_SUFFIX};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// CLI arguments for filetemplate.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suffix marking templated files and directories.
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_TEMPLATE_SUFFIX, global = true)]
    pub suffix: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the placeholder names referenced below a directory.
    #[command(alias = "LIST")]
    List(ListArgs),

    /// Expand every template below a directory.
    #[command(alias = "REPLACE")]
    Replace(ReplaceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Template directory to scan.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Definitions to check the referenced names against.
    #[arg(value_name = "DEFINITIONS")]
    pub definitions: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplaceArgs {
    /// Template directory, processed in place unless `--output-dir` is given.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Placeholder definitions (`.properties`, `.json`, `.yaml` or `.yml`).
    #[arg(value_name = "DEFINITIONS")]
    pub definitions: PathBuf,

    /// Expand into a copy of the template directory instead of in place.
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Force overwrite of an existing output directory.
    #[arg(short, long, requires = "output_dir")]
    pub force: bool,
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn get_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument
                | ErrorKind::MissingSubcommand
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ) {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Warn,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_verbose_flags_to_log_filters() {
        assert_eq!(get_log_level_from_verbose(verbosity::OFF), LevelFilter::Warn);
        assert_eq!(get_log_level_from_verbose(verbosity::INFO), LevelFilter::Info);
        assert_eq!(get_log_level_from_verbose(verbosity::DEBUG), LevelFilter::Debug);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE), LevelFilter::Trace);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE + 1), LevelFilter::Trace);
    }

    #[test]
    fn parses_list_with_optional_definitions() {
        let cli = Cli::parse_from(["filetemplate", "list", "templates"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.directory, PathBuf::from("templates"));
                assert!(args.definitions.is_none());
            }
            other => panic!("Expected list, got {other:?}"),
        }
        assert_eq!(cli.suffix, ".filetemplate");
    }

    #[test]
    fn accepts_upper_case_command_names() {
        let cli = Cli::parse_from(["filetemplate", "LIST", "templates", "site.properties"]);
        assert!(matches!(cli.command, Commands::List(ListArgs { definitions: Some(_), .. })));

        let cli = Cli::parse_from(["filetemplate", "REPLACE", "templates", "site.properties"]);
        assert!(matches!(cli.command, Commands::Replace(_)));
    }

    #[test]
    fn parses_full_replace_flags() {
        let cli = Cli::parse_from([
            "filetemplate",
            "-vv",
            "--suffix",
            ".tpl",
            "replace",
            "templates",
            "site.yaml",
            "--output-dir",
            "out",
            "--force",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.suffix, ".tpl");
        match cli.command {
            Commands::Replace(args) => {
                assert_eq!(args.directory, PathBuf::from("templates"));
                assert_eq!(args.definitions, PathBuf::from("site.yaml"));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(args.force);
            }
            other => panic!("Expected replace, got {other:?}"),
        }
    }

    #[test]
    fn replace_requires_definitions() {
        let result = Cli::try_parse_from(["filetemplate", "replace", "templates"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn force_requires_output_dir() {
        let result =
            Cli::try_parse_from(["filetemplate", "replace", "templates", "defs", "--force"]);
        assert!(result.is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
