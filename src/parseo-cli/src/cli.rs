//! Command-line interface for parseo
//!
//! Argument parsing for the `parseo` binary. Subcommands compile formulas
//! against the configured whitelist, evaluate them against context files and
//! manage the configuration file.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// parseo - compile and evaluate whitelisted formulas
///
/// Formulas may only reference variables matched by a configured resolver
/// and call whitelisted functions.
#[derive(Parser, Debug)]
#[command(name = "parseo")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Show how a formula is rewritten\n  \
    parseo test 'IF(C0 == 2, M0, M1)'\n\n  \
    # Evaluate against a CSV frame and a JSON list\n  \
    parseo eval 'M0 + M1 + C0' --context source=metrics.csv --context config=config.json\n\n  \
    # Inline context values\n  \
    parseo eval 'config.rate * 2' --set 'config_map={\"rate\": 1.5}'\n\n  \
    # Write a starter configuration\n  \
    parseo config init parseo.toml")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (replaces the discovered one)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a formula and print its rewritten form
    Test {
        /// Formula text
        expression: String,

        /// Print the rewritten tree as JSON instead of canonical text
        #[arg(long)]
        ast: bool,
    },

    /// Compile and evaluate a formula
    Eval {
        /// Formula text
        expression: String,

        /// Context value loaded from a file (.csv or .json)
        #[arg(short, long = "context", value_name = "KEY=FILE")]
        contexts: Vec<String>,

        /// Context value given as inline JSON
        #[arg(short, long = "set", value_name = "KEY=JSON")]
        sets: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        /// Config action
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Target path
        #[arg(default_value = "parseo.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
#[allow(dead_code)]
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Split a `KEY=VALUE` argument
pub fn split_assignment(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eval() {
        let cli = parse_args_from([
            "parseo",
            "-vv",
            "eval",
            "M0 + M1",
            "--context",
            "source=data.csv",
            "--set",
            "config=[1]",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Eval {
                expression,
                contexts,
                sets,
                json,
            } => {
                assert_eq!(expression, "M0 + M1");
                assert_eq!(contexts, vec!["source=data.csv"]);
                assert_eq!(sets, vec!["config=[1]"]);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_init_default_path() {
        let cli = parse_args_from(["parseo", "config", "init"]).unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Init { path, force },
            } => {
                assert_eq!(path, PathBuf::from("parseo.toml"));
                assert!(!force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = parse_args_from(["parseo", "test", "M0", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(parse_args_from(["parseo"]).is_err());
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("source=a=b.csv"), Some(("source", "a=b.csv")));
        assert_eq!(split_assignment(" config =[1]"), Some(("config", "[1]")));
        assert_eq!(split_assignment("=x"), None);
        assert_eq!(split_assignment("novalue"), None);
    }
}
