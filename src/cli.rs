//! Command-line argument definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point for the application configuration engine.
#[derive(Parser, Debug)]
#[command(
    name = "appconf",
    about = "Idempotently bring installed applications in line with a declared configuration",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a configuration document
    Apply(ApplyOpts),
    /// List the supported application handlers
    List,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print version information
    Version,
}

/// Options for the `apply` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ApplyOpts {
    /// Configuration document (YAML, JSON or TOML)
    #[arg(short, long, default_value = "appconf.yaml", env = "APPCONF_CONFIG")]
    pub config: PathBuf,

    /// Placeholder assignment used to expand `{{name}}` in string values
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_apply_with_path() {
        let cli = Cli::parse_from(["appconf", "apply", "--config", "machine.yaml"]);
        assert!(
            matches!(&cli.command, Command::Apply(opts) if opts.config == PathBuf::from("machine.yaml"))
        );
    }

    #[test]
    fn parse_apply_dry_run_short() {
        let cli = Cli::parse_from(["appconf", "-d", "apply", "-c", "a.json"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_apply_dry_run_after_subcommand() {
        let cli = Cli::parse_from(["appconf", "apply", "--config", "a.json", "--dry-run"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_apply_placeholders() {
        let cli = Cli::parse_from([
            "appconf", "apply", "--set", "user=Bob", "-s", "font=Meslo",
        ]);
        let Command::Apply(opts) = cli.command else {
            panic!("expected apply");
        };
        assert_eq!(opts.set, vec!["user=Bob", "font=Meslo"]);
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["appconf", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["appconf", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Command::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["appconf", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["appconf", "-v", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["appconf", "install"]).is_err());
    }
}
