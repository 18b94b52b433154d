//! Command-line interface definitions.
//!
//! Defines the `clpctl` CLI using `clap`: cluster lifecycle commands
//! (`start`, `stop`, `status`), the commands dispatched into a running
//! cluster (`compress`, `decompress`, `search`) and `config show`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Lifecycle orchestrator for a single-host CLP cluster
#[derive(Parser, Debug)]
#[command(name = "clpctl")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// CLP install root (defaults to $CLP_HOME)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Cluster config file (defaults to <home>/etc/clp-config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the clpctl CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the cluster (network, services, schema, scheduler, workers)
    Start(StartArgs),

    /// Stop the cluster and remove every container on its network
    Stop,

    /// Show the containers on the cluster network
    Status,

    /// Compress log files from the input directory
    Compress(CompressArgs),

    /// Decompress archived files
    Decompress(DecompressArgs),

    /// Search compressed logs
    Search(SearchArgs),

    /// Inspect cluster configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `clpctl config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the persisted runtime configuration with passwords masked.
    Show,
}

/// Arguments for `clpctl start`.
#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Number of compression workers (defaults to the number of CPUs)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,
}

/// Arguments for `clpctl compress`.
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Files or directories under the input logs directory
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Arguments for `clpctl decompress`.
#[derive(Args, Debug)]
pub struct DecompressArgs {
    /// Original paths to extract (all files when omitted)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Directory to write extracted files to
    #[arg(short = 'd', long, value_name = "DIR")]
    pub extraction_dir: PathBuf,
}

/// Arguments for `clpctl search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Wildcard query
    pub query: String,

    /// Restrict the search to one original file path
    #[arg(long, value_name = "PATH")]
    pub file_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_name_and_version() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "clpctl");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn color_choice_default_is_auto() {
        assert!(matches!(ColorChoice::default(), ColorChoice::Auto));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "clpctl", "status", "--json", "-vv", "--home", "/opt/clp", "-c", "/tmp/c.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.home, Some(PathBuf::from("/opt/clp")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn parse_color_never() {
        let cli = Cli::try_parse_from(["clpctl", "--color", "never", "stop"]).unwrap();
        assert!(matches!(cli.color, ColorChoice::Never));
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn parse_start_workers() {
        let cli = Cli::try_parse_from(["clpctl", "start", "--workers", "4"]).unwrap();
        match cli.command {
            Commands::Start(args) => assert_eq!(args.workers, Some(4)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compress_requires_a_path() {
        assert!(Cli::try_parse_from(["clpctl", "compress"]).is_err());

        let cli = Cli::try_parse_from(["clpctl", "compress", "/logs/a", "/logs/b"]).unwrap();
        match cli.command {
            Commands::Compress(args) => assert_eq!(args.paths.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn decompress_requires_extraction_dir() {
        assert!(Cli::try_parse_from(["clpctl", "decompress", "/logs/a"]).is_err());

        let cli = Cli::try_parse_from(["clpctl", "decompress", "-d", "/tmp/out"]).unwrap();
        match cli.command {
            Commands::Decompress(args) => {
                assert!(args.paths.is_empty());
                assert_eq!(args.extraction_dir, PathBuf::from("/tmp/out"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_search_with_file_path() {
        let cli = Cli::try_parse_from([
            "clpctl",
            "search",
            "*error*",
            "--file-path",
            "/logs/app.log",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "*error*");
                assert_eq!(args.file_path, Some(PathBuf::from("/logs/app.log")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_config_show() {
        let cli = Cli::try_parse_from(["clpctl", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommand::Show)));
    }
}
