//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use crate::utils::LogLevel;

/// Rate-limited batch LLM query client with latency analytics
#[derive(Parser, Debug)]
#[command(name = "batch-query")]
#[command(version)]
#[command(about = "Send paced batches of prompts to an LLM and analyze response latency")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Explicit log level (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Path to configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit prompts and report latency statistics
    Run(RunArgs),

    /// List the built-in prompt set
    List(ListArgs),

    /// Inspect or create configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Number of prompts to process (default: all)
    #[arg(short, long)]
    pub questions: Option<usize>,

    /// Delay between queries in seconds
    #[arg(short, long, allow_negative_numbers = true)]
    pub delay: Option<f64>,

    /// Queries per batch for progress reporting
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Use the offline demo responder even when credentials are set
    #[arg(long)]
    pub demo: bool,

    /// Read prompts from a file (one per line, or a JSON array)
    #[arg(short, long)]
    pub prompts_file: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Report format (text, json, json-pretty, markdown, csv)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show every result in text output instead of a sample
    #[arg(long)]
    pub show_all: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show prompt numbers and categories
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Destination path
        #[arg(default_value = "./batch-query.yaml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Describe supported environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "batch-query",
            "run",
            "-q",
            "10",
            "--delay",
            "0.25",
            "-b",
            "3",
            "--demo",
            "--format",
            "json",
        ]);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.questions, Some(10));
                assert_eq!(run.delay, Some(0.25));
                assert_eq!(run.batch_size, Some(3));
                assert!(run.demo);
                assert_eq!(run.format.as_deref(), Some("json"));
                assert!(run.output.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["batch-query", "list", "--detailed", "-v", "--log-level", "warn"]);
        assert!(args.verbose);
        assert_eq!(args.log_level, Some(LogLevel::Warn));
        match args.command {
            Command::List(list) => assert!(list.detailed),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_negative_delay_parses() {
        // Rejected later by config validation, not by the parser
        let args = Args::parse_from(["batch-query", "run", "--delay", "-1"]);
        match args.command {
            Command::Run(run) => assert_eq!(run.delay, Some(-1.0)),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_config_init_default_path() {
        let args = Args::parse_from(["batch-query", "config", "init"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, "./batch-query.yaml");
                assert!(!force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
