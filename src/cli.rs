use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "test-logs-reporter",
    about = "Relays failed test cases from a test run to a reporting endpoint",
    version,
    after_help = "Logs are written to: ~/.local/share/test-logs-reporter/logs/test-logs-reporter.log\n\nThe endpoint is read from FAILED_TEST_RESULTS_ENDPOINT unless --endpoint is given."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to YAML config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Observe a test run from its lifecycle event stream
    Listen {
        /// Read events from this file instead of stdin
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Reporting endpoint (overrides config and environment)
        #[arg(long, short = 'e')]
        endpoint: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (endpoint, tag, log_level)
        key: String,
    },
}
