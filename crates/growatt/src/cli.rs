//! Clap derive structures for the `growatt` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// growatt -- read your Growatt solar plants from the command line
#[derive(Debug, Parser)]
#[command(
    name = "growatt",
    version,
    about = "Monitor Growatt solar plants from the command line",
    long_about = "Query plants, devices, weather and fault logs from the Growatt\n\
        monitoring server, or run a local web gateway that keeps one\n\
        authenticated session for browser clients.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GROWATT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Server base URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Account username (overrides config and GROWATT_USERNAME)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with the configured credentials
    Login,

    /// Show the session state (logs in if needed)
    Status,

    /// List plants on the account
    #[command(alias = "p")]
    Plants,

    /// Show one plant
    Plant {
        /// Plant id
        id: String,
    },

    /// List devices of a plant
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Show weather at a plant
    Weather {
        /// Plant id
        plant_id: String,
    },

    /// List fault and warning events of a plant
    Faults(FaultsArgs),

    /// Run the local web gateway
    Serve(ServeArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Read commands ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Plant id
    pub plant_id: String,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Devices per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Args)]
pub struct FaultsArgs {
    /// Plant id
    pub plant_id: String,

    /// Only events of this device serial number
    #[arg(long)]
    pub device_sn: Option<String>,

    /// Only events on this day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Event class (1 = fault, 2 = warning, 3 = info)
    #[arg(long = "type")]
    pub kind: Option<u8>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides web.bind)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the effective configuration (password masked)
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
