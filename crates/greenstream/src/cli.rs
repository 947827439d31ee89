//! Clap derive structures for the `greenstream` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// greenstream -- carbon footprint of video streaming
#[derive(Debug, Parser)]
#[command(
    name = "greenstream",
    version,
    about = "Estimate the carbon footprint of video streaming",
    long_about = "Estimate the carbon footprint of watching a video, and rank cloud\n\
        servers by the forecast carbon intensity of the grid they run on.\n\n\
        Forecasts come from Electricity Maps, places are geocoded with Nominatim.",
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
    /// Identifier of the consumer or provider making the request
    #[arg(long, env = "GREENSTREAM_CALLER", global = true)]
    pub caller: Option<String>,

    /// Role the caller acts in
    #[arg(long, env = "GREENSTREAM_ROLE", default_value = "consumer", global = true)]
    pub role: Role,

    /// Act as administrator (must match the configured admin token)
    #[arg(long, global = true)]
    pub admin_token: Option<String>,

    /// Electricity Maps API token (overrides config and keyring)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GREENSTREAM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Upstream request timeout in seconds (overrides config)
    #[arg(long, env = "GREENSTREAM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    /// Watches videos and tracks their footprint
    Consumer,
    /// Hosts videos and picks servers
    Provider,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the carbon footprint of one viewing
    #[command(alias = "fp")]
    Footprint(FootprintArgs),

    /// List, filter and rank cloud servers
    #[command(alias = "srv")]
    Servers(ServersArgs),

    /// Inspect and clear recorded footprints
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Check upstream availability
    Status,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHARED ARGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the viewer (or audience) is.
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// City name
    #[arg(long)]
    pub city: String,

    /// Country name or code
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProviderFilter {
    /// Comma-separated providers: aws, gcp, azure (default: configured set)
    #[arg(long, short = 'p', value_name = "LIST")]
    pub providers: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FOOTPRINT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FootprintArgs {
    /// Viewing duration in minutes
    #[arg(long, short = 'd')]
    pub duration: u32,

    /// Vertical resolution: 240, 360, 480, 720, 1080, 1440, 2160, 4320
    #[arg(long, short = 'r')]
    pub resolution: String,

    /// Playback device: computer, mobile
    #[arg(long)]
    pub device: String,

    /// Network connection: wifi, cellular, cable
    #[arg(long)]
    pub connection: String,

    #[command(flatten)]
    pub location: LocationArgs,

    /// Viewing start (RFC 3339), defaults to now
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServersArgs {
    #[command(subcommand)]
    pub command: ServersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServersCommand {
    /// List catalog servers
    #[command(alias = "ls")]
    List(ProviderFilter),

    /// Servers whose availability zones cover a location
    Eligible {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        filter: ProviderFilter,
    },

    /// Eligible servers ordered by forecast carbon intensity
    Rank {
        #[command(flatten)]
        location: LocationArgs,

        /// Window length in minutes
        #[arg(long, short = 'd')]
        duration: u32,

        /// Window start (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        #[command(flatten)]
        filter: ProviderFilter,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HISTORY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List recorded footprints
    #[command(alias = "ls")]
    List,

    /// Mean recorded footprint
    #[command(alias = "avg")]
    Average,

    /// Sum of recorded footprints
    Total,

    /// Delete recorded footprints
    Clear,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Store the Electricity Maps token (or the admin token)
    SetToken {
        /// Token value (prompted for when omitted)
        value: Option<String>,

        /// Set the admin token instead
        #[arg(long)]
        admin: bool,

        /// Write the token into the config file instead of the keyring
        #[arg(long)]
        plaintext: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
