//! Clap derive structures for the `ticketdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Compiled into `build.rs` as well, so it may only depend on clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ticketdesk -- alarm ticket dashboard from the command line
#[derive(Debug, Parser)]
#[command(
    name = "ticketdesk",
    version,
    about = "Review and act on alarm tickets from the command line",
    long_about = "Lists, resolves and deletes the alarm notification tickets kept by\n\
        the ticket API. Uses the bearer token stored for the active profile.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "TICKETDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Ticket API base URL (overrides profile)
    #[arg(long, env = "TICKETDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TICKETDESK_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "TICKETDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TICKETDESK_TIMEOUT", global = true)]
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
    /// Plain text, one ticket ID per line (scripting)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, resolve and delete alarm tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Manage the stored bearer token
    Token(TokenArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets
    #[command(alias = "ls")]
    List(TicketListArgs),

    /// Show a single ticket
    Get {
        /// Ticket ID
        id: String,
    },

    /// Delete a ticket (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Ticket ID
        id: String,
    },

    /// Mark a ticket resolved
    Resolve {
        /// Ticket ID
        id: String,

        /// Resolution notes
        #[arg(long, short = 'n')]
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Server-side query parameters plus the client-side calendar filter.
#[derive(Debug, Args)]
pub struct TicketListArgs {
    /// Status filter: sent, failed, pending, resolved, or all
    #[arg(long)]
    pub status: Option<String>,

    /// Severity filter: critical, major, minor, or all
    #[arg(long)]
    pub severity: Option<String>,

    /// Only tickets for this site
    #[arg(long)]
    pub site_id: Option<String>,

    /// Only tickets of this alarm type
    #[arg(long)]
    pub alarm_type: Option<String>,

    /// Server-side lower bound on the send time
    #[arg(long)]
    pub start_date: Option<String>,

    /// Server-side upper bound on the send time
    #[arg(long)]
    pub end_date: Option<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Sort key
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long)]
    pub sort_order: Option<SortOrder>,

    /// Calendar day to show, in local time (YYYY-MM-DD, default today)
    #[arg(long, conflicts_with = "all_history")]
    pub date: Option<String>,

    /// Hour of day to show: all, 0-23, or HH:00
    #[arg(long, conflicts_with = "all_history")]
    pub hour: Option<String>,

    /// Show every fetched ticket regardless of date and hour
    #[arg(long, short = 'a')]
    pub all_history: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOKEN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store a bearer token for the active profile (prompts if omitted)
    Set {
        /// Token value
        token: Option<String>,
    },

    /// Remove the stored token
    Clear,

    /// Show who the stored token belongs to and when it expires
    Status,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
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

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
