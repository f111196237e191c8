//! Clap derive structures for the `aruwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use aruwatch_core::{SortDirection, SortKey};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aruwatch -- watch and manage Wi-Fi clients via the Aruba portal
#[derive(Debug, Parser)]
#[command(
    name = "aruwatch",
    version,
    about = "Monitor Aruba Wi-Fi clients from the command line",
    long_about = "Watches the client list of an Aruba monitoring portal, one\n\
        network profile at a time, with filtering, sorting, and admin\n\
        operations (hostname renames, whitelist changes).",
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
    /// Portal entry from the config file to use
    #[arg(long, short = 'p', env = "ARUWATCH_PORTAL", global = true)]
    pub portal: Option<String>,

    /// Portal URL (overrides the config file)
    #[arg(long, short = 'c', env = "ARUWATCH_URL", global = true)]
    pub url: Option<String>,

    /// Portal login username (omit for read-only access)
    #[arg(long, short = 'u', env = "ARUWATCH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Network profile to poll (name or backend id)
    #[arg(long, short = 'n', env = "ARUWATCH_NETWORK", global = true)]
    pub network: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARUWATCH_OUTPUT",
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
    #[arg(long, short = 'k', env = "ARUWATCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ARUWATCH_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and manage connected Wi-Fi clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// List the network profiles the portal can serve
    #[command(alias = "net")]
    Networks,

    /// Manage CLI configuration and portal entries
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared view arguments ────────────────────────────────────────────

/// Filter/sort flags shared by `list` and `watch`.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Keep only rows where any field contains this text
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Column to sort by
    #[arg(long, default_value = "hostname", value_enum)]
    pub sort: SortColumn,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,
}

impl ViewArgs {
    pub fn sort_config(&self) -> aruwatch_core::SortConfig {
        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        aruwatch_core::SortConfig::new(self.sort.into(), direction)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    /// Case-insensitive hostname order
    Hostname,
    /// Floor extracted from the AP name (no floor sorts first)
    Floor,
}

impl From<SortColumn> for SortKey {
    fn from(col: SortColumn) -> Self {
        match col {
            SortColumn::Hostname => SortKey::Hostname,
            SortColumn::Floor => SortKey::Floor,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// Fetch and print the current client list once
    #[command(alias = "ls")]
    List(ViewArgs),

    /// Poll the client list continuously and reprint on change
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Poll period in seconds (default from config, normally 55)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Rename a client's display hostname (admin only)
    Rename {
        /// Client IP address
        ip: String,

        /// New hostname
        hostname: String,
    },

    /// Add a client to the whitelist (admin only)
    Whitelist {
        /// Client IP address
        ip: String,
    },

    /// Remove a client from the whitelist (admin only)
    Unwhitelist {
        /// Client IP address
        ip: String,
    },
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

    /// Set a configuration value on the active portal entry
    Set {
        /// Config key (url, username, password_env, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured portal entries
    Portals,

    /// Set the default portal entry
    Use {
        /// Portal name to set as default
        name: String,
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
