//! Clap derive structures for the `hotkeys` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hotkeys -- browse and curate keyboard shortcut catalogs
#[derive(Debug, Parser)]
#[command(
    name = "hotkeys",
    version,
    about = "Browse keyboard shortcuts by category and program",
    long_about = "Search a catalog of keyboard shortcuts grouped by category and program,\n\
        keep a personal list of favorite programs, and administer the catalog.\n\n\
        Works against a hosted REST store or, with --seed, an offline JSON file.",
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
    /// Config profile to use
    #[arg(long, short = 'p', env = "HOTKEYS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Store URL (overrides profile)
    #[arg(long, env = "HOTKEYS_URL", global = true)]
    pub url: Option<String>,

    /// Store API key
    #[arg(long, env = "HOTKEYS_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Act as this user id (favorites, admin)
    #[arg(long, short = 'u', env = "HOTKEYS_USER", global = true)]
    pub user: Option<String>,

    /// Offline catalog file used instead of the remote store
    #[arg(long, env = "HOTKEYS_SEED", global = true)]
    pub seed: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOTKEYS_OUTPUT",
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
    #[arg(long, short = 'k', env = "HOTKEYS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HOTKEYS_TIMEOUT", default_value = "30", global = true)]
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
    /// Browse categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Browse and search programs
    #[command(alias = "prog")]
    Programs(ProgramsArgs),

    /// Browse and search a program's shortcuts
    #[command(alias = "sc")]
    Shortcuts(ShortcutsArgs),

    /// Manage your favorite programs
    #[command(alias = "fav")]
    Favorites(FavoritesArgs),

    /// Create, update and delete catalog entries
    Admin(AdminArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List all categories
    #[command(alias = "ls")]
    List,

    /// Show one category and its programs
    Show {
        /// Category slug or ID
        category: String,
    },
}

// ── Programs ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProgramsArgs {
    #[command(subcommand)]
    pub command: ProgramsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProgramsCommand {
    /// List programs, optionally filtered
    #[command(alias = "ls")]
    List(ProgramFilterArgs),

    /// Show a program and its shortcuts
    Show {
        /// Program ID
        program: String,

        /// Only shortcuts matching this text
        #[arg(long, short = 's')]
        search: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct ProgramFilterArgs {
    /// Match name or description (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Restrict to a category (slug or ID)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only popular programs
    #[arg(long)]
    pub popular: bool,

    /// Only your favorites (requires --user)
    #[arg(long)]
    pub favorites: bool,
}

// ── Shortcuts ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShortcutsArgs {
    #[command(subcommand)]
    pub command: ShortcutsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShortcutsCommand {
    /// List a program's shortcuts
    #[command(alias = "ls")]
    List {
        /// Program ID
        #[arg(long, short = 'P')]
        program: String,

        /// Match name, keys or description (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,
    },
}

// ── Favorites ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List your favorite programs
    #[command(alias = "ls")]
    List,

    /// Add or remove a program from your favorites
    Toggle {
        /// Program ID
        program: String,
    },
}

// ── Admin ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create or update categories
    Categories {
        #[command(subcommand)]
        command: AdminCategoriesCommand,
    },

    /// Create or update programs
    Programs {
        #[command(subcommand)]
        command: AdminProgramsCommand,
    },

    /// Create or update shortcuts
    Shortcuts {
        #[command(subcommand)]
        command: AdminShortcutsCommand,
    },

    /// Delete an entry and everything that depends on it
    Delete {
        /// Kind of entry
        kind: EntityKindArg,

        /// Entry ID
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCategoriesCommand {
    /// Create a category, or update one when --id is given
    Save(CategorySaveArgs),
}

#[derive(Debug, Subcommand)]
pub enum AdminProgramsCommand {
    /// Create a program, or update one when --id is given
    Save(ProgramSaveArgs),
}

#[derive(Debug, Subcommand)]
pub enum AdminShortcutsCommand {
    /// Create a shortcut, or update one when --id is given
    Save(ShortcutSaveArgs),
}

#[derive(Debug, Args)]
pub struct CategorySaveArgs {
    /// Existing category ID (update)
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// URL-safe unique key
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    /// Display color (default #3b82f6)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProgramSaveArgs {
    /// Existing program ID (update)
    #[arg(long)]
    pub id: Option<String>,

    /// Owning category (slug or ID)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    /// Mark as popular (true/false)
    #[arg(long)]
    pub popular: Option<bool>,
}

#[derive(Debug, Args)]
pub struct ShortcutSaveArgs {
    /// Existing shortcut ID (update)
    #[arg(long)]
    pub id: Option<String>,

    /// Owning program ID
    #[arg(long, short = 'P')]
    pub program: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Key combination as displayed, e.g. "Ctrl+Shift+P"
    #[arg(long)]
    pub keys: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityKindArg {
    Category,
    Program,
    Shortcut,
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

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's API key in the system keyring
    SetKey {
        /// The API key (prompted when omitted)
        key: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
