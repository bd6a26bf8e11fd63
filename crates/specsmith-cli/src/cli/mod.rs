//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "specsmith",
    bin_name = "specsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Aggregate, patch and diff API descriptions for client libraries",
    long_about = "Specsmith fetches API descriptions from their sources, normalizes \
                  and merges them into one document, applies customizations, and \
                  classifies changes to propose the next semantic version.",
    after_help = "EXAMPLES:\n\
        \x20 specsmith update --dir ./petstore-java\n\
        \x20 specsmith diff old/openapi.yaml openapi.yaml --limit 20\n\
        \x20 specsmith bump --previous 1.4.2 old/openapi.yaml openapi.yaml\n\
        \x20 specsmith generate --dir ./petstore-java",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch, merge and customize the project's sources into one document.
    #[command(
        visible_alias = "u",
        about = "Rebuild the aggregated document",
        after_help = "EXAMPLES:\n\
            \x20 specsmith update\n\
            \x20 specsmith update --dir ./clients/petstore --workers 1"
    )]
    Update(UpdateArgs),

    /// Classify the changes between two documents.
    #[command(
        about = "Report changes between two documents",
        after_help = "EXAMPLES:\n\
            \x20 specsmith diff old.yaml new.yaml\n\
            \x20 specsmith diff old.yaml new.yaml --format json"
    )]
    Diff(DiffArgs),

    /// Propose the next version from document changes.
    #[command(
        about = "Propose the next release version",
        after_help = "EXAMPLES:\n\
            \x20 specsmith bump --previous v1.4.2 old.yaml new.yaml\n\
            \x20 specsmith bump --module users@1.2.0=users-old.yaml,users.yaml \\\n\
            \x20                --module orders=orders-old.yaml,orders.yaml"
    )]
    Bump(BumpArgs),

    /// Run the external code generator for the project.
    #[command(
        visible_alias = "gen",
        about = "Generate the client library",
        after_help = "EXAMPLES:\n\
            \x20 specsmith generate\n\
            \x20 specsmith generate --dir ./clients/petstore --output build/generated"
    )]
    Generate(GenerateArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 specsmith completions bash > ~/.local/share/bash-completion/completions/specsmith\n\
            \x20 specsmith completions zsh  > ~/.zfunc/_specsmith\n\
            \x20 specsmith completions fish > ~/.config/fish/completions/specsmith.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Specsmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 specsmith config get fetch.workers\n\
            \x20 specsmith config list\n\
            \x20 specsmith config path"
    )]
    Config(ConfigCommands),
}

/// Where a project lives.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Project directory.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Project directory"
    )]
    pub dir: PathBuf,

    /// Project file name inside the directory.
    #[arg(
        short = 'p',
        long = "project",
        value_name = "FILE",
        help = "Project file (default: specsmith.yaml)"
    )]
    pub project: Option<PathBuf>,
}

// ── update ────────────────────────────────────────────────────────────────────

/// Arguments for `specsmith update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Override the configured fetch pool size.
    #[arg(long = "workers", value_name = "N", help = "Concurrent fetches (1 = sequential)")]
    pub workers: Option<usize>,
}

// ── diff ──────────────────────────────────────────────────────────────────────

/// Arguments for `specsmith diff`.
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous document.
    #[arg(value_name = "OLD")]
    pub old: PathBuf,

    /// Current document.
    #[arg(value_name = "NEW")]
    pub new: PathBuf,

    /// Maximum number of entries to print.
    #[arg(long = "limit", value_name = "N", help = "Entries to show (default from config)")]
    pub limit: Option<usize>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table", help = "Report format")]
    pub format: ReportFormat,
}

/// Output format for change reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable table.
    Table,
    /// JSON array of entries.
    Json,
}

// ── bump ──────────────────────────────────────────────────────────────────────

/// Arguments for `specsmith bump`.
#[derive(Debug, Args)]
pub struct BumpArgs {
    /// Last released version (an optional leading `v` is accepted).
    #[arg(long = "previous", value_name = "VERSION", help = "Previous release version")]
    pub previous: Option<String>,

    /// Previous document (single-module form).
    #[arg(value_name = "OLD", requires = "new", conflicts_with = "modules")]
    pub old: Option<PathBuf>,

    /// Current document (single-module form).
    #[arg(value_name = "NEW")]
    pub new: Option<PathBuf>,

    /// A module as `name[@version]=old,new`; repeatable.
    #[arg(
        short = 'm',
        long = "module",
        value_name = "SPEC",
        help = "Module as name[@version]=old,new (repeatable)"
    )]
    pub modules: Vec<String>,

    /// Apply full semantic versioning below 1.0.0 as well.
    #[arg(long = "strict", help = "Breaking changes bump major even before 1.0.0")]
    pub strict: bool,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `specsmith generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output directory, overriding the project's `output`.
    #[arg(short = 'o', long = "output", value_name = "DIR", help = "Output directory")]
    pub output: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `specsmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `specsmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `fetch.workers`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
