// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `mcdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mcdag",
    version,
    about = "Generate HTCondor DAGMan workflows for multi-stage MC production campaigns.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the catalog file (TOML).
    ///
    /// If omitted, the built-in catalog of standard LHE pools and physics
    /// campaigns is used.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<String>,

    /// Campaign to plan: an exact name, `ALL`, or `<CATEGORY>_ALL`
    /// (e.g. `JJP_ALL` for every campaign in the JJP category).
    #[arg(
        long,
        short = 'c',
        value_name = "NAME",
        required_unless_present_any = ["list_campaigns", "list_pools"]
    )]
    pub campaign: Option<String>,

    /// Number of processing jobs per campaign.
    #[arg(long, short = 'n', value_name = "N", default_value_t = 1000)]
    pub jobs: u64,

    /// Output DAG filename.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "mc_production.dag")]
    pub output: String,

    /// Directory the DAG file and `dagman.config` are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: String,

    /// List available campaigns and exit.
    #[arg(long)]
    pub list_campaigns: bool,

    /// List available LHE pools and exit.
    #[arg(long)]
    pub list_pools: bool,

    /// Print the generated DAG to stdout instead of writing files.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the remote storage scan; only catalog-declared pre-staged
    /// locations are honoured.
    #[arg(long)]
    pub skip_probe: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MCDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
