use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "maxctl", version, about = "Command line client for maxio clusters")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable JSON formatted output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable confirmation messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable color theme
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to configuration folder
    #[arg(long, short = 'C', global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage cluster administration
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Manage pool decommissioning
    #[command(subcommand, visible_alias = "decom")]
    Decommission(DecommissionCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DecommissionCommand {
    /// Start decommissioning a pool
    #[command(arg_required_else_help = true, after_help = "EXAMPLES:\n  1. Start decommissioning a pool.\n     $ maxctl admin decommission start myminio/ http://server{5...8}/disk{1...4}")]
    Start {
        /// Cluster alias
        target: String,
        /// Pool as given on the server command line
        pool: String,
    },

    /// Show current decommissioning status
    #[command(arg_required_else_help = true, after_help = "EXAMPLES:\n  1. Show current decommissioning status.\n     $ maxctl admin decommission status myminio/ http://server{5...8}/disk{1...4}\n\n  2. List all current decommissioning status of all pools.\n     $ maxctl admin decommission status myminio/")]
    Status {
        /// Cluster alias
        target: String,
        /// Pool as given on the server command line
        pool: Option<String>,
    },

    /// Cancel an ongoing decommissioning of a pool
    #[command(arg_required_else_help = true, after_help = "EXAMPLES:\n  1. Cancel an ongoing decommissioning of a pool.\n     $ maxctl admin decommission cancel myminio/ http://server{5...8}/disk{1...4}\n\n  2. List all ongoing decommissioning of pools.\n     $ maxctl admin decommission cancel myminio/")]
    Cancel {
        /// Cluster alias
        target: String,
        /// Pool as given on the server command line
        pool: Option<String>,
    },
}

impl DecommissionCommand {
    pub fn target(&self) -> &str {
        match self {
            Self::Start { target, .. } | Self::Status { target, .. } | Self::Cancel { target, .. } => {
                target
            }
        }
    }

    /// Positional arguments as typed, for error traces.
    pub fn args(&self) -> Vec<String> {
        let pool = match self {
            Self::Start { pool, .. } => Some(pool.clone()),
            Self::Status { pool, .. } | Self::Cancel { pool, .. } => pool.clone(),
        };
        std::iter::once(self.target().to_string()).chain(pool).collect()
    }
}
