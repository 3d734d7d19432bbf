//! CLI commands and argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Blockchain explorer over a cursor-paginated indexer API
#[derive(Parser, Debug)]
#[command(name = "chainscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Network to use instead of the configured default
    #[arg(short, long, global = true)]
    pub network: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the latest blocks and transactions
    Latest,

    /// Fetch one page of a paginated resource
    Page {
        /// Resource to page through
        resource: Resource,

        /// Cursor query, e.g. 'block_number=100&items_count=50'
        #[arg(short, long, default_value = "")]
        query: String,

        /// Block height, address or token the resource belongs to
        #[arg(long)]
        id: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

/// Paginated resources reachable from the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    /// All blocks
    Blocks,
    /// Transactions in a block (needs --id)
    BlockTransactions,
    /// Transactions of an address (needs --id)
    AddressTransactions,
    /// All tokens
    Tokens,
    /// Transfers of a token (needs --id)
    TokenTransfers,
}

impl Resource {
    /// Check if the resource is nested under a parent id
    pub fn needs_id(self) -> bool {
        matches!(
            self,
            Self::BlockTransactions | Self::AddressTransactions | Self::TokenTransfers
        )
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
