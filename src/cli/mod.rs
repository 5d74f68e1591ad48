//! Command-line interface for tvhub.

use clap::{Parser, Subcommand};

use crate::keys::KeyCategory;

/// tvhub - device and grant access-control service
#[derive(Parser)]
#[command(name = "tvhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create default config file
    Init,

    /// Print the cache key for a client, token or user id
    Key {
        #[arg(value_enum)]
        category: KeyCategory,
        id: String,
    },
}
