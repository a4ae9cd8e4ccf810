//! # Rollbook CLI Module
//!
//! This module implements the admin CLI for Rollbook. Commands work on the
//! local database directly, without going through the HTTP server.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `init` - Initialize a new database
//! - `list` - List students (optionally ranked)
//! - `show` - Show one student
//! - `add` - Add a student
//! - `update` - Update fields of a student
//! - `delete` - Delete a student
//! - `count` - Count students
//! - `seed` - Load the sample batch

mod commands;

use crate::config::ConfigError;
use clap::{Parser, Subcommand};
use rollbook_core::RecordError;
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Rollbook - student records server
///
/// Stores student records with five marks each and derives the
/// percentage and letter grade on every write.
#[derive(Parser, Debug)]
#[command(name = "rollbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the records database (overrides config)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (ACID database) or "memory" (overrides config)
    #[arg(short = 'B', long, global = true)]
    pub backend: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// List students
    List {
        /// Rank by percentage (highest first)
        #[arg(short, long)]
        sorted: bool,
    },

    /// Show one student
    Show {
        /// Roll number
        roll: u64,
    },

    /// Add a student
    Add {
        /// Roll number
        #[arg(short, long)]
        roll: u64,

        /// Student name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Age
        #[arg(short, long, default_value_t = 0)]
        age: u32,

        /// Branch
        #[arg(short, long, default_value = "")]
        branch: String,

        /// Five comma-separated marks, e.g. 90,85,77,60,92
        #[arg(short, long)]
        marks: Option<String>,
    },

    /// Update fields of a student; omitted fields keep their values
    Update {
        /// Roll number
        roll: u64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New age
        #[arg(short, long)]
        age: Option<u32>,

        /// New branch
        #[arg(short, long)]
        branch: Option<String>,

        /// Five comma-separated marks; leave a slot empty to keep it (e.g. 90,,,,80)
        #[arg(short, long)]
        marks: Option<String>,
    },

    /// Delete a student
    Delete {
        /// Roll number
        roll: u64,
    },

    /// Count students
    Count,

    /// Load the built-in sample students
    Seed,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("{0}")]
    Usage(String),
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let ctx = CliContext::resolve(&cli)?;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(ctx, host, port).await,
        Some(Commands::Init { force }) => cmd_init(&ctx, force),
        Some(Commands::List { sorted }) => cmd_list(&ctx, sorted),
        Some(Commands::Show { roll }) => cmd_show(&ctx, roll),
        Some(Commands::Add {
            roll,
            name,
            age,
            branch,
            marks,
        }) => cmd_add(&ctx, roll, name, age, branch, marks.as_deref()),
        Some(Commands::Update {
            roll,
            name,
            age,
            branch,
            marks,
        }) => cmd_update(&ctx, roll, name, age, branch, marks.as_deref()),
        Some(Commands::Delete { roll }) => cmd_delete(&ctx, roll),
        Some(Commands::Count) => cmd_count(&ctx),
        Some(Commands::Seed) => cmd_seed(&ctx),
        None => {
            // No subcommand - show status by default
            cmd_status(&ctx)
        }
    }
}
