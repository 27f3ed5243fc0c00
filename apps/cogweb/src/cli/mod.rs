//! # cogweb CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `create` - Create or merge an atom from a request file
//! - `get` - Show a stored atom
//! - `types` - List registered atom types
//! - `status` - Show atom counts
//! - `init` - Initialize a new database

mod commands;

use crate::config::{CogwebError, load_registry};
use crate::store::BackendKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// cogweb - knowledge-graph atom server
///
/// Creates and merges typed atoms with probabilistic truth values.
#[derive(Parser, Debug)]
#[command(name = "cogweb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the atom database
    #[arg(short = 'D', long, global = true, default_value = "cogweb.redb")]
    pub database: PathBuf,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum, default_value_t = BackendKind::Redb)]
    pub backend: BackendKind,

    /// TOML file with extra atom types
    #[arg(short = 'T', long, global = true)]
    pub types: Option<PathBuf>,

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
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Create or merge an atom from a JSON request file
    Create {
        /// Path to the request file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show a stored atom
    Get {
        /// Atom handle
        #[arg(long)]
        handle: u64,
    },

    /// List registered atom types
    Types,

    /// Show atom counts
    Status,

    /// Initialize a new empty database
    Init {
        /// Overwrite an existing database
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CogwebError> {
    let ctx = CommandContext {
        database: cli.database,
        backend: cli.backend,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&ctx, force),
        Some(Commands::Server { host, port }) => {
            let registry = load_registry(cli.types.as_deref())?;
            cmd_server(&ctx, registry, &host, port).await
        }
        Some(Commands::Create { file }) => {
            let registry = load_registry(cli.types.as_deref())?;
            cmd_create(&ctx, &registry, &file)
        }
        Some(Commands::Get { handle }) => {
            let registry = load_registry(cli.types.as_deref())?;
            cmd_get(&ctx, &registry, handle)
        }
        Some(Commands::Types) => {
            let registry = load_registry(cli.types.as_deref())?;
            cmd_types(&ctx, &registry)
        }
        Some(Commands::Status) | None => cmd_status(&ctx),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cogweb", "create", "-f", "req.json", "--backend", "memory", "--json-mode",
        ])
        .expect("parse");

        assert_eq!(cli.backend, BackendKind::Memory);
        assert!(cli.json_mode);
        assert!(matches!(cli.command, Some(Commands::Create { .. })));
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["cogweb"]).expect("parse");
        assert_eq!(cli.backend, BackendKind::Redb);
        assert_eq!(cli.database, PathBuf::from("cogweb.redb"));
        assert!(cli.types.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["cogweb", "--backend", "file", "status"]).is_err());
    }
}
