//! # cogweb - Atom Server
//!
//! The main binary for the cogweb atom store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/cogweb (THE BINARY)              │
//! │                                                      │
//! │      ┌─────────────┐          ┌─────────────┐        │
//! │      │    CLI      │          │  HTTP API   │        │
//! │      │   (clap)    │          │   (axum)    │        │
//! │      └──────┬──────┘          └──────┬──────┘        │
//! │             └───────────┬────────────┘               │
//! │                         ▼                            │
//! │                 ┌───────────────┐                    │
//! │                 │  cogweb-core  │                    │
//! │                 │ (THE PIPELINE)│                    │
//! │                 └───────────────┘                    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cogweb server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! cogweb create -f request.json
//! cogweb get --handle 1
//! cogweb --types extra.toml types
//! ```

use clap::Parser;
use cogweb::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // COGWEB_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("COGWEB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cogweb=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
   ___ ___   __ ___ __ _____| |__
  / __/ _ \ / _` \ \ /\ / / _ \ '_ \
 | (_| (_) | (_| |\ V  V /  __/ |_) |
  \___\___/ \__, | \_/\_/ \___|_.__/
            |___/

  Atom Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
