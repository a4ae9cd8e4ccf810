//! # Rollbook - Student Records Server
//!
//! The main binary for the Rollbook record store.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - Admin CLI for direct database operations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/rollbook (THE BINARY)             │
//! │                                                      │
//! │   ┌─────────────┐        ┌─────────────┐            │
//! │   │  Admin CLI  │        │  HTTP API   │            │
//! │   │   (clap)    │        │   (axum)    │            │
//! │   └──────┬──────┘        └──────┬──────┘            │
//! │          └───────────┬──────────┘                    │
//! │                      ▼                               │
//! │              ┌───────────────┐                       │
//! │              │ rollbook-core │                       │
//! │              │ (THE RECORDS) │                       │
//! │              └───────────────┘                       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! rollbook server --host 0.0.0.0 --port 5000
//!
//! # CLI operations
//! rollbook seed
//! rollbook list --sorted
//! rollbook add --roll 111 --name "Asha Rao" --marks 88,91,79,85,90
//! ```

use clap::Parser;
use rollbook::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FORMAT_ENV: &str = "ROLLBOOK_LOG_FORMAT";

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the built-in filter; `ROLLBOOK_LOG_FORMAT=json`
/// switches to one JSON object per line.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "rollbook=debug,rollbook_core=debug,tower_http=debug"
    } else {
        "rollbook=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback.into());
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Print the Rollbook startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗  ██████╗ ██╗     ██╗     ██████╗  ██████╗  ██████╗ ██╗  ██╗
  ██╔══██╗██╔═══██╗██║     ██║     ██╔══██╗██╔═══██╗██╔═══██╗██║ ██╔╝
  ██████╔╝██║   ██║██║     ██║     ██████╔╝██║   ██║██║   ██║█████╔╝
  ██╔══██╗██║   ██║██║     ██║     ██╔══██╗██║   ██║██║   ██║██╔═██╗
  ██║  ██║╚██████╔╝███████╗███████╗██████╔╝╚██████╔╝╚██████╔╝██║  ██╗
  ╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚══════╝╚═════╝  ╚═════╝  ╚═════╝ ╚═╝  ╚═╝

  Student Records Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
