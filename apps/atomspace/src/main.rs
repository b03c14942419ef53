//! # AtomSpace
//!
//! The command-line binary for the AtomSpace engine.
//!
//! ## Usage
//!
//! ```bash
//! # Built-in scenario
//! atomspace demo
//!
//! # Replay a script with a custom configuration
//! atomspace --config engine.toml run --script scenario.json
//!
//! # Machine-readable output
//! atomspace --json-mode config
//! ```

use atomspace::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // ATOMSPACE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ATOMSPACE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atomspace=info,atomspace_core=warn".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  AtomSpace v{}

  Atoms • Truth • Attention
"#,
        env!("CARGO_PKG_VERSION")
    );
}
