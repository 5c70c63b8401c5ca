//! Music ID - identifies audio clips via Chromaprint fingerprints and AcoustID.
//!
//! By default this starts an HTTP server that accepts uploads or URLs and
//! returns normalized AcoustID matches. The CLI can also identify a single
//! clip directly.

pub mod cli;
pub mod config;
pub mod error;
pub mod identify;
pub mod server;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "music_id=info,tower_http=info";

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    cli::run_command(&args)
}
