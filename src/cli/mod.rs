//! Command-line interface for music-id.
//!
//! With no subcommand the HTTP server starts. The other commands run a single
//! identification from the terminal or check the local toolchain.

mod commands;

pub use commands::{Cli, Commands, run_command};
