//! CLI command definitions and dispatch.
//!
//! Each subcommand lives in its own submodule:
//! - `serve`: HTTP server (the default)
//! - `identify`: one-off identification and tool checks

mod identify;
mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};

pub use identify::{cmd_check_tools, cmd_identify, cmd_identify_url};
pub use serve::cmd_serve;

/// Music ID CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to the OS config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// AcoustID API key (or set ACOUSTID_API_KEY env var)
    #[arg(short, long, global = true, env = "ACOUSTID_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP identification server
    Serve {
        /// Override the configured listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Identify a local audio file
    Identify {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Identify a clip at a remote URL
    IdentifyUrl {
        /// URL of the audio clip
        url: String,
    },
    /// Check if fingerprinting tools are installed
    CheckTools,
}

/// Run the parsed command
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli)?;

    match &cli.command {
        None => {
            let rt = Runtime::new()?;
            cmd_serve(&rt, config, None)
        }
        Some(Commands::Serve { port }) => {
            let rt = Runtime::new()?;
            cmd_serve(&rt, config, *port)
        }
        Some(Commands::Identify { path }) => {
            let rt = Runtime::new()?;
            cmd_identify(&rt, &config, path)
        }
        Some(Commands::IdentifyUrl { url }) => {
            let rt = Runtime::new()?;
            cmd_identify_url(&rt, &config, url)
        }
        Some(Commands::CheckTools) => cmd_check_tools(&config),
    }
}

/// Load the config file and apply command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };

    if let Some(key) = cli.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config.credentials.acoustid_api_key = Some(key.to_string());
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["music-id"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_identify_with_global_flags() {
        let cli = Cli::try_parse_from([
            "music-id",
            "identify",
            "clip.mp3",
            "--api-key",
            "abc",
            "--config",
            "/tmp/music-id.toml",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Identify { ref path }) if path == &PathBuf::from("clip.mp3")));
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/music-id.toml")));
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::try_parse_from(["music-id", "serve", "--port", "8081"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(8081) })));
    }

    #[test]
    fn test_resolve_config_applies_api_key_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[credentials]\nacoustid_api_key = \"from-file\"\n\n[server]\nport = 9000\n",
        )
        .unwrap();

        let cli = Cli {
            command: None,
            config: Some(path.clone()),
            api_key: Some("from-flag".to_string()),
        };
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.api_key(), Some("from-flag"));
        assert_eq!(config.server.port, 9000);

        let cli = Cli {
            command: None,
            config: Some(path),
            api_key: None,
        };
        assert_eq!(resolve_config(&cli).unwrap().api_key(), Some("from-file"));
    }

    #[test]
    fn test_resolve_config_rejects_invalid_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[acoustid]\nrequests_per_second = -1.0\n").unwrap();

        let cli = Cli {
            command: None,
            config: Some(path),
            api_key: None,
        };
        assert!(resolve_config(&cli).is_err());
    }
}
