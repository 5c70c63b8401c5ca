//! One-off identification and tool check commands.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::identify::{IdentificationService, MatchList, fingerprint};

/// Identify a local audio file
pub fn cmd_identify(rt: &Runtime, config: &Config, path: &Path) -> anyhow::Result<()> {
    let identify_config = config.identify_config()?;

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("Not a file path: {}", path.display()))?
        .to_string();

    rt.block_on(async {
        let bytes = tokio::fs::read(path).await?;
        let service = IdentificationService::new(&identify_config)?;

        println!("Identifying: {:?}", path);
        println!();

        let list = service.identify_from_upload(bytes, filename).await?;
        print_matches(&list);
        Ok(())
    })
}

/// Identify a clip at a remote URL
pub fn cmd_identify_url(rt: &Runtime, config: &Config, url: &str) -> anyhow::Result<()> {
    let identify_config = config.identify_config()?;

    rt.block_on(async {
        let service = IdentificationService::new(&identify_config)?;

        println!("Identifying: {}", url);
        println!();

        let list = service.identify_from_url(url.to_string()).await?;
        print_matches(&list);
        Ok(())
    })
}

/// Check fpcalc and API key availability
pub fn cmd_check_tools(config: &Config) -> anyhow::Result<()> {
    println!("Checking identification tools...\n");

    let fpcalc = config
        .fingerprint
        .fpcalc_path
        .clone()
        .or_else(fingerprint::find_fpcalc);

    match fpcalc.as_deref().and_then(fpcalc_report) {
        Some(report) => println!("✓ fpcalc: {}", report),
        None => {
            println!("✗ fpcalc: NOT FOUND");
            print_fpcalc_install_instructions();
        }
    }

    println!();
    println!("API Keys:");
    if config.api_key().is_some() {
        println!("✓ AcoustID API key: set");
    } else {
        println!("✗ AcoustID API key: not set");
        println!("  Get one at: https://acoustid.org/new-application");
    }

    println!();
    println!(
        "Rate limit: {} requests/second",
        config.acoustid.requests_per_second
    );

    Ok(())
}

fn fpcalc_report(path: &Path) -> Option<String> {
    fingerprint::fpcalc_version(path).map(|v| format!("{} ({})", v, path.display()))
}

fn print_matches(list: &MatchList) {
    if list.matches.is_empty() {
        println!("✗ No match found");
        return;
    }

    for (i, m) in list.matches.iter().enumerate() {
        println!(
            "{}. {} - {} (score: {:.0}%)",
            i + 1,
            m.recording.artist,
            m.recording.title,
            m.score * 100.0
        );
        if let Some(album) = &m.recording.album {
            println!("   Album:    {}", album);
        }
        println!(
            "   Duration: {}:{:02}",
            m.recording.duration / 60,
            m.recording.duration % 60
        );
        println!("   AcoustID: {}", m.id);
    }
}

fn print_fpcalc_install_instructions() {
    eprintln!("Error: fpcalc (Chromaprint) not found.");
    eprintln!();
    eprintln!("Install it:");
    eprintln!("  Debian/Ubuntu: sudo apt install libchromaprint-tools");
    eprintln!("  macOS:         brew install chromaprint");
    eprintln!("  Windows:       download from https://acoustid.org/chromaprint");
    eprintln!();
    eprintln!("Or set fpcalc_path under [fingerprint] in the config file.");
}
