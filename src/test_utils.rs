//! Test utilities and fixtures for music-id tests.
//!
//! Provides fake `fpcalc` scripts and canned AcoustID responses so the
//! fingerprint, lookup, and service tests don't need Chromaprint installed or
//! network access.
//!
//! # Example
//!
//! ```ignore
//! let tools = tempfile::tempdir()?;
//! let fpcalc = fake_fpcalc(tools.path(), "echo 'FINGERPRINT=AQAB'");
//! let extractor = FingerprintExtractor::new(fpcalc, std::env::temp_dir())?;
//! ```

use std::path::{Path, PathBuf};

use crate::identify::acoustid::dto::LookupResponse;
use crate::identify::domain::FingerprintResult;

/// What a successful fpcalc run prints for `foo.mp3`
pub const FPCALC_SAMPLE_OUTPUT: &str = "DURATION=245.6\nFINGERPRINT=AQADtEl...\nFILE=foo.mp3";

/// A single fully-populated AcoustID lookup result
pub const SAMPLE_LOOKUP_JSON: &str = r#"{
    "status": "ok",
    "results": [{
        "id": "r1",
        "score": 0.95,
        "recordings": [{
            "id": "rec1",
            "title": "Song A",
            "duration": 200.4,
            "artists": [{"id": "a1", "name": "Artist X"}],
            "releasegroups": [{"id": "rg1", "title": "Album Y"}]
        }]
    }]
}"#;

/// Version line the fake fpcalc prints for `-version`
#[cfg(unix)]
pub const FAKE_FPCALC_VERSION: &str = "fpcalc version 1.5.1";

/// Writes an executable shell script standing in for fpcalc.
///
/// `body` runs under `/bin/sh` with the audio path as `$1`; `-version` is
/// answered before `body` runs. The script is executed once before returning:
/// a process forked elsewhere while the file was open for writing makes
/// `exec` fail with "Text file busy" until that child execs, so this retries
/// until the script runs.
#[cfg(unix)]
pub fn fake_fpcalc(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fpcalc");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"-version\" ]; then echo '{FAKE_FPCALC_VERSION}'; exit 0; fi\n{body}\n"
    );
    std::fs::write(&path, script).expect("Failed to write fake fpcalc");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark fake fpcalc executable");

    for _ in 0..100 {
        match std::process::Command::new(&path).arg("-version").output() {
            Ok(_) => return path,
            Err(e) if e.kind() == std::io::ErrorKind::ExecutableFileBusy => {
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
            Err(e) => panic!("Fake fpcalc is not runnable: {e}"),
        }
    }
    panic!("Fake fpcalc stayed busy: {}", path.display());
}

/// Parses [`SAMPLE_LOOKUP_JSON`]
pub fn sample_lookup_response() -> LookupResponse {
    serde_json::from_str(SAMPLE_LOOKUP_JSON).expect("Sample lookup JSON should parse")
}

/// A fingerprint as fpcalc would report it for `foo.mp3`
pub fn mock_fingerprint() -> FingerprintResult {
    FingerprintResult {
        duration_secs: 246,
        fingerprint: "AQADtEl...".to_string(),
        source_label: "foo.mp3".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lookup_response_parses() {
        let response = sample_lookup_response();
        assert_eq!(response.status, "ok");
        assert_eq!(response.results.as_ref().map(Vec::len), Some(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_fpcalc_is_executable() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_fpcalc(dir.path(), "echo hi");

        let output = std::process::Command::new(&path).arg("x").output().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hi");
    }
}
