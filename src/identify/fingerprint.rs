//! Audio fingerprint generation using Chromaprint/fpcalc
//!
//! This module shells out to the `fpcalc` command-line tool (part of Chromaprint)
//! to generate audio fingerprints. Uploaded bytes and downloaded clips are first
//! written to a uniquely named temporary file, which is removed again on every
//! exit path.
//!
//! Install fpcalc:
//! - Windows: `winget install AcoustID.Chromaprint` or download from https://acoustid.org/chromaprint
//! - macOS: `brew install chromaprint`
//! - Linux: `apt install libchromaprint-tools` or equivalent

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::identify::domain::{FingerprintResult, IdentifyError};

/// Common installation paths for fpcalc on Windows
#[cfg(windows)]
const FPCALC_PATHS: &[&str] = &[
    "fpcalc", // In PATH
    r"C:\Program Files\Chromaprint\fpcalc.exe",
    r"C:\Program Files\MusicBrainz Picard\fpcalc.exe",
    r"C:\Program Files (x86)\Chromaprint\fpcalc.exe",
];

#[cfg(not(windows))]
const FPCALC_PATHS: &[&str] = &[
    "fpcalc", // In PATH
    "/usr/bin/fpcalc",
    "/usr/local/bin/fpcalc",
    "/opt/homebrew/bin/fpcalc",
];

/// Name used for downloads whose URL has no usable last path segment
const FALLBACK_DOWNLOAD_NAME: &str = "audio";

/// Find the fpcalc executable, checking common installation paths
pub fn find_fpcalc() -> Option<PathBuf> {
    FPCALC_PATHS
        .iter()
        .find(|&path| {
            Command::new(path)
                .arg("-version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        })
        .map(PathBuf::from)
}

/// Get the version string of the given fpcalc binary (for diagnostics)
pub fn fpcalc_version(fpcalc: &Path) -> Option<String> {
    Command::new(fpcalc)
        .arg("-version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

/// Runs fpcalc over temporary copies of uploaded or downloaded audio
pub struct FingerprintExtractor {
    fpcalc: PathBuf,
    temp_dir: PathBuf,
    http_client: reqwest::Client,
}

impl FingerprintExtractor {
    /// Create an extractor using the given fpcalc binary and temp directory
    pub fn new(
        fpcalc: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> Result<Self, IdentifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            fpcalc: fpcalc.into(),
            temp_dir: temp_dir.into(),
            http_client,
        })
    }

    /// The fpcalc binary this extractor invokes
    pub fn fpcalc(&self) -> &Path {
        &self.fpcalc
    }

    /// Write uploaded bytes to a temp file and fingerprint it
    pub async fn from_upload(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<FingerprintResult, IdentifyError> {
        let temp = TempAudioFile::new(&self.temp_dir, filename);
        tokio::fs::write(temp.path(), bytes).await?;
        tracing::debug!(path = %temp.path().display(), size = bytes.len(), "Wrote upload to temp file");

        self.extract(temp.path()).await
    }

    /// Download a clip to a temp file and fingerprint it
    pub async fn from_url(&self, url: &str) -> Result<FingerprintResult, IdentifyError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| IdentifyError::validation(format!("Invalid URL {url}: {e}")))?;

        let name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .unwrap_or(FALLBACK_DOWNLOAD_NAME)
            .to_string();
        let temp = TempAudioFile::new(&self.temp_dir, &name);

        let response = self.http_client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentifyError::Download {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        tokio::fs::write(temp.path(), &body).await?;
        tracing::debug!(url, size = body.len(), "Downloaded clip to temp file");

        self.extract(temp.path()).await
    }

    /// Run fpcalc over a local audio file
    pub async fn extract(&self, path: &Path) -> Result<FingerprintResult, IdentifyError> {
        let output = tokio::process::Command::new(&self.fpcalc)
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| IdentifyError::extraction(format!("Failed to run fpcalc: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        check_fpcalc_output(output.status.success(), &stdout, &stderr)?;

        let result = parse_fpcalc_output(&stdout)?;
        tracing::debug!(
            duration_secs = result.duration_secs,
            fingerprint_len = result.fingerprint.len(),
            "Fingerprint generated"
        );
        Ok(result)
    }
}

/// Decide whether an fpcalc run failed.
///
/// fpcalc sometimes exits 0 while printing `ERROR: ...` to stdout, so both the
/// exit status and a case-insensitive `error:` in stdout count as failure.
pub fn check_fpcalc_output(success: bool, stdout: &str, stderr: &str) -> Result<(), IdentifyError> {
    if success && !stdout.to_lowercase().contains("error:") {
        return Ok(());
    }

    let message = [stdout.trim(), stderr.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("unknown error");
    Err(IdentifyError::extraction(message))
}

/// Parse fpcalc's `KEY=VALUE` output
pub fn parse_fpcalc_output(stdout: &str) -> Result<FingerprintResult, IdentifyError> {
    let mut result = FingerprintResult {
        duration_secs: 0,
        fingerprint: String::new(),
        source_label: String::new(),
    };

    for line in stdout.lines() {
        let Some((key, value)) = line.trim_end_matches('\r').split_once('=') else {
            continue;
        };
        match key {
            "DURATION" => {
                let secs: f64 = value.trim().parse().map_err(|_| {
                    IdentifyError::extraction(format!("Invalid DURATION value: {value}"))
                })?;
                result.duration_secs = secs.round().max(0.0) as u32;
            }
            "FINGERPRINT" => result.fingerprint = value.to_string(),
            "FILE" => result.source_label = value.to_string(),
            _ => {}
        }
    }

    if result.fingerprint.is_empty() {
        return Err(IdentifyError::NoFingerprint);
    }

    Ok(result)
}

/// A temp file path that is deleted when dropped.
///
/// The file itself may never get created (e.g. a failed download); removal
/// errors are ignored either way.
struct TempAudioFile {
    path: PathBuf,
}

impl TempAudioFile {
    fn new(dir: &Path, original_name: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let nonce: u32 = rand::random();
        let name = format!("{millis}-{nonce:08x}-{}", sanitize_file_name(original_name));

        Self {
            path: dir.join(name),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), "Temp file not removed: {}", e);
        }
    }
}

/// Keep only the final component of a client-supplied name
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "" | "." | ".." => FALLBACK_DOWNLOAD_NAME.to_string(),
        _ => base
            .chars()
            .map(|c| if c.is_control() { '_' } else { c })
            .collect(),
    }
}
