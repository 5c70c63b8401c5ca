//! Identification service - orchestrates the fingerprint → lookup pipeline
//!
//! This is the high-level API used by the HTTP routes and the CLI:
//! 1. Submit the pipeline to the rate-limited queue
//! 2. Generate the audio fingerprint (via fpcalc)
//! 3. Look up the fingerprint on AcoustID
//! 4. Normalize the raw response (outside the queue, it has no side effects)

use std::path::PathBuf;
use std::sync::Arc;

use crate::identify::{
    acoustid::{self, AcoustIdClient, dto::LookupResponse},
    domain::{Health, IdentifyError, MatchList},
    fingerprint::FingerprintExtractor,
    queue::RateLimitedQueue,
    traits::{AcoustIdApi, FingerprintSource},
};

/// Configuration for the identification service
#[derive(Debug, Clone)]
pub struct IdentifyConfig {
    /// AcoustID API key (get one at https://acoustid.org/new-application)
    pub acoustid_api_key: String,
    /// AcoustID lookup endpoint
    pub acoustid_endpoint: String,
    /// Maximum lookups per second
    pub requests_per_second: f64,
    /// fpcalc binary; `fpcalc` on `PATH` when `None`
    pub fpcalc_path: Option<PathBuf>,
    /// Where uploads and downloads are staged
    pub temp_dir: PathBuf,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            acoustid_api_key: String::new(),
            acoustid_endpoint: acoustid::DEFAULT_ENDPOINT.to_string(),
            requests_per_second: 3.0,
            fpcalc_path: None,
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// Service for identifying clips
pub struct IdentificationService {
    queue: Arc<RateLimitedQueue>,
    fingerprinter: Arc<dyn FingerprintSource>,
    acoustid: Arc<dyn AcoustIdApi>,
}

impl IdentificationService {
    /// Build the production service: fpcalc + AcoustID behind a new queue.
    ///
    /// Must be called from within a tokio runtime (the queue spawns its worker).
    pub fn new(config: &IdentifyConfig) -> Result<Self, IdentifyError> {
        let fpcalc = config
            .fpcalc_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("fpcalc"));

        let queue = RateLimitedQueue::new(config.requests_per_second)?;
        let fingerprinter = FingerprintExtractor::new(fpcalc, &config.temp_dir)?;
        let acoustid = AcoustIdClient::new(&config.acoustid_api_key, &config.acoustid_endpoint)?;
        tracing::info!(
            fpcalc = %fingerprinter.fpcalc().display(),
            endpoint = acoustid.endpoint(),
            min_interval_ms = queue.min_interval().as_millis() as u64,
            "Identification pipeline configured"
        );

        Ok(Self::with_parts(
            Arc::new(queue),
            Arc::new(fingerprinter),
            Arc::new(acoustid),
        ))
    }

    /// Assemble a service from explicit collaborators
    pub fn with_parts(
        queue: Arc<RateLimitedQueue>,
        fingerprinter: Arc<dyn FingerprintSource>,
        acoustid: Arc<dyn AcoustIdApi>,
    ) -> Self {
        Self {
            queue,
            fingerprinter,
            acoustid,
        }
    }

    /// Identify uploaded audio bytes
    pub async fn identify_from_upload(
        &self,
        bytes: Vec<u8>,
        filename: String,
    ) -> Result<MatchList, IdentifyError> {
        if filename.trim().is_empty() {
            return Err(IdentifyError::validation("No file provided"));
        }
        tracing::info!(filename = %filename, size = bytes.len(), "Identifying upload");

        let fingerprinter = Arc::clone(&self.fingerprinter);
        let acoustid = Arc::clone(&self.acoustid);
        let response = self
            .queue
            .submit(move || async move {
                let fp = fingerprinter.from_upload(&bytes, &filename).await?;
                acoustid.lookup(&fp.fingerprint, fp.duration_secs).await
            })
            .await??;

        Ok(finish(response))
    }

    /// Identify a clip at a remote URL
    pub async fn identify_from_url(&self, url: String) -> Result<MatchList, IdentifyError> {
        if url.trim().is_empty() {
            return Err(IdentifyError::validation("No URL provided"));
        }
        tracing::info!(url = %url, "Identifying URL");

        let fingerprinter = Arc::clone(&self.fingerprinter);
        let acoustid = Arc::clone(&self.acoustid);
        let response = self
            .queue
            .submit(move || async move {
                let fp = fingerprinter.from_url(&url).await?;
                acoustid.lookup(&fp.fingerprint, fp.duration_secs).await
            })
            .await??;

        Ok(finish(response))
    }

    /// Report queue health
    pub fn health(&self) -> Health {
        Health {
            status: "ok".to_string(),
            queue_length: self.queue.len(),
        }
    }
}

fn finish(response: LookupResponse) -> MatchList {
    let list = acoustid::normalize(&response);
    tracing::info!(matches = list.matches.len(), "Identification complete");
    list
}
