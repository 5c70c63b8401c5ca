//! Trait definitions for the external collaborators of the pipeline.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`FingerprintExtractor`] and [`AcoustIdClient`],
//! while tests substitute the mocks below.

use async_trait::async_trait;

use super::acoustid::{AcoustIdClient, dto::LookupResponse};
use super::domain::{FingerprintResult, IdentifyError};
use super::fingerprint::FingerprintExtractor;

/// Trait for turning an uploaded or remote clip into a fingerprint.
#[async_trait]
pub trait FingerprintSource: Send + Sync {
    async fn from_upload(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<FingerprintResult, IdentifyError>;

    async fn from_url(&self, url: &str) -> Result<FingerprintResult, IdentifyError>;
}

/// Trait for AcoustID fingerprint lookup.
#[async_trait]
pub trait AcoustIdApi: Send + Sync {
    /// Look up a fingerprint and return the raw response.
    async fn lookup(
        &self,
        fingerprint: &str,
        duration_secs: u32,
    ) -> Result<LookupResponse, IdentifyError>;
}

// Implement traits for real clients

#[async_trait]
impl FingerprintSource for FingerprintExtractor {
    async fn from_upload(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<FingerprintResult, IdentifyError> {
        FingerprintExtractor::from_upload(self, bytes, filename).await
    }

    async fn from_url(&self, url: &str) -> Result<FingerprintResult, IdentifyError> {
        FingerprintExtractor::from_url(self, url).await
    }
}

#[async_trait]
impl AcoustIdApi for AcoustIdClient {
    async fn lookup(
        &self,
        fingerprint: &str,
        duration_secs: u32,
    ) -> Result<LookupResponse, IdentifyError> {
        AcoustIdClient::lookup(self, fingerprint, duration_secs).await
    }
}
