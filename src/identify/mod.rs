//! Clip identification - fingerprints audio and matches it on AcoustID.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types returned to callers
//! - **API DTOs** (`acoustid/dto.rs`) - Exact AcoustID response shapes
//! - **Adapter** (`acoustid::normalize`) - Reduces DTOs to the domain match list
//! - **Client** (`acoustid::AcoustIdClient`) - HTTP client for the lookup API
//! - **Fingerprint** - Audio fingerprint generation via fpcalc
//! - **Queue** - Serializes pipelines under the AcoustID rate limit
//! - **Service** - High-level orchestration of the identification flow
//!
//! # Usage
//!
//! ```ignore
//! use music_id::identify::{IdentificationService, IdentifyConfig};
//!
//! let config = IdentifyConfig {
//!     acoustid_api_key: "your-api-key".to_string(),
//!     ..Default::default()
//! };
//! let service = IdentificationService::new(&config)?;
//!
//! let list = service.identify_from_url("https://example.com/clip.mp3".into()).await?;
//! for m in list.matches {
//!     println!("{} - {} ({:.2})", m.recording.artist, m.recording.title, m.score);
//! }
//! ```

pub mod acoustid;
pub mod domain;
pub mod fingerprint;
pub mod queue;
pub mod service;
pub mod traits;

pub use domain::{FingerprintResult, Health, IdentifyError, Match, MatchList, MatchedRecording};
pub use queue::{QueueError, RateLimitedQueue};
pub use service::{IdentificationService, IdentifyConfig};
