//! AcoustID API Data Transfer Objects
//!
//! These types match EXACTLY what the AcoustID lookup endpoint returns with
//! `meta=recordings releasegroups compress`. Every field the service may omit
//! is an `Option` and stays `None` here; defaults are applied by the
//! normalizer, not at parse time.
//!
//! API Reference: https://acoustid.org/webservice#lookup
//!
//! Example response:
//! ```json
//! {
//!   "status": "ok",
//!   "results": [{
//!     "id": "abcd1234",
//!     "score": 0.95,
//!     "recordings": [{
//!       "id": "recording-mbid",
//!       "title": "Song Title",
//!       "duration": 180,
//!       "artists": [{"id": "artist-mbid", "name": "Artist Name"}],
//!       "releasegroups": [{"id": "rg-mbid", "title": "Album", "type": "Album"}]
//!     }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level AcoustID lookup response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LookupResponse {
    pub status: String,
    pub results: Option<Vec<LookupResult>>,
    /// Error info if status != "ok"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// A single fingerprint match result
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LookupResult {
    /// AcoustID identifier
    pub id: String,
    /// Match confidence (0.0 to 1.0)
    pub score: f64,
    /// Associated MusicBrainz recordings (if meta=recordings requested)
    pub recordings: Option<Vec<Recording>>,
}

/// MusicBrainz recording info returned by AcoustID
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Recording {
    /// MusicBrainz recording ID
    pub id: String,
    pub title: Option<String>,
    /// Duration in seconds (API returns float, e.g. 353.0)
    pub duration: Option<f64>,
    pub artists: Option<Vec<Artist>>,
    /// Release groups (album groupings) this recording appears on
    pub releasegroups: Option<Vec<ReleaseGroup>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Artist {
    /// MusicBrainz artist ID
    pub id: String,
    pub name: String,
}

/// Release group info (when meta=releasegroups requested)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReleaseGroup {
    /// MusicBrainz release group ID
    pub id: String,
    pub title: Option<String>,
    /// Primary type (Album, Single, EP, etc.)
    #[serde(rename = "type")]
    pub release_type: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
