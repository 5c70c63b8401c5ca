//! Adapter layer: reduce AcoustID DTOs to the domain match list
//!
//! This is the ONLY place where DTO types are converted to domain types and
//! the only place defaults are applied. If AcoustID changes their response
//! format, only this file and dto.rs need to change.

use super::dto;
use crate::identify::domain::{Match, MatchList, MatchedRecording};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Convert a lookup response into a normalized match list.
///
/// Results without recordings are dropped; for the rest only the first
/// recording is used, in the order AcoustID returned them.
pub fn normalize(response: &dto::LookupResponse) -> MatchList {
    let matches = response
        .results
        .iter()
        .flatten()
        .filter_map(to_match)
        .collect();

    MatchList::ok(matches)
}

fn to_match(result: &dto::LookupResult) -> Option<Match> {
    let recording = result.recordings.as_ref()?.first()?;

    let artist = recording
        .artists
        .as_ref()
        .and_then(|artists| artists.first())
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_ARTIST);

    let album = recording
        .releasegroups
        .as_ref()
        .and_then(|groups| groups.first())
        .and_then(|g| g.title.clone());

    let title = recording
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TITLE);

    Some(Match {
        id: result.id.clone(),
        score: round_score(result.score),
        recording: MatchedRecording {
            title: title.to_string(),
            artist: artist.to_string(),
            album,
            duration: round_duration(recording.duration.unwrap_or(0.0)),
        },
    })
}

/// Round to 2 decimal places, halves away from zero
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Round to whole seconds, clamping negatives to 0
fn round_duration(secs: f64) -> u32 {
    secs.round().max(0.0) as u32
}
