//! Route handlers
//!
//! Every identify endpoint answers HTTP 200 with either a match list or
//! `{"status": "ERROR", "error": "..."}`.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::identify::{Health, IdentificationService, IdentifyError, MatchList};

/// Name of the multipart field carrying the audio
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: String,
}

/// POST /identify/file - multipart upload with a `file` field
pub async fn identify_file(
    State(service): State<Arc<IdentificationService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(e) => Err(IdentifyError::validation(format!("Invalid upload: {e}"))),
    };

    let result = match upload {
        Ok((bytes, filename)) => service.identify_from_upload(bytes, filename).await,
        Err(e) => Err(e),
    };
    reply(result)
}

/// POST /identify/url - JSON body `{"url": "..."}`
pub async fn identify_url(
    State(service): State<Arc<IdentificationService>>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(request)) => service.identify_from_url(request.url).await,
        Err(e) => Err(IdentifyError::validation(format!("Invalid request body: {e}"))),
    };
    reply(result)
}

/// GET /health - queue status
pub async fn health(State(service): State<Arc<IdentificationService>>) -> Json<Health> {
    Json(service.health())
}

/// Pull the first `file` field with a filename out of the form
async fn read_upload(mut multipart: Multipart) -> Result<(Vec<u8>, String), IdentifyError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IdentifyError::validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| IdentifyError::validation(format!("Invalid upload: {e}")))?;
        return Ok((bytes.to_vec(), filename));
    }

    Err(IdentifyError::validation("No file provided"))
}

fn reply(result: Result<MatchList, IdentifyError>) -> Response {
    match result {
        Ok(list) => Json(list).into_response(),
        Err(e) => {
            tracing::warn!("Identification failed: {}", e);
            Json(ErrorBody {
                status: "ERROR",
                error: e.to_string(),
            })
            .into_response()
        }
    }
}
