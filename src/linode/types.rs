//! Request and response bodies for the Linode volume endpoints.

use serde::{Deserialize, Serialize};

/// Request body for `POST /volumes/{id}/clone`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct CloneVolumeRequest<'a> {
    pub label: &'a str,
}

/// Request body for `PUT /volumes/{id}`; only the tag set is updated.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct UpdateVolumeRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorReason>,
}

#[derive(Debug, Deserialize)]
struct ErrorReason {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    reason: String,
}

/// Renders a Linode error body as a single line.
pub(crate) fn error_message(body: &[u8]) -> String {
    let parsed = serde_json::from_slice::<ErrorResponse>(body).unwrap_or_default();
    let reasons: Vec<String> = parsed
        .errors
        .into_iter()
        .filter(|error| !error.reason.is_empty())
        .map(|error| match error.field {
            Some(field) => format!("{field}: {}", error.reason),
            None => error.reason,
        })
        .collect();
    if !reasons.is_empty() {
        return reasons.join("; ");
    }
    let raw = String::from_utf8_lossy(body).trim().to_owned();
    if raw.is_empty() {
        String::from("empty response body")
    } else {
        raw
    }
}
