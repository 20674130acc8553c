//! Two-phase submission payload rules.
//!
//! A chat participant first sends a JSON description, which is validated and
//! held as a [`PendingSubmission`] until a photo arrives for the same
//! conversation. Only the payload rules live here; the per-conversation
//! state machine is in `vitrina-bot`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{COMMON_REQUIRED_FIELDS, IMAGE_URL_FIELD, LOCATION_FIELDS};
use crate::error::CoreError;

/// What kind of record a submission produces.
///
/// Located products go through the duplicate-detection gate of the catalog
/// endpoint; promotions and new items are appended to their collections
/// without any duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Located,
    Promotion,
    New,
}

impl SubmissionKind {
    /// Required payload fields for this kind, in validation order.
    pub fn required_fields(self) -> Vec<&'static str> {
        let mut fields = COMMON_REQUIRED_FIELDS.to_vec();
        if self == SubmissionKind::Located {
            fields.extend_from_slice(LOCATION_FIELDS);
        }
        fields
    }
}

/// A validated payload waiting for its photo.
///
/// `payload` is the submitted JSON object minus `image_url`; the photo phase
/// merges the stored image's URL in before the record is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub kind: SubmissionKind,
    pub payload: Value,
}

/// Parse and validate the JSON phase of a submission.
///
/// Check order: JSON well-formedness, then object shape, then required-field
/// completeness (first gap is named), then rejection of a pre-supplied
/// `image_url`. For located submissions the street is trimmed in place.
pub fn parse_submission(kind: SubmissionKind, text: &str) -> Result<PendingSubmission, CoreError> {
    let mut payload: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::Parse(format!("invalid JSON: {e}")))?;

    let object = payload
        .as_object()
        .ok_or_else(|| CoreError::Parse("expected a JSON object".into()))?;

    for field in kind.required_fields() {
        if !object.contains_key(field) {
            return Err(CoreError::Validation(format!(
                "Missing required field: {field}"
            )));
        }
    }

    if object.contains_key(IMAGE_URL_FIELD) {
        return Err(CoreError::Validation(
            "Remove image_url from the JSON; the photo supplies it".into(),
        ));
    }

    if kind == SubmissionKind::Located {
        let street = payload["street"]
            .as_str()
            .ok_or_else(|| CoreError::Validation("Field 'street' must be a string".into()))?
            .trim()
            .to_string();
        payload["street"] = Value::String(street);
    }

    Ok(PendingSubmission { kind, payload })
}

/// Merge the stored image's URL into a pending payload (photo phase).
pub fn merge_image_url(payload: &mut Value, image_url: &str) {
    if let Some(object) = payload.as_object_mut() {
        object.insert(IMAGE_URL_FIELD.into(), Value::String(image_url.into()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
