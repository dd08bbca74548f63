//! Handlers for the `/validation` resource.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use reborn_core::validation::{FormErrors, FormSchema};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the validate endpoint.
///
/// `rules` maps field name → rule spec strings; `messages` optionally maps
/// field name → rule name → custom failure message; `data` is the submitted
/// form.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub rules: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub messages: BTreeMap<String, BTreeMap<String, String>>,
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// Response payload: overall verdict plus per-field failure messages.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: FormErrors,
}

/// POST /api/v1/validation/validate
///
/// Evaluate the supplied rule set against the submitted form data (dry-run
/// semantics: nothing is persisted). Rule failures are reported in the body
/// with HTTP 200; a mis-authored rule set is a 400 and a store outage a 503.
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequest>,
) -> AppResult<Json<DataResponse<ValidateResponse>>> {
    if body.rules.is_empty() {
        return Err(AppError::BadRequest("rules map must not be empty".to_string()));
    }

    let schema = FormSchema::from_parts(body.rules, body.messages);

    // Reject unknown rules and malformed specs up front, before any field
    // is evaluated (and before any lookup query runs).
    state.registry.check_schema(&schema)?;

    let errors = state.registry.validate_form(&schema, &body.data).await?;
    Ok(Json(DataResponse {
        data: ValidateResponse {
            valid: errors.is_empty(),
            errors,
        },
    }))
}
