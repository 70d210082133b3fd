use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::access::verify;
use crate::errors::{parse_json_body, AppError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyRequest {
    /// `None` when the field is missing or not a JSON string.
    #[serde(deserialize_with = "string_or_none")]
    pub access_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) => Some(code),
        _ => None,
    })
}

/// POST /api/verify
///
/// Checks the submitted access code against `ACCESS_CODE`. A non-string
/// `accessCode` never matches a configured code.
pub async fn handle_verify(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let request: VerifyRequest = parse_json_body(body)?;

    let submitted = request.access_code.unwrap_or_default();
    let decision = verify(&submitted, &state.config.access_code);
    if !decision.allowed {
        return Err(AppError::Unauthorized);
    }

    info!("Access code accepted");
    Ok(Json(VerifyResponse { success: true }))
}
