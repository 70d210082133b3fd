//! Axum route handler for the analysis API.

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::analysis::analyzer::analyze_profile;
use crate::analysis::models::{AnalysisResult, AnalyzeRequest};
use crate::errors::{parse_json_body, AppError, MISSING_API_KEY_MESSAGE};
use crate::state::AppState;

/// POST /api/analyze
///
/// Turns extracted profile text into a D.E.E.P. coaching report.
/// Nothing about the request or the report is kept after the response.
pub async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    if state.config.anthropic_api_key.is_empty() {
        return Err(AppError::Config(MISSING_API_KEY_MESSAGE.to_string()));
    }

    let request: AnalyzeRequest = parse_json_body(body)?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);

    async {
        info!(
            "Analyzing profile ({} chars)",
            request.profile_text.chars().count()
        );
        let analysis = analyze_profile(
            &request.profile_text,
            &state.config.anthropic_api_key,
            state.config.upstream_timeout,
            state.llm.as_ref(),
            state.extractor.as_ref(),
        )
        .await?;
        Ok::<_, AppError>(Json(analysis))
    }
    .instrument(span)
    .await
}
