//! Analysis pipeline: validate → build prompt → one upstream call → extract.

use std::time::Duration;

use tracing::{debug, info};

use crate::analysis::extractor::ReplyExtractor;
use crate::analysis::models::AnalysisResult;
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::{AppError, INVALID_PROFILE_MESSAGE};
use crate::llm_client::CompletionClient;

/// Minimum profile length, counted in characters after trimming whitespace.
pub const MIN_PROFILE_CHARS: usize = 100;

/// Rejects profile text too short to be a real extracted profile.
pub fn validate_profile_text(profile_text: &str) -> Result<(), AppError> {
    if profile_text.trim().chars().count() < MIN_PROFILE_CHARS {
        return Err(AppError::Validation(INVALID_PROFILE_MESSAGE.to_string()));
    }
    Ok(())
}

/// Runs the full analysis for one profile. Makes at most one upstream call and
/// none at all when validation fails.
pub async fn analyze_profile(
    profile_text: &str,
    api_key: &str,
    deadline: Duration,
    llm: &dyn CompletionClient,
    extractor: &dyn ReplyExtractor,
) -> Result<AnalysisResult, AppError> {
    validate_profile_text(profile_text)?;

    let prompt = build_analysis_prompt(profile_text);
    debug!("Prompt built ({} chars)", prompt.len());

    let reply = llm.complete(&prompt, api_key, deadline).await?;
    let analysis = extractor.extract(&reply)?;

    info!(
        "Analysis complete: {} recommendations across 4 pillars",
        analysis.recommendation_count()
    );
    Ok(analysis)
}
