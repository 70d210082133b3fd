//! Response Extractor — pulls the single JSON report out of the model's free-text reply.
//!
//! `AppState` holds an `Arc<dyn ReplyExtractor>`, chosen at startup via `REPLY_EXTRACTOR`.

use serde_json::Value;
use thiserror::Error;

use crate::analysis::models::{AnalysisResult, Pillar};

const PROFILE_SUMMARY_KEY: &str = "profileSummary";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("reply contains no JSON object")]
    NoJsonObject,

    #[error("embedded JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("analysis is missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("analysis has the wrong shape: {0}")]
    Shape(String),
}

/// Turns an upstream reply into an `AnalysisResult`, or fails without a partial result.
pub trait ReplyExtractor: Send + Sync {
    fn extract(&self, reply: &str) -> Result<AnalysisResult, ExtractError>;
}

/// Takes everything from the leftmost `{` to the rightmost `}`.
///
/// Stray braces in commentary after the object widen the span and make it
/// invalid JSON; that reply is rejected rather than repaired.
pub struct BraceSpanExtractor;

impl ReplyExtractor for BraceSpanExtractor {
    fn extract(&self, reply: &str) -> Result<AnalysisResult, ExtractError> {
        let span = brace_span(reply).ok_or(ExtractError::NoJsonObject)?;
        parse_analysis(span)
    }
}

/// Only accepts JSON inside a fenced code block (```json ... ``` or ``` ... ```).
pub struct FencedBlockExtractor;

impl ReplyExtractor for FencedBlockExtractor {
    fn extract(&self, reply: &str) -> Result<AnalysisResult, ExtractError> {
        let block = fenced_block(reply).ok_or(ExtractError::NoJsonObject)?;
        parse_analysis(block)
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip the optional language tag on the opening line.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    let block = body[..close].trim();
    (!block.is_empty()).then_some(block)
}

/// Parses `json` and checks the top-level shape before building the typed result.
fn parse_analysis(json: &str) -> Result<AnalysisResult, ExtractError> {
    let value: Value = serde_json::from_str(json)?;
    check_shape(&value)?;
    serde_json::from_value(value).map_err(|e| ExtractError::Shape(e.to_string()))
}

fn check_shape(value: &Value) -> Result<(), ExtractError> {
    let object = value
        .as_object()
        .ok_or_else(|| ExtractError::Shape("top level is not an object".to_string()))?;

    let required =
        std::iter::once(PROFILE_SUMMARY_KEY).chain(Pillar::ALL.into_iter().map(Pillar::key));
    for key in required {
        match object.get(key) {
            None => return Err(ExtractError::MissingKey(key)),
            Some(Value::Object(_)) => {}
            Some(_) => return Err(ExtractError::Shape(format!("'{key}' is not an object"))),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn known_result() -> AnalysisResult {
        serde_json::from_value(json!({
            "profileSummary": {
                "name": "Sam Rivera",
                "currentRole": "L&D Manager",
                "industry": "Financial Services",
                "experience": "10+ years in corporate training"
            },
            "diagnose": {"summary": "Audit tasks for AI.", "recommendations": ["Run a task audit", "Find enthusiasts"]},
            "embed": {"summary": "Learn in the flow.", "recommendations": ["Microlearning", "Peer circles", "Durable skills"]},
            "evaluate": {"summary": "Measure skills.", "recommendations": ["Skills data", "Ambient assessment"]},
            "prioritize": {"summary": "Invest in skills.", "recommendations": ["Skills budget", "Incentives"]}
        }))
        .unwrap()
    }

    #[test]
    fn test_prose_wrapped_object_is_recovered_exactly() {
        let expected = known_result();
        let reply = format!(
            "Here you go:\n{}\nHope this helps!",
            serde_json::to_string(&expected).unwrap()
        );
        assert_eq!(BraceSpanExtractor.extract(&reply).unwrap(), expected);
    }

    #[test]
    fn test_pretty_printed_object_in_code_fence() {
        let expected = known_result();
        let reply = format!(
            "```json\n{}\n```",
            serde_json::to_string_pretty(&expected).unwrap()
        );
        assert_eq!(BraceSpanExtractor.extract(&reply).unwrap(), expected);
    }

    #[test]
    fn test_reply_without_braces_fails() {
        let err = BraceSpanExtractor
            .extract("I'm sorry, I can't analyze this profile.")
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonObject));
    }

    #[test]
    fn test_closing_brace_before_opening_fails() {
        let err = BraceSpanExtractor.extract("} nothing here {").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonObject));
    }

    #[test]
    fn test_truncated_json_fails() {
        let err = BraceSpanExtractor
            .extract(r#"{"profileSummary": {"name": "x"}, "diagnose": {"#)
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[test]
    fn test_stray_brace_after_object_is_rejected() {
        let reply = format!(
            "{} Let me know if you want more {{details}}.",
            serde_json::to_string(&known_result()).unwrap()
        );
        assert!(matches!(
            BraceSpanExtractor.extract(&reply).unwrap_err(),
            ExtractError::InvalidJson(_)
        ));
    }

    #[test]
    fn test_missing_pillar_key_fails() {
        let mut value = serde_json::to_value(known_result()).unwrap();
        value.as_object_mut().unwrap().remove("evaluate");
        let err = BraceSpanExtractor.extract(&value.to_string()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingKey("evaluate")));
    }

    #[test]
    fn test_missing_profile_summary_fails() {
        let mut value = serde_json::to_value(known_result()).unwrap();
        value.as_object_mut().unwrap().remove("profileSummary");
        let err = BraceSpanExtractor.extract(&value.to_string()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingKey("profileSummary")));
    }

    #[test]
    fn test_pillar_that_is_not_an_object_fails() {
        let mut value = serde_json::to_value(known_result()).unwrap();
        value["embed"] = json!(["just", "a", "list"]);
        let err = BraceSpanExtractor.extract(&value.to_string()).unwrap_err();
        assert!(matches!(err, ExtractError::Shape(_)));
    }

    #[test]
    fn test_recommendations_with_wrong_type_fail() {
        let mut value = serde_json::to_value(known_result()).unwrap();
        value["diagnose"]["recommendations"] = json!("one long string");
        let err = BraceSpanExtractor.extract(&value.to_string()).unwrap_err();
        assert!(matches!(err, ExtractError::Shape(_)));
    }

    #[test]
    fn test_fenced_extractor_reads_tagged_block() {
        let expected = known_result();
        let reply = format!(
            "Sure! {{see below}}\n```json\n{}\n```\nThanks {{:}}",
            serde_json::to_string_pretty(&expected).unwrap()
        );
        assert_eq!(FencedBlockExtractor.extract(&reply).unwrap(), expected);
    }

    #[test]
    fn test_fenced_extractor_reads_untagged_block() {
        let expected = known_result();
        let reply = format!("```\n{}\n```", serde_json::to_string(&expected).unwrap());
        assert_eq!(FencedBlockExtractor.extract(&reply).unwrap(), expected);
    }

    #[test]
    fn test_fenced_extractor_requires_a_fence() {
        let reply = serde_json::to_string(&known_result()).unwrap();
        assert!(matches!(
            FencedBlockExtractor.extract(&reply).unwrap_err(),
            ExtractError::NoJsonObject
        ));
    }
}
