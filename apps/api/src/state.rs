use std::sync::Arc;

use crate::analysis::extractor::ReplyExtractor;
use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Upstream completion backend. Default: `AnthropicClient`.
    pub llm: Arc<dyn CompletionClient>,
    /// Reply extractor. Default: `BraceSpanExtractor`. Swap via REPLY_EXTRACTOR env.
    pub extractor: Arc<dyn ReplyExtractor>,
}
