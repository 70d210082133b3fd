mod access;
mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extractor::{BraceSpanExtractor, FencedBlockExtractor, ReplyExtractor};
use crate::config::{Config, ExtractorKind};
use crate::llm_client::AnthropicClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting D.E.E.P. Assessment API v{}", env!("CARGO_PKG_VERSION"));

    if config.anthropic_api_key.is_empty() {
        warn!("ANTHROPIC_API_KEY not found; /api/analyze will fail until it is set");
    } else {
        info!("API key loaded (ends with ...{})", key_suffix(&config.anthropic_api_key));
    }
    if config.access_code.is_empty() {
        info!("ACCESS_CODE not set; access gate is open");
    }

    let llm = AnthropicClient::new(&config.anthropic_base_url)
        .context("failed to build the upstream HTTP client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.upstream_timeout.as_secs()
    );

    let extractor: Arc<dyn ReplyExtractor> = match config.extractor {
        ExtractorKind::Brace => Arc::new(BraceSpanExtractor),
        ExtractorKind::Fenced => Arc::new(FencedBlockExtractor),
    };
    info!("Reply extractor: {:?}", config.extractor);
    info!("Serving static files from {}", config.static_dir.display());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let state = AppState {
        config: Arc::new(config),
        llm: Arc::new(llm),
        extractor,
    };

    let app = build_router(state);

    info!("Listening on http://localhost:{}", addr.port());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Last four characters of the key, enough to tell keys apart in logs.
fn key_suffix(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    chars[chars.len().saturating_sub(4)..].iter().collect()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_suffix() {
        assert_eq!(key_suffix("sk-ant-api03-abcd1234"), "1234");
        assert_eq!(key_suffix("ab"), "ab");
    }
}
