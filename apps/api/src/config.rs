use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Which `ReplyExtractor` backend the analysis pipeline uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Leftmost `{` to rightmost `}`.
    #[default]
    Brace,
    /// Contents of a fenced code block only.
    Fenced,
}

impl std::str::FromStr for ExtractorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brace" => Ok(ExtractorKind::Brace),
            "fenced" => Ok(ExtractorKind::Fenced),
            other => bail!("REPLY_EXTRACTOR must be 'brace' or 'fenced', got '{other}'"),
        }
    }
}

/// Application configuration, built once at startup and shared read-only
/// through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Empty when unset; the analyze endpoint refuses to call upstream then.
    pub anthropic_api_key: String,
    /// Empty disables the access gate.
    pub access_code: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub anthropic_base_url: String,
    pub upstream_timeout: Duration,
    pub extractor: ExtractorKind,
    pub rust_log: String,
}

impl Config {
    /// Loads configuration from the process environment and a `.env` file.
    ///
    /// The two secrets use "environment if non-empty, else `.env`". Every
    /// other key is read from the environment after `.env` has been merged in.
    pub fn from_env() -> Result<Self> {
        let file_values = read_dotenv_file();
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_sources(|key| std::env::var(key).ok(), &file_values)
    }

    fn from_sources<F>(env: F, file_values: &HashMap<String, String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match env("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let upstream_timeout = match env("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let extractor = match env("REPLY_EXTRACTOR") {
            Some(raw) => raw.parse()?,
            None => ExtractorKind::default(),
        };

        Ok(Config {
            anthropic_api_key: secret(
                env("ANTHROPIC_API_KEY"),
                file_values.get("ANTHROPIC_API_KEY"),
            ),
            access_code: secret(env("ACCESS_CODE"), file_values.get("ACCESS_CODE")),
            port,
            static_dir: env("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            anthropic_base_url: env("ANTHROPIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            upstream_timeout,
            extractor,
            rust_log: env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Environment value wins when non-empty, otherwise the `.env` value.
fn secret(env_value: Option<String>, file_value: Option<&String>) -> String {
    match env_value {
        Some(value) if !value.is_empty() => value,
        _ => file_value.cloned().unwrap_or_default(),
    }
}

fn read_dotenv_file() -> HashMap<String, String> {
    match dotenvy::dotenv_iter() {
        Ok(iter) => iter.filter_map(|item| item.ok()).collect(),
        Err(_) => HashMap::new(),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for handler tests: no network, no static files on disk.
    pub fn for_tests(api_key: &str, access_code: &str) -> Self {
        Config {
            anthropic_api_key: api_key.to_string(),
            access_code: access_code.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(5),
            extractor: ExtractorKind::Brace,
            rust_log: "info".to_string(),
        }
    }
}
