//! Server and model-provider configuration read from the environment.
//!
//! - `ALGOVIZ_BIND`: listen address (default: "0.0.0.0")
//! - `ALGOVIZ_PORT`: listen port (default: "3000")
//! - `ALGOVIZ_SESSION_TTL_SECS`: idle player session lifetime (default: 1800)
//! - `ALGOVIZ_LLM_PROVIDER`: `openrouter` (default) or `openai_compatible`
//! - `ALGOVIZ_LLM_MODEL`, `ALGOVIZ_LLM_API_BASE_URL`, `ALGOVIZ_LLM_API_KEY`,
//!   `ALGOVIZ_LLM_SYSTEM_PROMPT`

use std::time::Duration;

pub const DEFAULT_PROVIDER: &str = "openrouter";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Connection settings for an OpenAI-compatible chat completions provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
}

impl LlmConfig {
    /// A provider with an API key and a model is the minimum usable setup.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
            && self.model.as_deref().is_some_and(|m| !m.is_empty())
            && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        LlmConfig {
            provider: Some(
                lookup("ALGOVIZ_LLM_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            ),
            model: lookup("ALGOVIZ_LLM_MODEL"),
            api_base_url: lookup("ALGOVIZ_LLM_API_BASE_URL"),
            api_key: lookup("ALGOVIZ_LLM_API_KEY"),
            system_prompt: lookup("ALGOVIZ_LLM_SYSTEM_PROMPT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub session_ttl: Duration,
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    /// Builds a config from an arbitrary key lookup. Unparseable numbers fall
    /// back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let port = parse_or(&lookup, "ALGOVIZ_PORT", defaults.port);
        let ttl_secs = parse_or(&lookup, "ALGOVIZ_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS);
        ServerConfig {
            bind: lookup("ALGOVIZ_BIND").unwrap_or(defaults.bind),
            port,
            session_ttl: Duration::from_secs(ttl_secs),
            llm: LlmConfig::from_lookup(&lookup),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }),
        None => default,
    }
}
