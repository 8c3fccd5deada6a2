use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: String,
    pub api_base: String,
    pub fast_model: String,
    pub deep_model: String,
}

// Keeps the credential out of `info!("{:?}", config)`
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("fast_model", &self.fast_model)
            .field("deep_model", &self.deep_model)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub arxiv_api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.aimlapi.com/v1".to_string(),
            fast_model: "gpt-4o-mini".to_string(),
            deep_model: "o1-mini".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            arxiv_api_url: "https://export.arxiv.org/api/query".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { idle_timeout_secs: 3600 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                port: parse_var("PORT", defaults.server.port)?,
                host: env::var("HOST").unwrap_or(defaults.server.host),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.server.cors_allowed_origins),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes)?,
            },
            llm: LLMConfig {
                api_key: env::var("AIML_API_KEY").context("AIML_API_KEY must be set")?,
                api_base: env::var("LLM_API_BASE").unwrap_or(defaults.llm.api_base),
                fast_model: env::var("FAST_MODEL").unwrap_or(defaults.llm.fast_model),
                deep_model: env::var("DEEP_MODEL").unwrap_or(defaults.llm.deep_model),
            },
            search: SearchConfig {
                arxiv_api_url: env::var("ARXIV_API_URL").unwrap_or(defaults.search.arxiv_api_url),
                timeout_secs: parse_var("SEARCH_TIMEOUT_SECS", defaults.search.timeout_secs)?,
            },
            session: SessionConfig {
                idle_timeout_secs: parse_var(
                    "SESSION_IDLE_TIMEOUT_SECS",
                    defaults.session.idle_timeout_secs,
                )?,
            },
            logging: LoggingConfig::from_env(),
        })
    }
}

impl LoggingConfig {
    /// Read only the logging settings, so the subscriber can be installed
    /// before the rest of the configuration is validated.
    pub fn from_env() -> Self {
        Self {
            log_dir: env::var("LOG_DIR").ok().filter(|s| !s.trim().is_empty()),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.llm.fast_model, "gpt-4o-mini");
        assert_eq!(config.llm.deep_model, "o1-mini");
        assert_eq!(config.search.arxiv_api_url, "https://export.arxiv.org/api/query");
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: u64 = parse_var("REASONING_LAB_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let llm = LLMConfig {
            api_key: "sk-secret".to_string(),
            ..LLMConfig::default()
        };
        let rendered = format!("{:?}", llm);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
