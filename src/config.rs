use std::time::Duration;

use anyhow::Result;

use crate::util::env::{db_url, env_first, env_opt, env_parse, preflight_check};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const GEMINI_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];

/// Typed run configuration, loaded once from the environment and passed down by reference.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub ai_batch_size: usize,
    pub ai_batch_delay: Duration,
    /// Minimum gap between two requests to the same host.
    pub scrape_delay: Duration,
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            ai_batch_size: DEFAULT_BATCH_SIZE,
            ai_batch_delay: Duration::from_millis(1000),
            scrape_delay: Duration::from_millis(800),
            http_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Read every knob from the environment. Nothing here is required yet; see `require_*`.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            database_url: db_url().ok(),
            max_connections: env_parse("DB_MAX_CONNECTIONS", d.max_connections),
            gemini_api_key: env_first(GEMINI_KEY_VARS),
            gemini_model: env_opt("GEMINI_MODEL").unwrap_or(d.gemini_model),
            ai_batch_size: env_parse("ENRICH_BATCH_SIZE", d.ai_batch_size).max(1),
            ai_batch_delay: Duration::from_millis(env_parse("ENRICH_BATCH_DELAY_MS", 1000u64)),
            scrape_delay: Duration::from_millis(env_parse("SCRAPE_DELAY_MS", 800u64)),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 30u64)),
            user_agent: env_opt("SCRAPE_USER_AGENT").unwrap_or(d.user_agent),
        }
    }

    /// Fail before any network call when the store is needed but unconfigured.
    pub fn require_database(&self) -> Result<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "no database configured: set SUPABASE_DB_URL, DATABASE_URL or DB_HOST/DB_USERNAME"
            )
        })
    }

    pub fn require_gemini_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("missing Gemini key: set GEMINI_API_KEY"))
    }

    /// Log a redacted snapshot and verify the keys a command needs.
    pub fn preflight(&self, command: &str, needs_db: bool, needs_ai: bool) -> Result<()> {
        let mut required: Vec<&[&str]> = Vec::new();
        if needs_ai {
            required.push(GEMINI_KEY_VARS);
        }
        preflight_check(
            command,
            &required,
            &[
                "DATABASE_URL",
                "SUPABASE_DB_URL",
                "GEMINI_API_KEY",
                "GEMINI_MODEL",
                "ENRICH_BATCH_SIZE",
                "SCRAPE_DELAY_MS",
            ],
        )?;
        if needs_db {
            self.require_database()?;
        }
        Ok(())
    }
}
