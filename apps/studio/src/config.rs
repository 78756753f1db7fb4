use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODELS;
use crate::rewrite::RetryPolicy;
use crate::sync::SyncSettings;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_path: PathBuf,
    pub templates_dir: PathBuf,
    /// Fallback key used when neither the request nor the store carries one.
    pub gemini_api_key: Option<String>,
    pub gemini_models: Vec<String>,
    pub sync_debounce: Duration,
    pub ai_call_timeout: Duration,
    pub ai_retry_cooldown: Duration,
    pub ai_passes: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let gemini_models: Vec<String> = match lookup("GEMINI_MODELS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };
        if gemini_models.is_empty() {
            bail!("GEMINI_MODELS must name at least one model");
        }

        let ai_passes: u32 = parse(&var("AI_PASSES", "2"), "AI_PASSES")?;
        if ai_passes == 0 {
            bail!("AI_PASSES must be at least 1");
        }

        Ok(Config {
            port: parse(&var("PORT", "8080"), "PORT")?,
            rust_log: var("RUST_LOG", "info"),
            store_path: PathBuf::from(var("STORE_PATH", ".cv-studio/store.json")),
            templates_dir: PathBuf::from(var("TEMPLATES_DIR", "templates")),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_models,
            sync_debounce: Duration::from_millis(parse(
                &var("SYNC_DEBOUNCE_MS", "200"),
                "SYNC_DEBOUNCE_MS",
            )?),
            ai_call_timeout: Duration::from_secs(parse(
                &var("AI_CALL_TIMEOUT_SECS", "10"),
                "AI_CALL_TIMEOUT_SECS",
            )?),
            ai_retry_cooldown: Duration::from_millis(parse(
                &var("AI_RETRY_COOLDOWN_MS", "2000"),
                "AI_RETRY_COOLDOWN_MS",
            )?),
            ai_passes,
        })
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            debounce: self.sync_debounce,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            models: self.gemini_models.clone(),
            passes: self.ai_passes,
            cooldown: self.ai_retry_cooldown,
            call_timeout: self.ai_call_timeout,
        }
    }
}

fn parse<T>(value: &str, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{value}'"))
}
