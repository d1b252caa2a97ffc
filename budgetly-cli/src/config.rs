//! CLI configuration: which model provider the advisor talks to.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use budgetly_advisor::LlmConfig;

use crate::store::ensure_budgetly_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// "gemini" or "openai"
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSection {
                provider: "gemini".to_string(),
                model: "gemini-1.5-flash".to_string(),
                base_url: None,
                temperature: 0.2,
                api_key_env: "GEMINI_API_KEY".to_string(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_budgetly_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

impl Config {
    /// Resolve into a ready-to-use client config, pulling the API key from
    /// the configured environment variable.
    pub fn llm_config(&self) -> Result<LlmConfig> {
        let key = std::env::var(&self.llm.api_key_env).with_context(|| {
            format!(
                "{} is not set; export it or change api_key_env in config.toml",
                self.llm.api_key_env
            )
        })?;

        let mut config = match self.llm.provider.as_str() {
            "gemini" => LlmConfig::gemini(&self.llm.model, key),
            "openai" => LlmConfig::openai(&self.llm.model, key),
            other => bail!("unknown llm provider: {other} (expected gemini or openai)"),
        };
        if let Some(base) = &self.llm.base_url {
            config.base_url = base.clone();
        }
        config.temperature = self.llm.temperature;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetly_advisor::Provider;

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.llm.provider, "gemini");
        assert_eq!(back.llm.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut cfg = Config::default();
        cfg.llm.provider = "mystery".to_string();
        cfg.llm.api_key_env = "PATH".to_string(); // always set
        assert!(cfg.llm_config().is_err());
    }

    #[test]
    fn test_base_url_override_applies() {
        let mut cfg = Config::default();
        cfg.llm.api_key_env = "PATH".to_string();
        cfg.llm.base_url = Some("http://localhost:8080".to_string());
        let llm = cfg.llm_config().unwrap();
        assert_eq!(llm.base_url, "http://localhost:8080");
        assert_eq!(llm.provider, Provider::Gemini);
    }
}
