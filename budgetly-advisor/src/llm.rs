//! Chat-style completion client for the advisor's generative-model calls.
//!
//! Two providers: Gemini (the default) and any OpenAI-compatible endpoint.
//! Replies come back as free text; parsing them is the caller's problem
//! (see [`crate::extract`]).

use anyhow::{bail, Context, Result};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn gemini(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: Provider::Gemini,
            model: model.into(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.2,
        }
    }

    pub fn openai(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: Provider::OpenAi,
            model: model.into(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Send a role-tagged conversation and return the text reply.
pub async fn chat_complete(config: &LlmConfig, system: &str, turns: &[ChatTurn]) -> Result<String> {
    match config.provider {
        Provider::Gemini => gemini_complete(config, system, turns).await,
        Provider::OpenAi => openai_complete(config, system, turns).await,
    }
}

async fn gemini_complete(config: &LlmConfig, system: &str, turns: &[ChatTurn]) -> Result<String> {
    #[derive(Serialize)]
    struct Part {
        text: String,
    }

    #[derive(Serialize)]
    struct Content {
        parts: Vec<Part>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct GenerationConfig {
        temperature: f32,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Req {
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    }

    #[derive(Deserialize)]
    struct Resp {
        #[serde(default)]
        candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    struct Candidate {
        content: RespContent,
    }

    #[derive(Deserialize)]
    struct RespContent {
        #[serde(default)]
        parts: Vec<RespPart>,
    }

    #[derive(Deserialize)]
    struct RespPart {
        text: Option<String>,
    }

    // Gemini takes a flat prompt; fold the role-tagged turns into one block
    let mut prompt = format!("[SYSTEM] {system}");
    for t in turns {
        prompt.push('\n');
        prompt.push_str(&format!("[{}] {}", t.role.to_uppercase(), t.content));
    }

    let body = Req {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: config.temperature,
        },
    };

    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        config.base_url, config.model, config.api_key
    );

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .context("gemini request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("gemini error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse gemini response")?;
    let mut s = String::new();
    for candidate in out.candidates.into_iter().take(1) {
        for part in candidate.content.parts {
            if let Some(text) = part.text {
                s.push_str(&text);
            }
        }
    }
    Ok(s.trim().to_string())
}

async fn openai_complete(config: &LlmConfig, system: &str, turns: &[ChatTurn]) -> Result<String> {
    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        messages: Vec<Msg>,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: MsgOut,
    }

    #[derive(Deserialize)]
    struct MsgOut {
        content: Option<String>,
    }

    let mut msgs = vec![Msg {
        role: "system".to_string(),
        content: system.to_string(),
    }];
    for t in turns {
        msgs.push(Msg {
            role: t.role.clone(),
            content: t.content.clone(),
        });
    }

    let body = Req {
        model: config.model.clone(),
        messages: msgs,
        temperature: config.temperature,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/v1/chat/completions", config.base_url))
        .header(AUTHORIZATION, format!("Bearer {}", config.api_key))
        .json(&body)
        .send()
        .await
        .context("openai request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("openai error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse openai response")?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    Ok(content.trim().to_string())
}
