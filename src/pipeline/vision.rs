//! Hosted-model interaction: one chat-completions call per draw.
//!
//! This module is intentionally thin — prompt wording lives in
//! [`crate::prompts`], reply interpretation in [`crate::pipeline::parse`].
//! Here we only build the multimodal request body, carry the credential,
//! and surface API failures as per-draw errors. There is no retry: the
//! orchestrator treats any failure as terminal for that draw and moves on.

use crate::config::HarvestConfig;
use crate::error::{DrawError, HarvestError};
use crate::game::GameType;
use crate::pipeline::encode::{data_uri, encode_image};
use crate::pipeline::parse::{parse_reply, Extraction};
use crate::prompts::extraction_prompt;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the hosted vision model.
pub struct VisionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl VisionClient {
    /// Build a client from the run config.
    ///
    /// The credential comes from `config.api_key`, falling back to the
    /// `OPENAI_API_KEY` environment variable. Its absence is the one fatal
    /// startup error: no work should begin without it.
    pub fn new(config: &HarvestConfig) -> Result<Self, HarvestError> {
        let api_key = match &config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .ok_or(HarvestError::ApiKeyMissing)?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| HarvestError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Read one announcement image: encode, call the model, parse the reply.
    pub async fn read_draw(
        &self,
        image_path: &Path,
        game: GameType,
        draw_number: u32,
    ) -> Result<Extraction, DrawError> {
        info!("[{draw_number:05}] Analyzing with vision model");

        let b64 = encode_image(image_path, draw_number).await?;

        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": extraction_prompt(game) },
                    { "type": "image_url", "image_url": { "url": data_uri(&b64) } },
                ],
            }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| DrawError::Api {
                draw_number,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("[{draw_number:05}] API returned {status}: {error_text}");
            return Err(DrawError::Api {
                draw_number,
                detail: format!("HTTP {status}: {error_text}"),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| DrawError::Api {
            draw_number,
            detail: format!("malformed response: {e}"),
        })?;

        let reply = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DrawError::Api {
                draw_number,
                detail: "empty reply".to_string(),
            })?;

        debug!("[{draw_number:05}] Model reply: {}", reply.trim());
        Ok(parse_reply(reply.trim(), game))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarvestConfig;

    #[test]
    fn explicit_key_beats_environment() {
        let config = HarvestConfig::builder(GameType::Power655)
            .api_key("sk-test")
            .build()
            .unwrap();
        let client = VisionClient::new(&config).unwrap();
        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.model, "gpt-4o");
    }

    #[test]
    fn empty_explicit_key_falls_through() {
        // An empty string is "not configured", same as None.
        let mut config = HarvestConfig::new(GameType::Mega645);
        config.api_key = Some(String::new());
        config.api_url = "http://localhost:0/v1".into();

        match VisionClient::new(&config) {
            // Either the env var is set on this machine (client builds) or
            // the fatal startup error fires; an empty key must never be used.
            Ok(client) => assert!(!client.api_key.is_empty()),
            Err(e) => assert!(matches!(e, HarvestError::ApiKeyMissing)),
        }
    }

    #[test]
    fn response_json_shape_parses() {
        let raw = r#"{
            "choices": [
                { "message": { "content": "Date: 05/03/2024\nNumbers: 01, 15, 23, 34, 42, 55" } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert!(parsed.choices[0]
            .message
            .content
            .as_deref()
            .unwrap()
            .starts_with("Date:"));
    }
}
