use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::domain::branding::{ChatMessage, ChatRole};
use crate::domain::config::ProviderConfig;
use crate::domain::DomainError;
use crate::ports::GenerativeProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[allow(dead_code)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    /// First inline data payload of the first candidate.
    fn inline_data(&self) -> Option<&str> {
        self.parts()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
    }
}

/// Generative provider backed by the Gemini `generateContent` REST API.
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            text_model = %config.text_model,
            speech_model = %config.speech_model,
            has_key = config.api_key.is_some(),
            "Gemini provider initialized"
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn text_body(prompt: &str) -> Value {
        json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
    }

    fn json_body(prompt: &str, schema: &Value) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        })
    }

    fn chat_body(system: &str, history: &[ChatMessage], message: &str) -> Value {
        let mut contents: Vec<Value> = history
            .iter()
            .map(|m| json!({ "role": m.role, "parts": [{ "text": m.text }] }))
            .collect();
        contents.push(json!({ "role": ChatRole::User, "parts": [{ "text": message }] }));

        json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": contents
        })
    }

    fn speech_body(text: &str, voice: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
                }
            }
        })
    }

    async fn generate(&self, model: &str, body: &Value) -> Result<GenerateContentResponse, DomainError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::Provider("API key is not configured".to_string()))?;

        debug!(model = model, "Calling generative provider");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(model = model, status = %status, "Generative provider rejected request");
            return Err(DomainError::Provider(format!("HTTP {}: {}", status, detail)));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::Provider(e.to_string()))
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String, DomainError> {
        let response = self
            .generate(&self.config.text_model, &Self::text_body(prompt))
            .await?;
        response
            .text()
            .ok_or_else(|| DomainError::Provider("No content generated".to_string()))
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<Value, DomainError> {
        let response = self
            .generate(&self.config.text_model, &Self::json_body(prompt, schema))
            .await?;
        let text = response
            .text()
            .ok_or_else(|| DomainError::Provider("No content generated".to_string()))?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::Provider(format!("Malformed JSON response: {}", e)))
    }

    async fn chat(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, DomainError> {
        let response = self
            .generate(&self.config.chat_model, &Self::chat_body(system, history, message))
            .await?;
        response
            .text()
            .ok_or_else(|| DomainError::Provider("No reply generated".to_string()))
    }

    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<String, DomainError> {
        let response = self
            .generate(&self.config.speech_model, &Self::speech_body(text, voice))
            .await?;
        response
            .inline_data()
            .map(str::to_string)
            .ok_or_else(|| DomainError::Provider("No audio generated".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: Value) -> GenerateContentResponse {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_extract_text_parts() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Bold " }, { "text": "Brew" }] } }]
        }));
        assert_eq!(response.text().as_deref(), Some("Bold Brew"));
        assert!(response.inline_data().is_none());
    }

    #[test]
    fn test_extract_inline_audio() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAAA" } }
            ] } }]
        }));
        assert_eq!(response.inline_data(), Some("AAAA"));
        assert!(response.text().is_none());
    }

    #[test]
    fn test_empty_candidates() {
        let response = parse(json!({}));
        assert!(response.text().is_none());
        assert!(response.inline_data().is_none());
    }

    #[test]
    fn test_speech_body_selects_voice() {
        let body = GeminiProvider::speech_body("Hello", "Puck");
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Puck"
        );
        assert_eq!(body["generationConfig"]["responseModalities"][0], "AUDIO");
    }

    #[test]
    fn test_json_body_carries_schema() {
        let schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
        let body = GeminiProvider::json_body("Name it", &schema);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_chat_body_appends_message() {
        let history = vec![
            ChatMessage {
                role: ChatRole::User,
                text: "Hi".to_string(),
            },
            ChatMessage {
                role: ChatRole::Model,
                text: "Hello, how can I help?".to_string(),
            },
        ];
        let body = GeminiProvider::chat_body("Be brief.", &history, "Name my cafe");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(body["contents"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["role"], "user");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "Name my cafe");
    }

    #[test]
    fn test_endpoint_url() {
        let provider = GeminiProvider::new(ProviderConfig::default()).unwrap();
        assert_eq!(
            provider.endpoint("gemini-3-flash-preview"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_provider_error() {
        let provider = GeminiProvider::new(ProviderConfig::default()).unwrap();
        let result = provider.generate_text("hi").await;
        assert!(matches!(result, Err(DomainError::Provider(_))));
    }
}
