use async_trait::async_trait;
use serde_json::Value;

use crate::domain::branding::ChatMessage;
use crate::domain::DomainError;

/// Port for direct calls to a generative-AI provider.
///
/// The provider owns its wire format; callers pass prompts and schemas and
/// get back text, JSON or base64 audio.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate text for a prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, DomainError>;

    /// Generate a JSON value constrained by a response schema.
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<Value, DomainError>;

    /// Answer one chat turn under a system instruction.
    async fn chat(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, DomainError>;

    /// Synthesize speech and return base64 16-bit little-endian PCM.
    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<String, DomainError>;
}
