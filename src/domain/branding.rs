use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const MIN_PASSWORD_LEN: usize = 8;

fn check_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((user, host)) if !user.is_empty() && !host.is_empty() => Ok(()),
        _ => Err(DomainError::Validation(format!("Invalid email address: '{}'", email))),
    }
}

fn check_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

// ==================== Auth ====================

/// OAuth2 password-flow login, sent form-encoded.
/// `username` carries the email, as the OAuth2 form expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// JSON login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLogin {
    pub email: String,
    pub password: String,
}

impl JsonLogin {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_email(&self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        if self.full_name.trim().is_empty() {
            return Err(DomainError::Validation("Full name is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_email(&self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.token.trim().is_empty() {
            return Err(DomainError::Validation("Reset token is required".to_string()));
        }
        check_password(&self.new_password)
    }
}

/// Successful login body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub status: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Only present in development deployments.
    #[serde(default)]
    pub dev_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResetPasswordResponse {
    pub status: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Error body returned by the backend for 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

// ==================== Brand context ====================

/// User-supplied brand configuration injected into every generation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub industry: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    pub target_audience: String,
    #[serde(default = "default_personality")]
    pub brand_personality: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_personality() -> String {
    "innovative".to_string()
}

impl BrandContext {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.industry.trim().is_empty() {
            return Err(DomainError::Validation("Industry is required".to_string()));
        }
        if self.target_audience.trim().is_empty() {
            return Err(DomainError::Validation("Target audience is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextCreated {
    pub context_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

// ==================== Generation ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRequest {
    pub context_id: Option<String>,
    pub industry_override: Option<String>,
    pub vibe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoRequest {
    pub prompt: String,
    pub style: Option<String>,
    pub context_id: Option<String>,
}

/// Kind of marketing copy to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Tagline,
    Mission,
    Social,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub context_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub context_id: Option<String>,
}

/// Body for roadmap and research calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextRef {
    pub context_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedBrandName {
    pub name: String,
    pub meaning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentBreakdown {
    pub trust: f64,
    pub excitement: f64,
    pub reliability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub score: f64,
    pub breakdown: SentimentBreakdown,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadmapPhase {
    Identity,
    Visuals,
    Launch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapStep {
    pub day: u32,
    pub task: String,
    pub phase: RoadmapPhase,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

// ==================== Backend AI router ====================

/// Text answer routed through the backend (names, content, assistant).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutedText {
    pub provider: String,
    pub response: String,
}

/// Logo answer routed through the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutedImage {
    pub image_url: String,
    pub provider: String,
}

/// Sentiment label from the backend's classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutedSentiment {
    pub label: String,
    pub confidence: f64,
    #[serde(default)]
    pub provider: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> BrandContext {
        BrandContext {
            id: None,
            industry: "Fintech".to_string(),
            tone: "disruptive".to_string(),
            target_audience: "Gen Z Investors".to_string(),
            brand_personality: "bold".to_string(),
            keywords: vec!["trust".to_string(), "speed".to_string()],
        }
    }

    #[test]
    fn test_register_validation() {
        let mut req = RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "correct-horse".to_string(),
            full_name: "Ada".to_string(),
        };
        assert!(req.validate().is_ok());

        req.password = "short".to_string();
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));

        req.password = "long-enough".to_string();
        req.email = "not-an-email".to_string();
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_reset_password_validation() {
        let req = ResetPasswordRequest {
            token: String::new(),
            new_password: "12345678".to_string(),
        };
        assert!(req.validate().is_err());

        let req = ResetPasswordRequest {
            token: "tok".to_string(),
            new_password: "1234567".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_brand_context_validation() {
        assert!(context().validate().is_ok());

        let mut ctx = context();
        ctx.industry = "  ".to_string();
        assert!(ctx.validate().is_err());

        let mut ctx = context();
        ctx.target_audience.clear();
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_brand_context_defaults() {
        let ctx: BrandContext =
            serde_json::from_str(r#"{"industry":"Tech","target_audience":"Everyone"}"#).unwrap();
        assert_eq!(ctx.tone, "professional");
        assert_eq!(ctx.brand_personality, "innovative");
        assert!(ctx.keywords.is_empty());
        assert!(ctx.id.is_none());
    }

    #[test]
    fn test_content_request_wire_format() {
        let req = ContentRequest {
            kind: ContentKind::Mission,
            context_id: Some("c1".to_string()),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "mission");
    }

    #[test]
    fn test_sentiment_result_parse() {
        let raw = r#"{
            "sentiment": "positive",
            "score": 82,
            "breakdown": {"trust": 90, "excitement": 70, "reliability": 85},
            "summary": "Confident and warm."
        }"#;
        let result: SentimentResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.breakdown.trust, 90.0);
    }

    #[test]
    fn test_roadmap_step_parse() {
        let step: RoadmapStep = serde_json::from_str(
            r#"{"day":3,"task":"Pick palette","phase":"Visuals","description":"Lock colors"}"#,
        )
        .unwrap();
        assert_eq!(step.phase, RoadmapPhase::Visuals);
    }

    #[test]
    fn test_forgot_password_validation() {
        let ok = ForgotPasswordRequest {
            email: "ada@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = ForgotPasswordRequest {
            email: "ada.example.com".to_string(),
        };
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_routed_bodies_parse() {
        let text: RoutedText = serde_json::from_value(serde_json::json!({
            "provider": "gemini",
            "response": "1. Lumen - light"
        }))
        .unwrap();
        assert_eq!(text.response, "1. Lumen - light");

        let sentiment: RoutedSentiment = serde_json::from_value(serde_json::json!({
            "label": "positive",
            "confidence": 0.98,
            "provider": "huggingface"
        }))
        .unwrap();
        assert_eq!(sentiment.label, "positive");
        assert!((sentiment.confidence - 0.98).abs() < f64::EPSILON);

        let image: RoutedImage = serde_json::from_value(serde_json::json!({
            "image_url": "/static/logos/fox.png",
            "provider": "stability_ai"
        }))
        .unwrap();
        assert_eq!(image.provider, "stability_ai");
    }
}
