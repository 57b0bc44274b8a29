//! String-error command surface for a UI shell.
//!
//! Each command maps onto one user action. Errors are flattened to their
//! display text, which is what the shell shows in its alert.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::app::api::failure_detail;
use crate::app::{AppController, SignInOutcome};
use crate::domain::branding::{
    AssistantRequest, ChatMessage, ContentKind, ContentRequest, ForgotPasswordResponse,
    GeneratedBrandName, LogoRequest, NameRequest, RegisterRequest, RegisterResponse,
    ResetPasswordResponse, RoadmapStep, RoutedImage, RoutedSentiment, RoutedText,
    SentimentResult,
};
use crate::domain::endpoint::{build_url, registry};
use crate::domain::{ApiResponse, AppConfig, BrandContext};

/// Decode a successful response, or surface the backend's error text.
///
/// The AI router reports provider failures as a 2xx `{"error": true}` body,
/// which is treated like a failed status.
fn expect_ok<T: DeserializeOwned>(response: ApiResponse, fallback: &str) -> Result<T, String> {
    if !response.ok() || response.reports_error() {
        return Err(failure_detail(&response, fallback));
    }
    response.json().map_err(|e| e.to_string())
}

fn active_context_id(controller: &AppController) -> Option<String> {
    controller.state().context().and_then(|ctx| ctx.id)
}

// ==================== Config ====================

/// Get the current application configuration.
pub fn get_config(controller: &AppController) -> AppConfig {
    controller.config()
}

/// Update the application configuration.
pub fn update_config(controller: &AppController, config: AppConfig) -> Result<(), String> {
    controller
        .update_config(config)
        .map_err(|e| e.to_string())
}

/// Application paths information.
#[derive(Debug, Serialize)]
pub struct AppPaths {
    pub data_dir: String,
    pub logs_dir: String,
    pub config_path: String,
}

/// Get application paths information.
pub fn get_paths(controller: &AppController) -> AppPaths {
    AppPaths {
        data_dir: controller.data_dir(),
        logs_dir: controller.logs_dir(),
        config_path: controller.config_path(),
    }
}

/// One backend endpoint as seen by the diagnostics screen.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub name: &'static str,
    pub method: &'static str,
    pub url: String,
    pub authenticated: bool,
    pub simulated_when_offline: bool,
}

/// List every backend endpoint against the configured base URL.
pub fn list_endpoints(controller: &AppController) -> Vec<EndpointInfo> {
    let base_url = controller.config().api.base_url;
    registry()
        .iter()
        .map(|endpoint| EndpointInfo {
            name: endpoint.name,
            method: endpoint.method.as_str(),
            url: build_url(&base_url, endpoint.path),
            authenticated: endpoint.auth,
            simulated_when_offline: endpoint.has_fallback(),
        })
        .collect()
}

// ==================== Session ====================

/// What the shell needs to render its header and login screen.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub display_name: Option<String>,
    pub remembered_email: Option<String>,
    pub context: Option<BrandContext>,
}

/// Get the current session.
pub fn get_session(controller: &AppController) -> SessionInfo {
    let state = controller.state();
    SessionInfo {
        authenticated: state.is_authenticated(),
        display_name: state.display_name(),
        remembered_email: state.remembered_email(),
        context: state.context(),
    }
}

/// Sign in with email and password.
pub async fn sign_in(
    controller: &AppController,
    email: String,
    password: String,
    remember: bool,
) -> Result<SignInOutcome, String> {
    controller
        .sign_in(&email, &password, remember)
        .await
        .map_err(|e| e.to_string())
}

/// Sign out, keeping the remembered email and brand context.
pub fn sign_out(controller: &AppController) -> Result<(), String> {
    controller.sign_out().map_err(|e| e.to_string())
}

/// Create an account.
pub async fn register(
    controller: &AppController,
    email: String,
    password: String,
    full_name: String,
) -> Result<RegisterResponse, String> {
    let request = RegisterRequest {
        email: email.trim().to_string(),
        password,
        full_name: full_name.trim().to_string(),
    };
    let response = controller
        .api()
        .register(&request)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Registration failed")
}

/// Ask for a password reset token.
pub async fn request_password_reset(
    controller: &AppController,
    email: String,
) -> Result<ForgotPasswordResponse, String> {
    let response = controller
        .api()
        .forgot_password(&email)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Recovery request failed")
}

/// Set a new password with a reset token.
pub async fn confirm_password_reset(
    controller: &AppController,
    token: String,
    new_password: String,
) -> Result<ResetPasswordResponse, String> {
    let response = controller
        .api()
        .reset_password(&token, &new_password)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Password reset failed")
}

// ==================== Brand context ====================

/// Sync the brand context with the backend and make it active.
pub async fn save_brand_context(
    controller: &AppController,
    context: BrandContext,
) -> Result<BrandContext, String> {
    controller
        .sync_context(context)
        .await
        .map_err(|e| e.to_string())
}

// ==================== Backend generation ====================

/// Brand names from the backend's AI router.
pub async fn generate_names(
    controller: &AppController,
    vibe: Option<String>,
    industry_override: Option<String>,
) -> Result<RoutedText, String> {
    let request = NameRequest {
        context_id: active_context_id(controller),
        industry_override,
        vibe,
    };
    let response = controller
        .api()
        .generate_names(&request)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Name generation failed")
}

/// Logo image from the backend's AI router.
pub async fn generate_logo(
    controller: &AppController,
    prompt: String,
    style: Option<String>,
) -> Result<RoutedImage, String> {
    let request = LogoRequest {
        prompt,
        style,
        context_id: active_context_id(controller),
    };
    let response = controller
        .api()
        .generate_logo(&request)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Logo generation failed")
}

/// Marketing copy from the backend's AI router.
pub async fn generate_content(
    controller: &AppController,
    kind: ContentKind,
) -> Result<RoutedText, String> {
    let request = ContentRequest {
        kind,
        context_id: active_context_id(controller),
    };
    let response = controller
        .api()
        .generate_content(&request)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Content generation failed")
}

/// Launch roadmap for the active context.
pub async fn roadmap(controller: &AppController) -> Result<Vec<RoadmapStep>, String> {
    let context_id = active_context_id(controller);
    let response = controller
        .api()
        .roadmap(context_id.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Roadmap generation failed")
}

/// Market research for the active context, passed through as-is.
pub async fn research(controller: &AppController) -> Result<Value, String> {
    let context_id = active_context_id(controller);
    let response = controller
        .api()
        .research(context_id.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Market research failed")
}

/// Sentiment label from the backend's classifier.
pub async fn analyze_sentiment(
    controller: &AppController,
    text: String,
) -> Result<RoutedSentiment, String> {
    let response = controller
        .api()
        .analyze_sentiment(&text)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Sentiment analysis failed")
}

/// Ask the backend's branding advisor.
pub async fn ask_assistant(
    controller: &AppController,
    message: String,
    history: Vec<ChatMessage>,
) -> Result<RoutedText, String> {
    let request = AssistantRequest {
        message,
        history,
        context_id: active_context_id(controller),
    };
    let response = controller
        .api()
        .assistant(&request)
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response, "Assistant unavailable")
}

// ==================== Direct provider ====================

/// Copy written by the generative provider directly.
pub async fn generate_copy(controller: &AppController, kind: ContentKind) -> Result<String, String> {
    controller
        .generate_copy(kind)
        .await
        .map_err(|e| e.to_string())
}

/// Structured brand name ideas from the generative provider.
pub async fn suggest_names(controller: &AppController) -> Result<Vec<GeneratedBrandName>, String> {
    controller.suggest_names().await.map_err(|e| e.to_string())
}

/// Scored sentiment breakdown from the generative provider.
pub async fn score_sentiment(
    controller: &AppController,
    text: String,
) -> Result<SentimentResult, String> {
    controller
        .score_sentiment(&text)
        .await
        .map_err(|e| e.to_string())
}

/// Chat with the branding assistant through the generative provider.
pub async fn chat(
    controller: &AppController,
    message: String,
    history: Vec<ChatMessage>,
) -> Result<String, String> {
    controller
        .chat(&history, &message)
        .await
        .map_err(|e| e.to_string())
}

// ==================== Voice ====================

/// Summary of a synthesized clip that started playing.
#[derive(Debug, Serialize)]
pub struct VoiceResult {
    pub sample_rate: u32,
    pub channels: usize,
    pub frame_count: usize,
    pub duration_secs: f32,
}

/// Synthesize a script and play it.
pub async fn synthesize_voice(
    controller: &AppController,
    text: String,
    voice: Option<String>,
) -> Result<VoiceResult, String> {
    let audio = controller
        .synthesize_voice(&text, voice.as_deref())
        .await
        .map_err(|e| e.to_string())?;

    Ok(VoiceResult {
        sample_rate: audio.sample_rate(),
        channels: audio.channel_count(),
        frame_count: audio.frame_count(),
        duration_secs: audio.duration_secs(),
    })
}

/// Stop voice playback.
pub fn stop_voice(controller: &AppController) {
    controller.player().stop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controller::tests::harness;
    use crate::app::gateway::tests::Behaviour;
    use serde_json::json;

    fn active_context() -> BrandContext {
        BrandContext {
            id: Some("ctx-9".to_string()),
            industry: "Energy".to_string(),
            tone: "professional".to_string(),
            target_audience: "Homeowners".to_string(),
            brand_personality: "innovative".to_string(),
            keywords: Vec::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_surfaces_backend_detail() {
        let h = harness(
            "brandcraft_cmd_register",
            Behaviour::Respond(400, json!({"detail": "Email already registered"})),
        );

        let err = register(
            &h.controller,
            "ada@example.com".to_string(),
            "hunter2222".to_string(),
            "Ada".to_string(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, "Email already registered");
    }

    #[tokio::test(start_paused = true)]
    async fn test_password_reset_offline() {
        let h = harness("brandcraft_cmd_reset", Behaviour::Refuse);

        let sent = request_password_reset(&h.controller, "ada@example.com".to_string())
            .await
            .unwrap();
        assert!(sent.dev_token.unwrap().starts_with("sim_token_"));

        let done = confirm_password_reset(&h.controller, "tok".to_string(), "new-password".to_string())
            .await
            .unwrap();
        assert_eq!(done.status, "success");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_offline_is_error() {
        let h = harness("brandcraft_cmd_offline", Behaviour::Refuse);

        assert!(generate_names(&h.controller, None, None).await.is_err());
        assert!(roadmap(&h.controller).await.is_err());
        assert!(analyze_sentiment(&h.controller, "Love it".to_string())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_names_reads_router_reply() {
        let h = harness(
            "brandcraft_cmd_names",
            Behaviour::Respond(200, json!({"provider": "gemini", "response": "1. Lumen - light"})),
        );
        h.controller.state().set_context(active_context()).unwrap();

        let names = generate_names(&h.controller, Some("bright".to_string()), None)
            .await
            .unwrap();
        assert_eq!(names.provider, "gemini");
        assert_eq!(names.response, "1. Lumen - light");

        match h.transport.last().body {
            Some(crate::ports::RequestBody::Json(body)) => {
                assert_eq!(body["context_id"], "ctx-9");
                assert_eq!(body["vibe"], "bright");
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_sentiment_reads_classifier_reply() {
        let h = harness(
            "brandcraft_cmd_sentiment",
            Behaviour::Respond(
                200,
                json!({"label": "positive", "confidence": 0.98, "provider": "huggingface"}),
            ),
        );

        let result = analyze_sentiment(&h.controller, "We love it".to_string())
            .await
            .unwrap();
        assert_eq!(result.label, "positive");
        assert_eq!(result.provider, "huggingface");
    }

    #[tokio::test(start_paused = true)]
    async fn test_router_error_report_is_failure() {
        let h = harness(
            "brandcraft_cmd_router_error",
            Behaviour::Respond(
                200,
                json!({
                    "error": true,
                    "message": "Service temporarily unavailable: sentiment",
                    "details": "upstream timeout"
                }),
            ),
        );

        let err = analyze_sentiment(&h.controller, "We love it".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, "Service temporarily unavailable: sentiment");

        let err = generate_names(&h.controller, None, None).await.unwrap_err();
        assert_eq!(err, "Service temporarily unavailable: sentiment");
    }

    #[tokio::test(start_paused = true)]
    async fn test_logo_and_assistant_replies() {
        let h = harness(
            "brandcraft_cmd_logo",
            Behaviour::Respond(
                200,
                json!({"image_url": "/static/logos/fox.png", "provider": "stability_ai"}),
            ),
        );
        let logo = generate_logo(&h.controller, "a fox".to_string(), None)
            .await
            .unwrap();
        assert_eq!(logo.image_url, "/static/logos/fox.png");

        h.transport.set(Behaviour::Respond(
            200,
            json!({"provider": "ibm_watsonx", "response": "Lead with trust."}),
        ));
        let advice = ask_assistant(&h.controller, "Tips?".to_string(), Vec::new())
            .await
            .unwrap();
        assert_eq!(advice.provider, "ibm_watsonx");
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_provider_commands() {
        let h = harness("brandcraft_cmd_direct", Behaviour::Refuse);

        *h.provider.json.lock() = json!([{"name": "Lumen", "meaning": "light"}]);
        let names = suggest_names(&h.controller).await.unwrap();
        assert_eq!(names[0].name, "Lumen");

        let reply = chat(&h.controller, "Hi".to_string(), Vec::new()).await.unwrap();
        assert_eq!(reply, "Lean into warmth.");

        let err = score_sentiment(&h.controller, " ".to_string()).await.unwrap_err();
        assert!(err.contains("Text to analyze is required"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_endpoints() {
        let h = harness("brandcraft_cmd_endpoints", Behaviour::Refuse);

        let endpoints = list_endpoints(&h.controller);
        assert_eq!(endpoints.len(), 15);

        let login = endpoints.iter().find(|e| e.name == "login").unwrap();
        assert_eq!(login.method, "POST");
        assert_eq!(login.url, "http://localhost:8000/api/v1/auth/login");
        assert!(!login.authenticated);
        assert!(login.simulated_when_offline);

        let sentiment = endpoints.iter().find(|e| e.name == "sentiment").unwrap();
        assert!(sentiment.authenticated);
        assert!(!sentiment.simulated_when_offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_and_voice() {
        let h = harness("brandcraft_cmd_voice", Behaviour::Refuse);

        sign_in(&h.controller, "ada@example.com".to_string(), "hunter22".to_string(), true)
            .await
            .unwrap();
        let session = get_session(&h.controller);
        assert!(session.authenticated);
        assert_eq!(session.remembered_email.as_deref(), Some("ada@example.com"));

        let clip = synthesize_voice(&h.controller, "Hello".to_string(), Some("Puck".to_string()))
            .await
            .unwrap();
        assert_eq!(clip.frame_count, 3);
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.sample_rate, 24_000);

        stop_voice(&h.controller);
        sign_out(&h.controller).unwrap();
        assert!(!get_session(&h.controller).authenticated);
    }
}
