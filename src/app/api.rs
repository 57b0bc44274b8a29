use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::app::gateway::Gateway;
use crate::domain::branding::{
    AssistantRequest, BrandContext, ContentRequest, ContextCreated, ContextRef,
    ForgotPasswordRequest, JsonLogin, LoginForm, LogoRequest, NameRequest, RegisterRequest,
    ResetPasswordRequest, SentimentRequest,
};
use crate::domain::endpoint::{
    ASSISTANT, CREATE_CONTEXT, FORGOT_PASSWORD, GENERATE_CONTENT, GENERATE_LOGO, GENERATE_NAME,
    GET_CONTEXT, JSON_LOGIN, LOGIN, RESEARCH, RESET_PASSWORD, REGISTER, ROADMAP, SENTIMENT,
    UPDATE_CONTEXT,
};
use crate::domain::{ApiResponse, DomainError};

/// Typed client for the BrandCraft backend.
///
/// Auth and context calls fall back to simulated responses when the
/// backend is unreachable; generation calls do not.
#[derive(Clone)]
pub struct BrandCraftApi {
    gateway: Arc<Gateway>,
}

impl BrandCraftApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    // ==================== Auth ====================

    /// OAuth2 form login.
    pub async fn login(&self, form: &LoginForm) -> Result<ApiResponse, DomainError> {
        self.gateway.call(&LOGIN, form).await
    }

    pub async fn json_login(&self, payload: &JsonLogin) -> Result<ApiResponse, DomainError> {
        payload.validate()?;
        self.gateway.call(&JSON_LOGIN, payload).await
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<ApiResponse, DomainError> {
        payload.validate()?;
        self.gateway.call(&REGISTER, payload).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ApiResponse, DomainError> {
        let payload = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        payload.validate()?;
        self.gateway.call(&FORGOT_PASSWORD, &payload).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<ApiResponse, DomainError> {
        let payload = ResetPasswordRequest {
            token: token.trim().to_string(),
            new_password: new_password.to_string(),
        };
        payload.validate()?;
        self.gateway.call(&RESET_PASSWORD, &payload).await
    }

    // ==================== Context ====================

    /// Register a brand context with the backend and return its id.
    pub async fn create_context(&self, context: &BrandContext) -> Result<ContextCreated, DomainError> {
        context.validate()?;
        let response = self.gateway.call(&CREATE_CONTEXT, context).await?;
        if !response.ok() {
            return Err(DomainError::Validation(failure_detail(
                &response,
                "Context synchronization failed",
            )));
        }
        let created: ContextCreated = response.json()?;
        info!(context_id = %created.context_id, simulated = response.is_simulated(), "Brand context created");
        Ok(created)
    }

    pub async fn get_context(&self, id: &str) -> Result<ApiResponse, DomainError> {
        self.gateway.call_resource(&GET_CONTEXT, id, None).await
    }

    pub async fn update_context(
        &self,
        id: &str,
        context: &BrandContext,
    ) -> Result<ApiResponse, DomainError> {
        context.validate()?;
        let body = serde_json::to_value(context)?;
        self.gateway
            .call_resource(&UPDATE_CONTEXT, id, Some(body))
            .await
    }

    // ==================== Generation ====================

    pub async fn generate_names(&self, req: &NameRequest) -> Result<ApiResponse, DomainError> {
        self.gateway.call(&GENERATE_NAME, req).await
    }

    pub async fn generate_logo(&self, req: &LogoRequest) -> Result<ApiResponse, DomainError> {
        if req.prompt.trim().is_empty() {
            return Err(DomainError::Validation("Logo prompt is required".to_string()));
        }
        self.gateway.call(&GENERATE_LOGO, req).await
    }

    pub async fn generate_content(&self, req: &ContentRequest) -> Result<ApiResponse, DomainError> {
        self.gateway.call(&GENERATE_CONTENT, req).await
    }

    pub async fn roadmap(&self, context_id: Option<&str>) -> Result<ApiResponse, DomainError> {
        self.gateway.call(&ROADMAP, &Self::context_ref(context_id)).await
    }

    pub async fn research(&self, context_id: Option<&str>) -> Result<ApiResponse, DomainError> {
        self.gateway.call(&RESEARCH, &Self::context_ref(context_id)).await
    }

    pub async fn analyze_sentiment(&self, text: &str) -> Result<ApiResponse, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("Text to analyze is required".to_string()));
        }
        let payload = SentimentRequest {
            text: text.to_string(),
        };
        self.gateway.call(&SENTIMENT, &payload).await
    }

    pub async fn assistant(&self, req: &AssistantRequest) -> Result<ApiResponse, DomainError> {
        self.gateway.call(&ASSISTANT, req).await
    }

    fn context_ref(context_id: Option<&str>) -> ContextRef {
        ContextRef {
            context_id: context_id.map(str::to_string),
        }
    }
}

/// Extract the backend's error text from a failed response.
pub fn failure_detail(response: &ApiResponse, fallback: &str) -> String {
    match response.body() {
        Value::String(text) if !text.is_empty() => text.clone(),
        _ => response
            .detail()
            .or_else(|| response.message())
            .unwrap_or(fallback)
            .to_string(),
    }
}
