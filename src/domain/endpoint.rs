use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Version prefix every backend path lives under.
pub const API_V1_PREFIX: &str = "/api/v1";

/// Build the full URL for a backend path.
///
/// The version prefix is added exactly once, so `/auth/login` and
/// `/api/v1/auth/login` resolve to the same URL.
pub fn build_url(base_origin: &str, path: &str) -> String {
    let base = base_origin.trim_end_matches('/');
    if path.starts_with(API_V1_PREFIX) {
        return format!("{}{}", base, path);
    }
    let sep = if path.starts_with('/') { "" } else { "/" };
    format!("{}{}{}{}", base, API_V1_PREFIX, sep, path)
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// Encoding of the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Json,
    /// `application/x-www-form-urlencoded`, used by the OAuth2 login.
    Form,
}

impl BodyKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyKind::Json => "application/json",
            BodyKind::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// Generator for a simulated success body.
pub type FallbackFn = fn() -> Value;

/// Typed descriptor of one backend operation.
///
/// The gateway interprets descriptors generically, so auth, timeout and
/// fallback handling live in one place.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    /// Path template, relative to the version prefix. May contain `{id}`.
    pub path: &'static str,
    pub body: BodyKind,
    /// Attach the bearer token.
    pub auth: bool,
    /// Treat a 404 as a missing endpoint rather than a client error.
    pub missing_is_fault: bool,
    pub fallback: Option<FallbackFn>,
}

impl Endpoint {
    const fn post(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method: Method::Post,
            path,
            body: BodyKind::Json,
            auth: false,
            missing_is_fault: false,
            fallback: None,
        }
    }

    const fn authed(mut self) -> Self {
        self.auth = true;
        self
    }

    const fn with_fallback(mut self, fallback: FallbackFn) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Render the path template, substituting `{id}` when given.
    pub fn resolve_path(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.path.replace("{id}", id),
            None => self.path.to_string(),
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn simulated_token() -> Value {
    json!({
        "access_token": format!("sim_neural_{}", now_millis()),
        "full_name": "Demo Operator",
        "token_type": "bearer",
    })
}

fn simulated_registration() -> Value {
    json!({ "status": "success", "user_id": "sim_user" })
}

fn simulated_forgot_password() -> Value {
    json!({
        "dev_token": format!("sim_token_{}", now_millis()),
        "message": "Recovery signal broadcasted.",
    })
}

fn simulated_reset_password() -> Value {
    json!({ "status": "success", "detail": "Cipher recalibrated." })
}

fn simulated_context() -> Value {
    json!({
        "context_id": format!("sim_ctx_{}", now_millis()),
        "message": "Context synchronized",
    })
}

pub const LOGIN: Endpoint = Endpoint {
    body: BodyKind::Form,
    missing_is_fault: true,
    ..Endpoint::post("login", "/auth/login").with_fallback(simulated_token)
};

pub const JSON_LOGIN: Endpoint =
    Endpoint::post("json_login", "/auth/json-login").with_fallback(simulated_token);

pub const REGISTER: Endpoint =
    Endpoint::post("register", "/auth/register").with_fallback(simulated_registration);

pub const FORGOT_PASSWORD: Endpoint = Endpoint::post("forgot_password", "/auth/forgot-password")
    .with_fallback(simulated_forgot_password);

pub const RESET_PASSWORD: Endpoint = Endpoint::post("reset_password", "/auth/reset-password")
    .with_fallback(simulated_reset_password);

pub const CREATE_CONTEXT: Endpoint = Endpoint::post("create_context", "/context/create")
    .authed()
    .with_fallback(simulated_context);

pub const GET_CONTEXT: Endpoint = Endpoint {
    method: Method::Get,
    ..Endpoint::post("get_context", "/context/{id}").authed()
};

pub const UPDATE_CONTEXT: Endpoint = Endpoint {
    method: Method::Put,
    ..Endpoint::post("update_context", "/context/{id}").authed()
};

pub const GENERATE_NAME: Endpoint =
    Endpoint::post("generate_name", "/branding/generate-name").authed();

pub const GENERATE_LOGO: Endpoint =
    Endpoint::post("generate_logo", "/branding/generate-logo").authed();

pub const GENERATE_CONTENT: Endpoint =
    Endpoint::post("generate_content", "/branding/generate-content").authed();

pub const ROADMAP: Endpoint = Endpoint::post("roadmap", "/branding/roadmap").authed();

pub const RESEARCH: Endpoint = Endpoint::post("research", "/branding/research").authed();

pub const SENTIMENT: Endpoint = Endpoint::post("sentiment", "/branding/sentiment").authed();

pub const ASSISTANT: Endpoint = Endpoint::post("assistant", "/branding/assistant").authed();

/// Every registered endpoint, listed by the diagnostics command.
pub fn registry() -> [&'static Endpoint; 15] {
    [
        &LOGIN,
        &JSON_LOGIN,
        &REGISTER,
        &FORGOT_PASSWORD,
        &RESET_PASSWORD,
        &CREATE_CONTEXT,
        &GET_CONTEXT,
        &UPDATE_CONTEXT,
        &GENERATE_NAME,
        &GENERATE_LOGO,
        &GENERATE_CONTENT,
        &ROADMAP,
        &RESEARCH,
        &SENTIMENT,
        &ASSISTANT,
    ]
}
