use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::config::ApiConfig;
use crate::domain::endpoint::{build_url, BodyKind, Endpoint};
use crate::domain::{ApiResponse, DomainError, ResponseBody};
use crate::ports::{HttpRequest, HttpResponse, HttpTransport, Notifier, RequestBody};

/// Read-only access to the current bearer token.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Mediates every backend call.
///
/// Each call is bounded by the configured timeout. Statuses >= 500, and a
/// 404 on endpoints flagged `missing_is_fault`, are raised as errors. When
/// an endpoint defines a fallback, transport and server failures are
/// absorbed into a simulated success after a short delay; otherwise they
/// propagate. There are no retries.
pub struct Gateway {
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn Notifier>,
    tokens: Arc<dyn TokenSource>,
    config: RwLock<ApiConfig>,
}

impl Gateway {
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn HttpTransport>,
        notifier: Arc<dyn Notifier>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            transport,
            notifier,
            tokens,
            config: RwLock::new(config),
        }
    }

    pub fn config(&self) -> ApiConfig {
        self.config.read().clone()
    }

    pub fn set_config(&self, config: ApiConfig) {
        *self.config.write() = config;
    }

    /// Call an endpoint with a serializable payload.
    pub async fn call<P: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        payload: &P,
    ) -> Result<ApiResponse, DomainError> {
        let body = serde_json::to_value(payload)?;
        self.execute(endpoint, endpoint.resolve_path(None), Some(body))
            .await
    }

    /// Call an endpoint whose path carries a resource id.
    pub async fn call_resource(
        &self,
        endpoint: &Endpoint,
        id: &str,
        payload: Option<Value>,
    ) -> Result<ApiResponse, DomainError> {
        self.execute(endpoint, endpoint.resolve_path(Some(id)), payload)
            .await
    }

    async fn execute(
        &self,
        endpoint: &Endpoint,
        path: String,
        payload: Option<Value>,
    ) -> Result<ApiResponse, DomainError> {
        let config = self.config();
        let request = self.build_request(endpoint, &config, &path, payload)?;

        match self.dispatch(endpoint, &config, request).await {
            Ok(body) => Ok(ApiResponse::Real(body)),
            Err(err) => self.recover(endpoint, &config, err).await,
        }
    }

    fn build_request(
        &self,
        endpoint: &Endpoint,
        config: &ApiConfig,
        path: &str,
        payload: Option<Value>,
    ) -> Result<HttpRequest, DomainError> {
        let url = build_url(&config.base_url, path);
        debug!(endpoint = endpoint.name, url = %url, "API target URL");

        let mut headers = vec![(
            "Content-Type".to_string(),
            endpoint.body.content_type().to_string(),
        )];
        if endpoint.auth {
            let token = self.tokens.bearer_token().unwrap_or_default();
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let body = match (endpoint.body, payload) {
            (_, None) => None,
            (BodyKind::Json, Some(value)) => Some(RequestBody::Json(value)),
            (BodyKind::Form, Some(value)) => Some(RequestBody::Form(form_pairs(value)?)),
        };

        Ok(HttpRequest {
            method: endpoint.method,
            url,
            headers,
            body,
        })
    }

    async fn dispatch(
        &self,
        endpoint: &Endpoint,
        config: &ApiConfig,
        request: HttpRequest,
    ) -> Result<ResponseBody, DomainError> {
        let url = request.url.clone();

        // Dropping the send future on expiry aborts the request.
        let response = match tokio::time::timeout(config.timeout(), self.transport.send(request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(endpoint = endpoint.name, url = %url, secs = config.timeout_secs, "Request timed out");
                self.notifier.server_not_responding();
                return Err(DomainError::Timeout {
                    secs: config.timeout_secs,
                });
            }
        };

        classify(endpoint, &url, response)
    }

    async fn recover(
        &self,
        endpoint: &Endpoint,
        config: &ApiConfig,
        err: DomainError,
    ) -> Result<ApiResponse, DomainError> {
        match endpoint.fallback {
            Some(fallback) if config.simulation_enabled && err.is_fallback_eligible() => {
                warn!(
                    endpoint = endpoint.name,
                    error = %err,
                    "Backend unreachable, entering simulation mode"
                );
                tokio::time::sleep(config.simulation_delay()).await;
                Ok(ApiResponse::Simulated(ResponseBody::simulated(fallback())))
            }
            _ => {
                warn!(endpoint = endpoint.name, error = %err, "Backend call failed");
                Err(err)
            }
        }
    }
}

/// Raise server faults and missing endpoints; pass every other status through.
fn classify(endpoint: &Endpoint, url: &str, response: HttpResponse) -> Result<ResponseBody, DomainError> {
    if response.status >= 500 {
        return Err(DomainError::ServerFault {
            status: response.status,
        });
    }
    if response.status == 404 && endpoint.missing_is_fault {
        return Err(DomainError::EndpointMissing {
            path: url.to_string(),
        });
    }

    Ok(ResponseBody {
        status: response.status,
        headers: response.headers,
        body: parse_body(&response.body),
    })
}

/// JSON when possible, raw text otherwise, null when empty.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Flatten a JSON object into urlencoded form pairs. Nulls are skipped.
fn form_pairs(value: Value) -> Result<Vec<(String, String)>, DomainError> {
    let Value::Object(map) = value else {
        return Err(DomainError::Serialization(
            "Form payload must be an object".to_string(),
        ));
    };

    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((k, s)),
            other => Some((k, other.to_string())),
        })
        .collect())
}
