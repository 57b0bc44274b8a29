use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::domain::endpoint::Method;
use crate::domain::DomainError;
use crate::ports::{HttpRequest, HttpResponse, HttpTransport, RequestBody};

/// `HttpTransport` backed by a shared reqwest client.
///
/// Deadlines are enforced by the gateway, not here, so that dropping the
/// in-flight future is the single cancellation path.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("BrandCraft/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        info!("HTTP transport initialized");
        Ok(Self { client })
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DomainError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(pairs)) => builder.form(pairs),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?
            .to_vec();

        debug!(url = %request.url, status = status, bytes = body.len(), "Response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(ReqwestTransport::method(Method::Get), reqwest::Method::GET);
        assert_eq!(ReqwestTransport::method(Method::Post), reqwest::Method::POST);
        assert_eq!(ReqwestTransport::method(Method::Put), reqwest::Method::PUT);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::new().unwrap();
        // Port 9 (discard) on loopback is closed on test machines.
        let result = transport
            .send(HttpRequest {
                method: Method::Post,
                url: "http://127.0.0.1:9/api/v1/auth/login".to_string(),
                headers: Vec::new(),
                body: Some(RequestBody::Form(vec![(
                    "username".to_string(),
                    "a@b.c".to_string(),
                )])),
            })
            .await;
        assert!(matches!(result, Err(DomainError::Transport(_))));
    }
}
