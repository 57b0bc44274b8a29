use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::DomainError;

/// Status, headers and parsed JSON body of a backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBody {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ResponseBody {
    /// A 200 JSON response as fabricated in demo mode.
    pub fn simulated(body: Value) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        }
    }
}

/// A response from the gateway, either from the backend or fabricated
/// after a transport failure. Both variants carry the same payload and
/// every accessor behaves identically on them.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Real(ResponseBody),
    Simulated(ResponseBody),
}

impl ApiResponse {
    fn inner(&self) -> &ResponseBody {
        match self {
            ApiResponse::Real(b) | ApiResponse::Simulated(b) => b,
        }
    }

    pub fn status(&self) -> u16 {
        self.inner().status
    }

    /// True for 2xx statuses.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status())
    }

    pub fn body(&self) -> &Value {
        &self.inner().body
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner()
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Deserialize the body into a typed schema.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        Ok(serde_json::from_value(self.body().clone())?)
    }

    pub fn into_body(self) -> Value {
        match self {
            ApiResponse::Real(b) | ApiResponse::Simulated(b) => b.body,
        }
    }

    /// The backend's `detail` message, if the body carries one.
    pub fn detail(&self) -> Option<&str> {
        self.body().get("detail").and_then(Value::as_str)
    }

    /// The backend's `message`, as carried by its AI router error reports.
    pub fn message(&self) -> Option<&str> {
        self.body().get("message").and_then(Value::as_str)
    }

    /// True when the body is an `{"error": ...}` report. The AI router
    /// answers provider failures this way with a 2xx status.
    pub fn reports_error(&self) -> bool {
        match self.body().get("error") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => !text.is_empty(),
            _ => false,
        }
    }

    /// For diagnostics only.
    pub fn is_simulated(&self) -> bool {
        matches!(self, ApiResponse::Simulated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simulated_response_shape() {
        let resp = ApiResponse::Simulated(ResponseBody::simulated(json!({"status": "success"})));
        assert!(resp.ok());
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert!(resp.is_simulated());
    }

    #[test]
    fn test_real_and_simulated_accessors_agree() {
        let body = ResponseBody::simulated(json!({"context_id": "c1"}));
        let real = ApiResponse::Real(body.clone());
        let sim = ApiResponse::Simulated(body);

        assert_eq!(real.status(), sim.status());
        assert_eq!(real.body(), sim.body());
        assert_eq!(real.header("content-type"), sim.header("content-type"));
        assert_eq!(real.clone().into_body(), sim.clone().into_body());
    }

    #[test]
    fn test_client_error_detail() {
        let resp = ApiResponse::Real(ResponseBody {
            status: 400,
            headers: Vec::new(),
            body: json!({"error": true, "detail": "Invalid credentials"}),
        });
        assert!(!resp.ok());
        assert_eq!(resp.detail(), Some("Invalid credentials"));
    }

    #[test]
    fn test_router_error_report() {
        let resp = ApiResponse::Real(ResponseBody {
            status: 200,
            headers: Vec::new(),
            body: json!({
                "error": true,
                "message": "Service temporarily unavailable: sentiment",
                "details": "timeout"
            }),
        });
        assert!(resp.ok());
        assert!(resp.reports_error());
        assert_eq!(resp.message(), Some("Service temporarily unavailable: sentiment"));

        let resp = ApiResponse::Real(ResponseBody {
            status: 200,
            headers: Vec::new(),
            body: json!({"label": "neutral", "confidence": 0.0, "error": "connection reset"}),
        });
        assert!(resp.reports_error());

        let resp = ApiResponse::Real(ResponseBody {
            status: 200,
            headers: Vec::new(),
            body: json!({"provider": "gemini", "response": "ok", "error": false}),
        });
        assert!(!resp.reports_error());
    }
}
