//! Shared request plumbing.

use arcana_core::config::BackendSettings;
use arcana_core::error::{ArcanaError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Client of the backend functions endpoint.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client for `settings.base_url`.
    ///
    /// Without a configured timeout the reqwest default applies.
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ArcanaError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &settings.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function.trim_start_matches('/'))
    }

    /// POSTs `body` as JSON and parses the JSON reply.
    pub(crate) async fn post_json<B, R>(&self, function: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.endpoint(function)).json(body);
        self.send_request(function, request).await
    }

    /// GETs `function` with `query` parameters and parses the JSON reply.
    pub(crate) async fn get_json<R>(&self, function: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request = self.client.get(self.endpoint(function)).query(query);
        self.send_request(function, request).await
    }

    async fn send_request<R>(&self, function: &str, request: RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        tracing::debug!(function, "backend request");
        let response = request.send().await.map_err(|err| {
            let kind = if err.is_timeout() {
                "timed out"
            } else if err.is_connect() {
                "could not connect"
            } else {
                "failed"
            };
            ArcanaError::network(None, format!("Request to {function} {kind}: {err}"))
        })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|err| ArcanaError::network(Some(status.as_u16()), format!("Failed to read {function} response: {err}")))?;

        if !status.is_success() {
            tracing::warn!(function, status = status.as_u16(), "backend returned an error status");
            return Err(map_http_error(status, &body_text));
        }

        serde_json::from_str(&body_text).map_err(|err| {
            ArcanaError::network(
                Some(status.as_u16()),
                format!("Malformed {function} response: {err}"),
            )
        })
    }
}

/// Turns a non-2xx reply into an error, preferring the backend's own message.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ArcanaError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| error_message(&value))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });
    ArcanaError::network(Some(status.as_u16()), message)
}

/// `error` or `message` field of a JSON reply.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Interprets `{success, message, error}` acknowledgements.
///
/// An explicit `success: false` or an `error` field is a refusal; anything
/// else returned with a 2xx status is accepted.
pub(crate) fn extract_ack(value: &Value, fallback: &str) -> Result<String> {
    let refused = value.get("success").and_then(Value::as_bool) == Some(false)
        || value.get("error").is_some_and(|e| !e.is_null());
    if refused {
        return Err(ArcanaError::backend(
            error_message(value).unwrap_or_else(|| fallback.to_string()),
        ));
    }
    Ok(value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("OK")
        .to_string())
}

/// Reads a JSON number or numeric string as a decimal amount.
pub(crate) fn decimal_field(value: &Value, field: &str) -> Option<rust_decimal::Decimal> {
    match value.get(field)? {
        Value::Number(n) => n
            .as_i64()
            .map(rust_decimal::Decimal::from)
            .or_else(|| n.as_f64().and_then(|f| rust_decimal::Decimal::try_from(f).ok())),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn test_endpoint_joining() {
        let client = BackendClient::with_client(Client::new(), "https://example.com/fns/");
        assert_eq!(client.endpoint("login"), "https://example.com/fns/login");
        assert_eq!(client.endpoint("/tarot-bot"), "https://example.com/fns/tarot-bot");
    }

    #[test]
    fn test_map_http_error_prefers_backend_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials."}"#,
        );
        assert!(matches!(
            err,
            ArcanaError::Network { status: Some(401), ref message } if message == "Invalid credentials."
        ));

        let err = map_http_error(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ArcanaError::Network { ref message, .. } if message == "Bad Gateway"));
    }

    #[test]
    fn test_extract_ack() {
        assert_eq!(
            extract_ack(&json!({"success": true, "message": "Code sent"}), "x").unwrap(),
            "Code sent"
        );
        assert_eq!(extract_ack(&json!({}), "x").unwrap(), "OK");

        let refused = extract_ack(&json!({"success": false}), "Signup failed").unwrap_err();
        assert!(matches!(refused, ArcanaError::Backend(ref m) if m == "Signup failed"));

        let refused = extract_ack(&json!({"error": "Email taken"}), "x").unwrap_err();
        assert!(matches!(refused, ArcanaError::Backend(ref m) if m == "Email taken"));
    }

    #[test]
    fn test_decimal_field_accepts_numbers_and_strings() {
        let value = json!({"a": 4, "b": 10.5, "c": "30.00", "d": null});
        assert_eq!(decimal_field(&value, "a"), Some(Decimal::from(4)));
        assert_eq!(decimal_field(&value, "b"), Some(Decimal::new(105, 1)));
        assert_eq!(decimal_field(&value, "c"), Some(Decimal::new(3000, 2)));
        assert_eq!(decimal_field(&value, "d"), None);
        assert_eq!(decimal_field(&value, "missing"), None);
    }
}
