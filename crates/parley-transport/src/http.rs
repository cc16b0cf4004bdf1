//! HTTP transport for OpenAI-compatible `/chat/completions` endpoints.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use parley_core::config::ApiConfig;
use parley_core::types::{ChatRequest, ChatResponse};

use crate::traits::{ChatTransport, TransportError};

// ─────────────────────────────────────────────
// HttpTransport
// ─────────────────────────────────────────────

/// Talks to one configured OpenAI-compatible HTTP endpoint.
pub struct HttpTransport {
    /// HTTP client (shared, connection-pooled, bounded timeout).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Cached `{api_base}/chat/completions`.
    url: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from the api section of the config.
    ///
    /// Returns `Err` only when the underlying HTTP client can't be
    /// constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_base = config.api_base.trim_end_matches('/').to_string();
        let url = format!("{}/chat/completions", api_base);

        Ok(HttpTransport {
            client,
            api_base,
            api_key: config.api_key.clone(),
            extra_headers,
            url,
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            warn!(status = %status, body = %body, "API error");
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let chat_resp: ChatResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        debug!(
            choices = chat_resp.choices.len(),
            usage = ?chat_resp.usage,
            "chat completion response received"
        );
        Ok(chat_resp)
    }

    fn endpoint(&self) -> &str {
        &self.api_base
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::{Message, ToolDefinition};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: &str) -> ApiConfig {
        ApiConfig {
            api_key: api_key.to_string(),
            api_base: api_base.to_string(),
            timeout_secs: 10,
            extra_headers: None,
        }
    }

    fn simple_request(model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![Message::system("Be brief."), Message::user("Hello")],
            max_completion_tokens: Some(8096),
            tools: None,
            tool_choice: None,
            audio: None,
            modalities: None,
        }
    }

    #[test]
    fn url_handles_trailing_slash() {
        let config = make_config("key", "https://api.openai.com/v1/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(transport.endpoint(), "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn send_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": {
                        "content": "Hello! How can I help?",
                        "tool_calls": null
                    },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 5,
                    "total_tokens": 15
                }
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("test-key-123", &mock_server.uri());
        let transport = HttpTransport::new(&config).unwrap();

        let resp = transport.send(&simple_request("o3-mini")).await.unwrap();

        let msg = resp.message().unwrap();
        assert_eq!(msg.content.as_deref(), Some("Hello! How can I help?"));
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn send_with_tool_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-tools",
                "choices": [{
                    "message": {
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc123",
                            "type": "function",
                            "function": {
                                "name": "terminal",
                                "arguments": "{\"command\": \"uname -a\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", &mock_server.uri());
        let transport = HttpTransport::new(&config).unwrap();

        let mut request = simple_request("o3-mini");
        request.tools = Some(vec![ToolDefinition::new(
            "terminal",
            "Run a shell command",
            serde_json::json!({"type": "object", "properties": {"command": {"type": "string"}}}),
        )]);
        request.tool_choice = Some("auto".to_string());

        let resp = transport.send(&request).await.unwrap();
        let msg = resp.into_message().unwrap();

        let calls = msg.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "terminal");
        assert_eq!(calls[0].id, "call_abc123");
    }

    #[tokio::test]
    async fn send_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit exceeded",
                    "type": "rate_limit_error"
                }
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", &mock_server.uri());
        let transport = HttpTransport::new(&config).unwrap();

        let err = transport.send(&simple_request("o3-mini")).await.unwrap_err();
        match err {
            TransportError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit exceeded"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_network_error() {
        // Port that's not listening.
        let config = make_config("key", "http://127.0.0.1:1");
        let transport = HttpTransport::new(&config).unwrap();

        let err = transport.send(&simple_request("o3-mini")).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }

    #[tokio::test]
    async fn send_undecodable_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&mock_server)
            .await;

        let config = make_config("key", &mock_server.uri());
        let transport = HttpTransport::new(&config).unwrap();

        let err = transport.send(&simple_request("o3-mini")).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn send_correct_body_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-audio-preview",
                "max_completion_tokens": 8096,
                "audio": { "voice": "alloy", "format": "wav" },
                "modalities": ["text"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-body",
                "choices": [{
                    "message": { "content": "ok" },
                    "finish_reason": "stop"
                }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let config = make_config("key", &mock_server.uri());
        let transport = HttpTransport::new(&config).unwrap();

        let mut request = simple_request("gpt-4o-audio-preview");
        request.audio = Some(parley_core::types::AudioParams {
            voice: "alloy".into(),
            format: "wav".into(),
        });
        request.modalities = Some(vec!["text".into()]);

        // If the body matcher fails, wiremock returns 404 → Api error.
        let resp = transport.send(&request).await.unwrap();
        assert_eq!(resp.message().unwrap().content.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn extra_headers_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("X-App-Code", "parley-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-hdr",
                "choices": [{
                    "message": { "content": "ok" },
                    "finish_reason": "stop"
                }],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let mut headers = std::collections::HashMap::new();
        headers.insert("X-App-Code".to_string(), "parley-test".to_string());
        let config = ApiConfig {
            api_key: "key".to_string(),
            api_base: mock_server.uri(),
            timeout_secs: 10,
            extra_headers: Some(headers),
        };
        let transport = HttpTransport::new(&config).unwrap();

        let resp = transport.send(&simple_request("o3-mini")).await.unwrap();
        assert_eq!(resp.message().unwrap().content.as_deref(), Some("ok"));
    }
}
