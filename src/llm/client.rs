//! Generation client for the Gemini API
//!
//! The retry contract is an explicit bounded state machine: a pure
//! classification step maps each reply to success, transient or fatal, and
//! the loop sleeps an exponentially growing delay between transient failures.
//! The HTTP transport sits behind a trait so the machine is testable without
//! a network.

use crate::config::Config;
use crate::error::SyncError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One documentation generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output size cap
    pub max_output_tokens: u32,
}

// Gemini wire types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Status and body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Transport seam: one network attempt per call
///
/// `Err` carries a transport-level failure (connect, timeout), which is
/// always classified as transient.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: &str) -> Result<HttpReply, String>;
}

/// Production transport POSTing to the Gemini generateContent endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(model: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
                model, api_key
            ),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: &str) -> Result<HttpReply, String> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;

        Ok(HttpReply { status, body })
    }
}

/// Classification of one attempt
#[derive(Debug)]
enum Disposition {
    /// Usable generated text
    Success(String),
    /// Worth retrying if attempts remain
    Transient(String),
    /// Retrying would not help
    Fatal(SyncError),
}

/// Map a reply to its disposition
///
/// 4xx other than 429 is a client error; 429 and everything at or above 500
/// is transient; a 2xx reply without generated text is invalid regardless of
/// the status the service reported.
fn classify(reply: &HttpReply) -> Disposition {
    match reply.status {
        200..=299 => match extract_text(&reply.body) {
            Some(text) if !text.trim().is_empty() => Disposition::Success(text),
            _ => Disposition::Fatal(SyncError::InvalidResponse),
        },
        429 => Disposition::Transient(format!("status 429: {}", reply.body)),
        400..=499 => Disposition::Fatal(SyncError::Client {
            status: reply.status,
            message: reply.body.clone(),
        }),
        status => Disposition::Transient(format!("status {}: {}", status, reply.body)),
    }
}

/// Generated text at `candidates[0].content.parts[0].text`, when present
fn extract_text(body: &str) -> Option<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body).ok()?;
    let candidate = parsed.candidates.into_iter().next()?;
    let part = candidate.content?.parts.into_iter().next()?;
    Some(part.text)
}

/// Delay before retrying failed attempt `attempt` (1-based)
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

/// Issues generation requests under the retry policy
pub struct GenerationClient<T: Transport = HttpTransport> {
    transport: T,
    max_attempts: u32,
    base_delay: Duration,
}

impl GenerationClient<HttpTransport> {
    /// Build the production client; fails before any network call when the
    /// credential is missing
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let api_key = config.api_key.as_deref().ok_or(SyncError::MissingCredential)?;

        Ok(Self::with_transport(
            HttpTransport::new(&config.model, api_key),
            config.max_attempts,
            config.base_delay(),
        ))
    }
}

impl<T: Transport> GenerationClient<T> {
    /// Build a client over any transport
    pub fn with_transport(transport: T, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            transport,
            max_attempts,
            base_delay,
        }
    }

    /// Run one generation request to completion under the retry policy
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, SyncError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        };
        let body = serde_json::to_string(&body).map_err(|e| SyncError::Client {
            status: 0,
            message: format!("failed to encode request: {}", e),
        })?;

        let mut last_cause = String::new();

        for attempt in 1..=self.max_attempts {
            let disposition = match self.transport.send(&body).await {
                Ok(reply) => classify(&reply),
                Err(cause) => Disposition::Transient(format!("transport: {}", cause)),
            };

            match disposition {
                Disposition::Success(text) => return Ok(text),
                Disposition::Fatal(err) => return Err(err),
                Disposition::Transient(cause) => {
                    last_cause = cause;
                    if attempt < self.max_attempts {
                        let delay = backoff_delay(self.base_delay, attempt);
                        tracing::warn!(
                            "generation attempt {} failed ({}), retrying in {:?}",
                            attempt,
                            last_cause,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(SyncError::RetriesExhausted {
            attempts: self.max_attempts,
            cause: last_cause,
        })
    }
}

/// Scripted transport for testing: replays a fixed sequence of replies
pub struct ScriptedTransport {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<HttpReply, String>>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl ScriptedTransport {
    /// Create a transport replaying the given replies in order
    pub fn new(replies: Vec<Result<HttpReply, String>>) -> Self {
        Self {
            replies: std::sync::Mutex::new(replies.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of attempts made so far
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _body: &str) -> Result<HttpReply, String> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
    }
}

/// A well-formed success body carrying the given text
pub fn success_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "Document add".to_string(),
            temperature: 0.3,
            max_output_tokens: 1024,
        }
    }

    fn client(transport: ScriptedTransport) -> GenerationClient<ScriptedTransport> {
        GenerationClient::with_transport(transport, 3, Duration::from_millis(1))
    }

    fn ok_reply(text: &str) -> Result<HttpReply, String> {
        Ok(HttpReply {
            status: 200,
            body: success_body(text),
        })
    }

    fn status_reply(status: u16) -> Result<HttpReply, String> {
        Ok(HttpReply {
            status,
            body: "{}".to_string(),
        })
    }

    #[tokio::test]
    async fn test_rate_limited_twice_then_succeeds() {
        let client = client(ScriptedTransport::new(vec![
            status_reply(429),
            status_reply(429),
            ok_reply("Generated docs."),
        ]));

        let text = client.generate(&request()).await.unwrap();
        assert_eq!(text, "Generated docs.");
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_client_error_never_retries() {
        let client = client(ScriptedTransport::new(vec![
            status_reply(400),
            ok_reply("never reached"),
        ]));

        let err = client.generate(&request()).await.unwrap_err();
        match err {
            SyncError::Client { status, .. } => assert_eq!(status, 400),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let client = client(ScriptedTransport::new(vec![
            status_reply(503),
            status_reply(503),
            status_reply(503),
        ]));

        let err = client.generate(&request()).await.unwrap_err();
        match err {
            SyncError::RetriesExhausted { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(cause.contains("503"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_success_is_invalid_response() {
        let client = client(ScriptedTransport::new(vec![Ok(HttpReply {
            status: 200,
            body: "{\"candidates\":[]}".to_string(),
        })]));

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidResponse));
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_transient() {
        let client = client(ScriptedTransport::new(vec![
            Err("connection refused".to_string()),
            ok_reply("recovered"),
        ]));

        let text = client.generate(&request()).await.unwrap();
        assert_eq!(text, "recovered");
        assert_eq!(client.transport.calls(), 2);
    }

    #[test]
    fn test_missing_credential_fails_before_network() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(matches!(
            GenerationClient::new(&config),
            Err(SyncError::MissingCredential)
        ));
    }

    #[test]
    fn test_backoff_schedule_is_exponential() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(4000));
    }

    #[test]
    fn test_classification_table() {
        let success = HttpReply {
            status: 200,
            body: success_body("hi"),
        };
        assert!(matches!(classify(&success), Disposition::Success(_)));

        let empty_text = HttpReply {
            status: 200,
            body: success_body("   "),
        };
        assert!(matches!(
            classify(&empty_text),
            Disposition::Fatal(SyncError::InvalidResponse)
        ));

        let rate_limited = HttpReply {
            status: 429,
            body: String::new(),
        };
        assert!(matches!(classify(&rate_limited), Disposition::Transient(_)));

        let not_found = HttpReply {
            status: 404,
            body: String::new(),
        };
        assert!(matches!(
            classify(&not_found),
            Disposition::Fatal(SyncError::Client { status: 404, .. })
        ));

        let unavailable = HttpReply {
            status: 500,
            body: String::new(),
        };
        assert!(matches!(classify(&unavailable), Disposition::Transient(_)));
    }

    #[test]
    fn test_request_wire_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "prompt".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 1024,
            },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1024);
    }
}
