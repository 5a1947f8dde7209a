//! AI processing service client
//!
//! Wraps the external AI service's `POST /api/v1/process-document` endpoint.
//! Response decoding is strict and fails closed: a success body missing any
//! of its counters is treated as unparsable rather than patched with
//! defaults. Transport failures are classified so the task handler can
//! decide what is worth retrying.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Settings for the AI processing client, injected explicitly.
#[derive(Debug, Clone)]
pub struct AiServiceConfig {
    /// Base URL of the AI service, e.g. "http://ai-service:8000".
    pub base_url: String,
    /// End-to-end deadline for one processing call.
    pub timeout: Duration,
}

/// Request body for a processing call.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessDocumentRequest {
    pub document_id: Uuid,
    pub s3_bucket: String,
    pub s3_key: String,
    pub content_type: String,
    pub filename: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Decoded outcome of a processing call that produced a well-formed body.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionResult {
    /// The service ingested the document.
    Completed {
        chunks_created: u64,
        embeddings_created: u64,
        processing_time_seconds: f64,
    },
    /// The service looked at the document and refused it.
    Rejected { message: String },
}

/// Errors from a processing call.
#[derive(Debug, Error)]
pub enum AiClientError {
    /// The body could not be decoded into a known shape.
    #[error("JSON parse error: {0}")]
    InvalidBody(String),

    /// HTTP 4xx from the service.
    #[error("{message}")]
    Client { status: u16, message: String },

    /// HTTP 5xx from the service.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The call hit its deadline.
    #[error("Connection timeout: {0}")]
    Timeout(String),

    /// The service could not be reached at all.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport failure.
    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Wire shape of the service's response body.
#[derive(Debug, Deserialize)]
struct RawProcessResponse {
    success: bool,
    chunks_created: Option<u64>,
    embeddings_created: Option<u64>,
    processing_time_seconds: Option<f64>,
    error: Option<String>,
}

/// Client for the AI processing service.
#[derive(Clone)]
pub struct AiProcessingClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AiProcessingClient {
    pub fn new(config: AiServiceConfig) -> Result<Self, AiClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiClientError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Ask the service to ingest one document. Exactly one request per call,
    /// no internal retries.
    #[tracing::instrument(skip(self, request), fields(document_id = %request.document_id))]
    pub async fn process_document(
        &self,
        request: &ProcessDocumentRequest,
    ) -> Result<IngestionResult, AiClientError> {
        let url = format!("{}/api/v1/process-document", self.base_url);

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AiClientError::Other(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(
            status = status,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "AI service responded"
        );

        decode_response(status, &body)
    }
}

fn classify_transport_error(err: reqwest::Error) -> AiClientError {
    if err.is_timeout() {
        AiClientError::Timeout(err.to_string())
    } else if err.is_connect() {
        AiClientError::Connect(err.to_string())
    } else {
        AiClientError::Other(err.to_string())
    }
}

/// Decode a status/body pair into a classified result.
///
/// Pure so the decoding rules are testable without a live service.
pub fn decode_response(status: u16, body: &str) -> Result<IngestionResult, AiClientError> {
    if (200..300).contains(&status) {
        return decode_success_body(body);
    }

    // Surface the body's error field verbatim when it is present; the
    // rejection detail matters more than the status line.
    let message = extract_error_field(body)
        .unwrap_or_else(|| format!("AI service error (HTTP {}): {}", status, truncate(body, 200)));

    if (400..500).contains(&status) {
        Err(AiClientError::Client { status, message })
    } else {
        Err(AiClientError::Server { status, message })
    }
}

fn decode_success_body(body: &str) -> Result<IngestionResult, AiClientError> {
    let raw: RawProcessResponse = serde_json::from_str(body)
        .map_err(|e| AiClientError::InvalidBody(e.to_string()))?;

    if raw.success {
        match (
            raw.chunks_created,
            raw.embeddings_created,
            raw.processing_time_seconds,
        ) {
            (Some(chunks_created), Some(embeddings_created), Some(processing_time_seconds)) => {
                Ok(IngestionResult::Completed {
                    chunks_created,
                    embeddings_created,
                    processing_time_seconds,
                })
            }
            _ => Err(AiClientError::InvalidBody(
                "success response missing ingestion counters".to_string(),
            )),
        }
    } else {
        Ok(IngestionResult::Rejected {
            message: raw
                .error
                .unwrap_or_else(|| "Processing failed without error detail".to_string()),
        })
    }
}

fn extract_error_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|v| v.as_str())
        .map(String::from)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_with_counters() {
        let body = r#"{
            "success": true,
            "chunks_created": 25,
            "embeddings_created": 25,
            "processing_time_seconds": 12.5
        }"#;

        let result = decode_response(200, body).unwrap();
        assert_eq!(
            result,
            IngestionResult::Completed {
                chunks_created: 25,
                embeddings_created: 25,
                processing_time_seconds: 12.5,
            }
        );
    }

    #[test]
    fn test_decode_rejection_with_error_message() {
        let body = r#"{"success": false, "error": "Unsupported language"}"#;

        let result = decode_response(200, body).unwrap();
        assert_eq!(
            result,
            IngestionResult::Rejected {
                message: "Unsupported language".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_rejection_without_error_falls_back() {
        let body = r#"{"success": false}"#;

        let result = decode_response(200, body).unwrap();
        assert_eq!(
            result,
            IngestionResult::Rejected {
                message: "Processing failed without error detail".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_malformed_body_is_parse_error() {
        let err = decode_response(200, "not json at all").unwrap_err();
        assert!(matches!(err, AiClientError::InvalidBody(_)));
        assert!(err.to_string().starts_with("JSON parse error: "));
    }

    #[test]
    fn test_decode_success_missing_counters_fails_closed() {
        let body = r#"{"success": true}"#;
        let err = decode_response(200, body).unwrap_err();
        assert!(matches!(err, AiClientError::InvalidBody(_)));
        assert!(err.to_string().contains("missing ingestion counters"));
    }

    #[test]
    fn test_decode_422_surfaces_body_error_verbatim() {
        let body = r#"{"success": false, "error": "Invalid file format: corrupted PDF"}"#;
        let err = decode_response(422, body).unwrap_err();
        match err {
            AiClientError::Client { status, ref message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Invalid file format: corrupted PDF");
            }
            other => panic!("expected client error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_4xx_without_error_field() {
        let err = decode_response(404, "not found").unwrap_err();
        match err {
            AiClientError::Client { status, ref message } => {
                assert_eq!(status, 404);
                assert!(message.contains("HTTP 404"));
            }
            other => panic!("expected client error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_5xx_is_server_error() {
        let err = decode_response(503, r#"{"error": "overloaded"}"#).unwrap_err();
        match err {
            AiClientError::Server { status, ref message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_error_message_prefix() {
        let err = AiClientError::Timeout("deadline exceeded".to_string());
        assert_eq!(err.to_string(), "Connection timeout: deadline exceeded");
    }

    #[test]
    fn test_connect_error_message_prefix() {
        let err = AiClientError::Connect("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_request_omits_empty_metadata() {
        let request = ProcessDocumentRequest {
            document_id: Uuid::new_v4(),
            s3_bucket: "mentora-documents".to_string(),
            s3_key: "documents/x/a.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            filename: "a.pdf".to_string(),
            category: "lesson".to_string(),
            metadata: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("metadata").is_none());
        assert_eq!(json["category"], "lesson");
    }
}
