//! Document processing error taxonomy
//!
//! Classified outcomes of a single document processing attempt. The retryable
//! bit decides whether the task queue schedules another attempt or fails the
//! task immediately.

/// Outcome classification for a failed document processing attempt.
#[derive(Debug, thiserror::Error)]
pub enum DocumentProcessingError {
    /// The document row does not exist.
    #[error("Document not found: {0}")]
    NotFound(uuid::Uuid),

    /// The processing service looked at the document and said no.
    #[error("{0}")]
    ProcessingRejected(String),

    /// The processing service returned a body we could not decode.
    #[error("{0}")]
    InvalidResponse(String),

    /// The processing service failed server-side (HTTP 5xx).
    #[error("{0}")]
    RetryableServiceError(String),

    /// The processing service could not be reached (timeout or connect failure).
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Anything else.
    #[error("{0}")]
    InternalError(String),
}

impl DocumentProcessingError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DocumentProcessingError::NotFound(_) => false,
            DocumentProcessingError::ProcessingRejected(_) => false,
            DocumentProcessingError::InvalidResponse(_) => false,
            DocumentProcessingError::RetryableServiceError(_) => true,
            DocumentProcessingError::ServiceUnavailable(_) => true,
            DocumentProcessingError::InternalError(_) => true,
        }
    }

    /// Message persisted on the document row for this failure.
    pub fn document_error_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_errors_are_not_retryable() {
        assert!(!DocumentProcessingError::NotFound(uuid::Uuid::new_v4()).is_retryable());
        assert!(
            !DocumentProcessingError::ProcessingRejected("Invalid file format".into())
                .is_retryable()
        );
        assert!(
            !DocumentProcessingError::InvalidResponse("JSON parse error: eof".into())
                .is_retryable()
        );
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(
            DocumentProcessingError::RetryableServiceError("AI service error (HTTP 503)".into())
                .is_retryable()
        );
        assert!(
            DocumentProcessingError::ServiceUnavailable("Connection timeout: deadline".into())
                .is_retryable()
        );
        assert!(DocumentProcessingError::InternalError("Unexpected error: x".into())
            .is_retryable());
    }

    #[test]
    fn test_document_error_message_passthrough() {
        let err = DocumentProcessingError::ProcessingRejected(
            "Invalid file format: corrupted PDF".to_string(),
        );
        assert_eq!(
            err.document_error_message(),
            "Invalid file format: corrupted PDF"
        );
    }
}
