//! Mentora Services Library
//!
//! Outbound service clients. Currently just the AI processing client used by
//! the document processing task handler.

pub mod ai_client;

pub use ai_client::{
    AiClientError, AiProcessingClient, AiServiceConfig, IngestionResult, ProcessDocumentRequest,
};
