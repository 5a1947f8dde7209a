//! HTTP request handlers

pub mod document_delete;
pub mod document_download;
pub mod document_get;
pub mod document_upload;
pub mod learners;
pub mod learning_paths;
pub mod lessons;
pub mod quiz_responses;
pub mod tasks;
