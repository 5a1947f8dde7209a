use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// What kind of learning material a document is.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Lesson,
    Reference,
    Quiz,
    #[default]
    General,
}

impl Display for DocumentCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentCategory::Lesson => write!(f, "lesson"),
            DocumentCategory::Reference => write!(f, "reference"),
            DocumentCategory::Quiz => write!(f, "quiz"),
            DocumentCategory::General => write!(f, "general"),
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson" => Ok(DocumentCategory::Lesson),
            "reference" => Ok(DocumentCategory::Reference),
            "quiz" => Ok(DocumentCategory::Quiz),
            "general" => Ok(DocumentCategory::General),
            _ => Err(anyhow::anyhow!("Invalid document category: {}", s)),
        }
    }
}

/// A stored document and its processing state.
///
/// `processed = true` always goes together with a null `processing_error`;
/// a failed attempt leaves `processed = false`, `processed_at` stamped and
/// `processing_error` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub s3_bucket: String,
    pub s3_key: String,
    pub etag: Option<String>,
    pub file_size: Option<i64>,
    pub content_type: String,
    pub category: DocumentCategory,
    pub learner_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub processing_error: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Document {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Document {
            id: row.get("id"),
            filename: row.get("filename"),
            s3_bucket: row.get("s3_bucket"),
            s3_key: row.get("s3_key"),
            etag: row.get("etag"),
            file_size: row.get("file_size"),
            content_type: row.get("content_type"),
            category: row.get::<String, _>("category").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse category: {}", e).into())
            })?,
            learner_id: row.get("learner_id"),
            uploaded_by: row.get("uploaded_by"),
            processed: row.get("processed"),
            processed_at: row.get("processed_at"),
            processing_error: row.get("processing_error"),
            metadata: row.get("metadata"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

/// Response model for document endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub filename: String,
    pub s3_bucket: String,
    pub s3_key: String,
    pub file_size: Option<i64>,
    pub content_type: String,
    pub category: DocumentCategory,
    pub learner_id: Option<Uuid>,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub processing_error: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename,
            s3_bucket: doc.s3_bucket,
            s3_key: doc.s3_key,
            file_size: doc.file_size,
            content_type: doc.content_type,
            category: doc.category,
            learner_id: doc.learner_id,
            processed: doc.processed,
            processed_at: doc.processed_at,
            processing_error: doc.processing_error,
            metadata: doc.metadata,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DocumentListQuery {
    pub category: Option<DocumentCategory>,
    pub learner_id: Option<Uuid>,
    pub processed: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Default for DocumentListQuery {
    fn default() -> Self {
        Self {
            category: None,
            learner_id: None,
            processed: None,
            limit: Some(50),
            offset: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(DocumentCategory::Lesson.to_string(), "lesson");
        assert_eq!(DocumentCategory::Reference.to_string(), "reference");
        assert_eq!(DocumentCategory::Quiz.to_string(), "quiz");
        assert_eq!(DocumentCategory::General.to_string(), "general");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "lesson".parse::<DocumentCategory>().unwrap(),
            DocumentCategory::Lesson
        );
        assert_eq!(
            "general".parse::<DocumentCategory>().unwrap(),
            DocumentCategory::General
        );
        assert!("syllabus".parse::<DocumentCategory>().is_err());
    }

    #[test]
    fn test_category_default() {
        assert_eq!(DocumentCategory::default(), DocumentCategory::General);
    }

    #[test]
    fn test_category_roundtrips_through_display() {
        for cat in [
            DocumentCategory::Lesson,
            DocumentCategory::Reference,
            DocumentCategory::Quiz,
            DocumentCategory::General,
        ] {
            assert_eq!(cat.to_string().parse::<DocumentCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn test_response_from_document_hides_etag() {
        let doc = Document {
            id: Uuid::new_v4(),
            filename: "intro.pdf".to_string(),
            s3_bucket: "mentora-documents".to_string(),
            s3_key: "documents/abc/intro.pdf".to_string(),
            etag: Some("\"d41d8cd9\"".to_string()),
            file_size: Some(1024),
            content_type: "application/pdf".to_string(),
            category: DocumentCategory::Lesson,
            learner_id: None,
            uploaded_by: None,
            processed: false,
            processed_at: None,
            processing_error: None,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = DocumentResponse::from(doc.clone());
        assert_eq!(response.id, doc.id);
        assert_eq!(response.filename, "intro.pdf");
        assert_eq!(response.category, DocumentCategory::Lesson);
        assert!(!response.processed);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("etag").is_none());
    }
}
