//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use mentora_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mentora API",
        version = "0.1.0",
        description = "Learning-platform backend: learners, learning paths, lessons, quiz responses, and document ingestion via an external AI service. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Documents
        handlers::document_upload::upload_document,
        handlers::document_get::get_document,
        handlers::document_get::list_documents,
        handlers::document_delete::delete_document,
        handlers::document_download::get_download_url,
        // Learners
        handlers::learners::create_learner,
        handlers::learners::get_learner,
        handlers::learners::list_learners,
        handlers::learners::update_learner,
        // Learning paths and lessons
        handlers::learning_paths::create_learning_path,
        handlers::learning_paths::get_learning_path,
        handlers::learning_paths::list_learning_paths,
        handlers::lessons::create_lesson,
        handlers::lessons::list_lessons,
        // Quiz responses
        handlers::quiz_responses::create_quiz_response,
        handlers::quiz_responses::list_quiz_responses,
        // Tasks
        handlers::tasks::get_task,
        handlers::tasks::list_tasks,
        handlers::tasks::list_dead_lettered,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::document_upload::UploadDocumentResponse,
        handlers::document_download::DownloadUrlResponse,
        models::DocumentResponse,
        models::DocumentCategory,
        models::Learner,
        models::CreateLearnerRequest,
        models::UpdateLearnerRequest,
        models::LearningPath,
        models::CreateLearningPathRequest,
        models::Lesson,
        models::CreateLessonRequest,
        models::QuizResponse,
        models::CreateQuizResponseRequest,
        models::TaskResponse,
        models::TaskType,
        models::TaskStatus,
    )),
    tags(
        (name = "documents", description = "Document upload, retrieval, and processing"),
        (name = "learners", description = "Learner management"),
        (name = "learning-paths", description = "Learning path management"),
        (name = "lessons", description = "Lessons within learning paths"),
        (name = "quiz-responses", description = "Quiz response recording"),
        (name = "tasks", description = "Background task inspection")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
