pub mod document;
pub mod learner;
pub mod learning_path;
pub mod lesson;
pub mod quiz_response;
pub mod task;

pub use document::{Document, DocumentCategory, DocumentListQuery, DocumentResponse};
pub use learner::{CreateLearnerRequest, Learner, UpdateLearnerRequest};
pub use learning_path::{CreateLearningPathRequest, LearningPath};
pub use lesson::{CreateLessonRequest, Lesson};
pub use quiz_response::{CreateQuizResponseRequest, QuizResponse};
pub use task::{
    ProcessDocumentPayload, Task, TaskListQuery, TaskPayload, TaskResponse, TaskStatus, TaskType,
};
