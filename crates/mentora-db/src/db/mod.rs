pub mod document;
pub mod learner;
pub mod learning_path;
pub mod lesson;
pub mod quiz_response;
pub mod task;
