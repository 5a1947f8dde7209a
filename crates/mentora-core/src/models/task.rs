use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ProcessDocument,
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TaskType::ProcessDocument => write!(f, "process_document"),
        }
    }
}

impl FromStr for TaskType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "process_document" => Ok(TaskType::ProcessDocument),
            _ => Err(anyhow::anyhow!("Invalid task type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Scheduled,
    /// Retries exhausted; parked for manual review.
    DeadLettered,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Scheduled => write!(f, "scheduled"),
            TaskStatus::DeadLettered => write!(f, "dead_lettered"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            "scheduled" => Ok(TaskStatus::Scheduled),
            "dead_lettered" => Ok(TaskStatus::DeadLettered),
            _ => Err(anyhow::anyhow!("Invalid task status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub payload: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub timeout_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Task {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Task {
            id: row.get("id"),
            task_type: row.get::<String, _>("task_type").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse task_type: {}", e).into())
            })?,
            status: row.get::<String, _>("status").parse().map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse status: {}", e).into())
            })?,
            payload: row.get("payload"),
            result: row.get("result"),
            scheduled_at: row.get("scheduled_at"),
            started_at: row.get("started_at"),
            completed_at: row.get("completed_at"),
            retry_count: row.get("retry_count"),
            max_retries: row.get("max_retries"),
            timeout_seconds: row.get("timeout_seconds"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

impl Task {
    pub fn is_ready_to_run(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::Scheduled)
            && self.scheduled_at <= Utc::now()
    }

    /// Whether another attempt is allowed after the current one fails.
    ///
    /// `retry_count` counts attempts already consumed before the current one;
    /// `max_retries` bounds total attempts, so a failing attempt may retry
    /// only while `retry_count + 1 < max_retries`.
    pub fn can_retry(&self) -> bool {
        self.retry_count + 1 < self.max_retries
    }

    /// Extract the payload as a typed struct, returning an error on failure.
    pub fn try_payload_as<P: TaskPayload>(&self) -> Result<P, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// Create a payload value from a typed struct.
    pub fn payload_from<P: TaskPayload>(payload: &P) -> serde_json::Value {
        serde_json::to_value(payload).unwrap_or_default()
    }
}

/// Trait for type-safe task payloads
pub trait TaskPayload: Serialize + for<'de> Deserialize<'de> {
    fn task_type() -> TaskType;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDocumentPayload {
    pub document_id: Uuid,
}

impl TaskPayload for ProcessDocumentPayload {
    fn task_type() -> TaskType {
        TaskType::ProcessDocument
    }
}

/// Response model for task endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub payload: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            task_type: task.task_type,
            status: task.status,
            payload: task.payload,
            result: task.result,
            scheduled_at: task.scheduled_at,
            started_at: task.started_at,
            completed_at: task.completed_at,
            retry_count: task.retry_count,
            max_retries: task.max_retries,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: Some(50),
            offset: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(status: TaskStatus, retry_count: i32) -> Task {
        Task {
            id: Uuid::new_v4(),
            task_type: TaskType::ProcessDocument,
            status,
            payload: serde_json::json!({"document_id": Uuid::new_v4()}),
            result: None,
            scheduled_at: Utc::now() - chrono::Duration::seconds(10),
            started_at: None,
            completed_at: None,
            retry_count,
            max_retries: 3,
            timeout_seconds: Some(360),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_type_roundtrip() {
        assert_eq!(TaskType::ProcessDocument.to_string(), "process_document");
        assert_eq!(
            "process_document".parse::<TaskType>().unwrap(),
            TaskType::ProcessDocument
        );
        assert!("video_transcode".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_task_status_roundtrip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
            TaskStatus::Scheduled,
            TaskStatus::DeadLettered,
        ] {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_dead_lettered_spelling() {
        assert_eq!(TaskStatus::DeadLettered.to_string(), "dead_lettered");
    }

    #[test]
    fn test_is_ready_to_run() {
        assert!(sample_task(TaskStatus::Pending, 0).is_ready_to_run());
        assert!(sample_task(TaskStatus::Scheduled, 1).is_ready_to_run());
        assert!(!sample_task(TaskStatus::Running, 0).is_ready_to_run());
        assert!(!sample_task(TaskStatus::DeadLettered, 3).is_ready_to_run());
    }

    #[test]
    fn test_is_not_ready_when_scheduled_in_future() {
        let mut task = sample_task(TaskStatus::Scheduled, 1);
        task.scheduled_at = Utc::now() + chrono::Duration::seconds(3600);
        assert!(!task.is_ready_to_run());
    }

    #[test]
    fn test_can_retry_bounds_total_attempts() {
        // max_retries = 3 means three attempts total: the first failure and
        // the first retry may reschedule, the third attempt may not.
        assert!(sample_task(TaskStatus::Failed, 0).can_retry());
        assert!(sample_task(TaskStatus::Failed, 1).can_retry());
        assert!(!sample_task(TaskStatus::Failed, 2).can_retry());
        assert!(!sample_task(TaskStatus::Failed, 5).can_retry());
    }

    #[test]
    fn test_typed_payload_roundtrip() {
        let document_id = Uuid::new_v4();
        let payload = ProcessDocumentPayload { document_id };
        let mut task = sample_task(TaskStatus::Pending, 0);
        task.payload = Task::payload_from(&payload);

        let decoded: ProcessDocumentPayload = task.try_payload_as().unwrap();
        assert_eq!(decoded.document_id, document_id);
    }

    #[test]
    fn test_try_payload_as_rejects_wrong_shape() {
        let mut task = sample_task(TaskStatus::Pending, 0);
        task.payload = serde_json::json!({"video_id": "not-a-document"});
        assert!(task.try_payload_as::<ProcessDocumentPayload>().is_err());
    }

    #[test]
    fn test_task_response_from_task() {
        let task = sample_task(TaskStatus::Pending, 0);
        let id = task.id;
        let payload = task.payload.clone();

        let response = TaskResponse::from(task);
        assert_eq!(response.id, id);
        assert_eq!(response.task_type, TaskType::ProcessDocument);
        assert_eq!(response.status, TaskStatus::Pending);
        assert_eq!(response.payload, payload);
        assert_eq!(response.max_retries, 3);
    }
}
