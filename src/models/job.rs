use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status of an inference job as tracked by the lifecycle engine.
///
/// `Completed` and `Failed` are terminal: once a job reaches either, no
/// later status snapshot may move it again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Kind of input artifact a job runs against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputKind {
    Video,
    Skeleton,
}

/// Reference to an uploaded artifact, identified by the backend-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputReference {
    pub id: String,
    pub kind: InputKind,
}

impl InputReference {
    pub fn video(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: InputKind::Video,
        }
    }

    pub fn skeleton(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: InputKind::Skeleton,
        }
    }
}

/// One inference request, from creation to a terminal outcome.
///
/// Identity fields (`job_id`, `input_id`, `input_type`, `behavior_id`,
/// `created_at`) are fixed at creation; the remaining fields are replaced
/// wholesale by each status snapshot the engine merges in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub input_id: String,
    pub input_type: InputKind,
    pub behavior_id: String,
    pub status: JobStatus,
    /// Advisory 0-100 figure from the backend; not assumed monotonic.
    pub progress: f64,
    pub message: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(job_id: impl Into<String>, input: &InputReference, behavior_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            input_id: input.id.clone(),
            input_type: input.kind,
            behavior_id: behavior_id.into(),
            status: JobStatus::Pending,
            progress: 0.0,
            message: String::new(),
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Merge one status snapshot into the record.
    ///
    /// Replaces `status`, `progress`, `message`, and `error`; `created_at`
    /// is untouched and `completed_at` is stamped the first time the job is
    /// seen completed.
    pub fn merge_status(&mut self, status: JobStatus, payload: &JobStatusPayload) {
        self.status = status;
        self.progress = payload.progress;
        self.message = payload.message.clone();
        self.error = payload.error.clone();
        if status == JobStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }
}

/// Wire payload returned by `GET /api/jobs/{id}`.
///
/// `status` is carried as the raw string; the engine parses and validates
/// it, so an unrecognized value from the backend is the caller's problem,
/// not a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusPayload {
    pub status: String,
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobStatusPayload {
    pub fn parsed_status(&self) -> Option<JobStatus> {
        self.status.parse().ok()
    }
}
