use serde::{Deserialize, Serialize};

/// Finalized outcome of a completed inference job.
///
/// Built by the result translator from the backend's raw payload; immutable
/// once constructed and cleared whenever the owning job is retired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub behavior_id: String,
    /// TGMD-3 rubric level: 0 emerging, 1 developing, 2 mature.
    pub pred: u8,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub rubric_text: String,
    pub rubric_text_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_end: Option<f64>,
}

/// Wire shape of one prediction inside a results payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub behavior_id: String,
    pub pred: u8,
    pub confidence: f64,
    #[serde(default)]
    pub rubric_text: String,
    #[serde(default)]
    pub rubric_text_es: String,
    #[serde(default)]
    pub segment_start: Option<f64>,
    #[serde(default)]
    pub segment_end: Option<f64>,
}

/// Wire shape of the metadata block attached to job results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub model_version: String,
    pub input_hash: String,
    pub processed_at: String,
}

/// Wire payload returned by `GET /api/jobs/{id}/results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResultsPayload {
    pub job_id: String,
    pub input_id: String,
    pub input_type: String,
    pub behavior_id: String,
    pub prediction: PredictionPayload,
    #[serde(default)]
    pub metadata: Option<ResultMetadata>,
}

/// Alternate results shape produced by the batch (multi-behavior) endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResultsPayload {
    pub job_id: String,
    pub input_id: String,
    pub input_type: String,
    pub predictions: Vec<PredictionPayload>,
    #[serde(default)]
    pub metadata: Option<ResultMetadata>,
}
