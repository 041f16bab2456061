//! Wire-to-domain translation for finished inference results.
//!
//! Pure functions with no network access or mutable state. Behavior
//! metadata comes from the static rubric table; when the backend omits
//! rubric text the table entry for `(behavior_id, pred)` is substituted.
//! An unknown behavior id leaves the derived fields empty so consumers can
//! render "unknown behavior" instead of failing.

use crate::models::prediction::{BatchResultsPayload, JobResultsPayload, Prediction, PredictionPayload};
use crate::services::rubric;

/// Translate a single-behavior results payload into the domain model.
pub fn translate(raw: &JobResultsPayload) -> Prediction {
    translate_prediction(&raw.prediction)
}

/// Translate the batch results shape, applying the same mapping per element.
pub fn translate_batch(raw: &BatchResultsPayload) -> Vec<Prediction> {
    raw.predictions.iter().map(translate_prediction).collect()
}

/// Translate one wire prediction object.
pub fn translate_prediction(payload: &PredictionPayload) -> Prediction {
    let rubric_text = if payload.rubric_text.is_empty() {
        rubric::rubric_label(&payload.behavior_id, payload.pred)
            .unwrap_or_default()
            .to_string()
    } else {
        payload.rubric_text.clone()
    };

    let rubric_text_es = if payload.rubric_text_es.is_empty() {
        rubric::rubric_label_es(&payload.behavior_id, payload.pred)
            .unwrap_or_default()
            .to_string()
    } else {
        payload.rubric_text_es.clone()
    };

    Prediction {
        behavior_id: payload.behavior_id.clone(),
        pred: payload.pred,
        confidence: payload.confidence,
        rubric_text,
        rubric_text_es,
        segment_start: payload.segment_start,
        segment_end: payload.segment_end,
    }
}
