//! In-process mock of the inference backend HTTP contract.
//!
//! Lifecycle tests script the status sequence a job reports, inject
//! backend failures, and observe how often each endpoint was hit.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// One scripted reply for `GET /api/jobs/{id}`.
#[derive(Debug, Clone)]
pub enum StatusStep {
    /// Reply 200 with this status body.
    Reply(Value),
    /// Reply 500 with a `{detail}` body (a transient backend error).
    ServerError,
    /// Sleep first, then reply; creates a deliberately in-flight response.
    Delayed(Duration, Value),
}

#[derive(Default)]
struct MockState {
    /// Job ids handed out by `POST /api/infer`, in order. When exhausted,
    /// ids are generated as `job-<n>`.
    job_ids: Vec<String>,
    next_job: usize,
    created: Vec<Value>,
    create_failures: u32,
    /// Scripted status replies per job id; the last step repeats forever.
    statuses: HashMap<String, Vec<StatusStep>>,
    status_cursor: HashMap<String, usize>,
    status_hits: HashMap<String, u64>,
    results: HashMap<String, Value>,
    results_failures: u32,
    skeleton_uploads: Vec<Value>,
}

/// Scriptable stand-in for the inference backend, listening on a random
/// local port.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

type Shared = Arc<Mutex<MockState>>;

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/behaviors", get(behaviors))
            .route("/api/videos", post(upload_video))
            .route("/api/skeletons", post(upload_skeleton))
            .route("/api/infer", post(create_job))
            .route("/api/jobs/{job_id}", get(job_status))
            .route("/api/jobs/{job_id}/results", get(job_results))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend serve");
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    /// Queue the job id the next `POST /api/infer` will hand out.
    pub fn queue_job_id(&self, job_id: &str) {
        self.lock().job_ids.push(job_id.to_string());
    }

    pub fn fail_next_create(&self, count: u32) {
        self.lock().create_failures = count;
    }

    pub fn script_statuses(&self, job_id: &str, steps: Vec<StatusStep>) {
        self.lock().statuses.insert(job_id.to_string(), steps);
    }

    pub fn set_results(&self, job_id: &str, results: Value) {
        self.lock().results.insert(job_id.to_string(), results);
    }

    pub fn fail_next_results(&self, count: u32) {
        self.lock().results_failures = count;
    }

    pub fn status_hits(&self, job_id: &str) -> u64 {
        self.lock().status_hits.get(job_id).copied().unwrap_or(0)
    }

    pub fn created_requests(&self) -> Vec<Value> {
        self.lock().created.clone()
    }

    pub fn skeleton_uploads(&self) -> Vec<Value> {
        self.lock().skeleton_uploads.clone()
    }
}

// ── Canned wire payloads ────────────────────────────────────────────────

pub fn pending(progress: f64) -> Value {
    json!({"status": "pending", "progress": progress, "message": "En cola...", "error": null})
}

pub fn processing(progress: f64, message: &str) -> Value {
    json!({"status": "processing", "progress": progress, "message": message, "error": null})
}

pub fn completed() -> Value {
    json!({"status": "completed", "progress": 100.0, "message": "Análisis completado", "error": null})
}

pub fn failed(error: &str) -> Value {
    json!({
        "status": "failed",
        "progress": 0.0,
        "message": format!("Error: {error}"),
        "error": error,
    })
}

pub fn results(
    job_id: &str,
    input_id: &str,
    input_type: &str,
    behavior_id: &str,
    pred: u8,
    confidence: f64,
    rubric_text: &str,
) -> Value {
    json!({
        "job_id": job_id,
        "input_id": input_id,
        "input_type": input_type,
        "behavior_id": behavior_id,
        "prediction": {
            "behavior_id": behavior_id,
            "pred": pred,
            "confidence": confidence,
            "rubric_text": rubric_text,
            "rubric_text_es": "",
        },
        "metadata": {
            "model_version": "dummy-v1.0",
            "input_hash": "0011223344556677",
            "processed_at": "2026-08-06T12:00:00Z",
        },
    })
}

// ── Handlers ────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    let ids = ["A01", "A02", "A03", "A04", "B01", "B02", "B03", "B04", "C01", "C02", "C03", "C04"];
    Json(json!({
        "status": "healthy",
        "timestamp": "2026-08-06T12:00:00Z",
        "model_available": false,
        "dummy_mode": true,
        "behaviors_count": ids.len(),
        "behaviors": ids,
    }))
}

async fn behaviors() -> Json<Value> {
    let ids = ["A01", "A02", "A03", "A04", "B01", "B02", "B03", "B04", "C01", "C02", "C03", "C04"];
    Json(json!({"behaviors": {}, "count": ids.len(), "ids": ids}))
}

async fn upload_video() -> Json<Value> {
    Json(json!({
        "video_id": "vid-1",
        "stored_path": "/uploads/vid-1.mp4",
        "duration": 30.0,
        "fps": 30.0,
    }))
}

async fn upload_skeleton(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().expect("mock state lock").skeleton_uploads.push(body);
    Json(json!({
        "skeleton_id": "skel-1",
        "stored_path": "/skeletons/skel-1.json",
        "frame_count": 120,
        "fps": 30.0,
    }))
}

async fn create_job(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("mock state lock");
    state.created.push(body);
    if state.create_failures > 0 {
        state.create_failures -= 1;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "inference backend unavailable"})),
        )
            .into_response();
    }
    let job_id = if state.next_job < state.job_ids.len() {
        state.job_ids[state.next_job].clone()
    } else {
        format!("job-{}", state.next_job + 1)
    };
    state.next_job += 1;
    Json(json!({"job_id": job_id})).into_response()
}

async fn job_status(State(state): State<Shared>, Path(job_id): Path<String>) -> Response {
    let step = {
        let mut state = state.lock().expect("mock state lock");
        *state.status_hits.entry(job_id.clone()).or_insert(0) += 1;
        let steps = match state.statuses.get(&job_id) {
            Some(steps) if !steps.is_empty() => steps.clone(),
            _ => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({"detail": "Job not found"})),
                )
                    .into_response();
            }
        };
        let cursor = state.status_cursor.entry(job_id.clone()).or_insert(0);
        let index = (*cursor).min(steps.len() - 1);
        *cursor += 1;
        steps[index].clone()
    };

    match step {
        StatusStep::Reply(body) => Json(body).into_response(),
        StatusStep::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "transient backend error"})),
        )
            .into_response(),
        StatusStep::Delayed(delay, body) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
    }
}

async fn job_results(State(state): State<Shared>, Path(job_id): Path<String>) -> Response {
    let mut state = state.lock().expect("mock state lock");
    if state.results_failures > 0 {
        state.results_failures -= 1;
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "results unavailable"})),
        )
            .into_response();
    }
    match state.results.get(&job_id) {
        Some(results) => Json(results.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Results not found"})),
        )
            .into_response(),
    }
}
