//! Inference job lifecycle engine.
//!
//! Drives one inference job at a time from creation to a terminal outcome:
//! submits the job, polls its status on a fixed interval, fetches and
//! translates results on completion, and publishes `{job, prediction,
//! error}` snapshots over a watch channel for consumers to render.
//!
//! Correctness rules the engine enforces:
//! - at most one poll task exists per engine instance at any time;
//! - status checks for a job are strictly sequential (each tick awaits the
//!   previous request; missed ticks are skipped, not queued);
//! - every in-flight response carries the generation that issued it and is
//!   discarded if `start`/`reset` has since advanced the counter, so a late
//!   response from a retired job can never touch a newer job's state;
//! - terminal statuses are sticky: once a job is completed or failed, no
//!   later snapshot may move it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::models::job::{InputReference, Job, JobStatus};
use crate::models::prediction::Prediction;
use crate::services::backend::{BackendClient, BackendError};
use crate::services::translator;

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Externally observable engine state.
///
/// Always internally consistent: `prediction` is only set while the job is
/// completed; `error` is only set for a failed job, a results fetch that
/// failed after completion, or a creation failure (in which case `job` is
/// `None`).
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub job: Option<Job>,
    pub prediction: Option<Prediction>,
    pub error: Option<String>,
}

impl EngineState {
    /// True once the lifecycle has nothing further to produce: the job
    /// failed, completed with its results resolved (prediction or fetch
    /// error), or creation itself failed.
    pub fn is_settled(&self) -> bool {
        match &self.job {
            Some(job) => match job.status {
                JobStatus::Failed => true,
                JobStatus::Completed => self.prediction.is_some() || self.error.is_some(),
                _ => false,
            },
            None => self.error.is_some(),
        }
    }
}

/// Outcome of applying a guarded state mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    /// The mutation ran against current state.
    Ok,
    /// Generation still current but the mutation declined (no live job, or
    /// the job is already terminal).
    Rejected,
    /// The generation has advanced; the caller's job is retired.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollOutcome {
    /// Keep polling.
    Continue,
    /// Terminal status handled; stop the timer.
    Done,
    /// A newer job owns the engine; stop without touching state.
    Superseded,
}

struct EngineInner {
    generation: u64,
    poll_task: Option<JoinHandle<()>>,
}

struct EngineShared {
    state_tx: watch::Sender<EngineState>,
    inner: Mutex<EngineInner>,
}

impl EngineShared {
    /// Retire whatever job is live: bump the generation, abort the poll
    /// task, clear the published state. Returns the new generation.
    fn retire_current(&self) -> u64 {
        let mut inner = self.inner.lock().expect("engine lock poisoned");
        inner.generation += 1;
        if let Some(task) = inner.poll_task.take() {
            task.abort();
        }
        self.state_tx.send_replace(EngineState::default());
        inner.generation
    }

    /// Run a state mutation only if `generation` is still current. The
    /// closure returns whether it accepted the mutation.
    fn update_if_current<F>(&self, generation: u64, mutate: F) -> Applied
    where
        F: FnOnce(&mut EngineState) -> bool,
    {
        let inner = self.inner.lock().expect("engine lock poisoned");
        if inner.generation != generation {
            return Applied::Stale;
        }
        let mut accepted = false;
        self.state_tx.send_modify(|state| accepted = mutate(state));
        drop(inner);
        if accepted {
            Applied::Ok
        } else {
            Applied::Rejected
        }
    }

    /// Install the poll task for `generation`, unless it has already been
    /// superseded. Any previously installed task is aborted, keeping the
    /// one-task invariant structural.
    fn install_task(&self, generation: u64, task: JoinHandle<()>) {
        let mut inner = self.inner.lock().expect("engine lock poisoned");
        if inner.generation != generation {
            task.abort();
            return;
        }
        if let Some(previous) = inner.poll_task.replace(task) {
            previous.abort();
        }
    }

    fn is_polling(&self) -> bool {
        let inner = self.inner.lock().expect("engine lock poisoned");
        inner.poll_task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

/// Drives a single live inference job against the backend.
///
/// Consumers issue `start` and `reset`; everything else is observation
/// through [`InferenceEngine::subscribe`] / [`InferenceEngine::state`].
pub struct InferenceEngine {
    client: Arc<BackendClient>,
    poll_interval: Duration,
    shared: Arc<EngineShared>,
}

impl InferenceEngine {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self::with_poll_interval(client, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(client: Arc<BackendClient>, poll_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(EngineState::default());
        Self {
            client,
            poll_interval,
            shared: Arc::new(EngineShared {
                state_tx,
                inner: Mutex::new(EngineInner {
                    generation: 0,
                    poll_task: None,
                }),
            }),
        }
    }

    /// Submit a new inference job, retiring any previous one.
    ///
    /// On creation failure the error is published with `job = None` and the
    /// engine is idle again. On success the returned job id is already
    /// being polled; one status check runs before the repeating timer
    /// starts, so a job that finishes immediately is still observed.
    pub async fn start(
        &self,
        input: InputReference,
        behavior_id: &str,
    ) -> Result<String, BackendError> {
        let run_id = Uuid::new_v4();
        let generation = self.shared.retire_current();
        metrics::counter!("inference_jobs_submitted").increment(1);
        tracing::info!(
            %run_id,
            input_id = %input.id,
            input_type = %input.kind,
            behavior_id,
            "submitting inference job"
        );

        let job_id = match self.client.create_job(&input, behavior_id).await {
            Ok(job_id) => job_id,
            Err(e) => {
                tracing::warn!(%run_id, error = %e, "job creation failed");
                let message = e.to_string();
                self.shared.update_if_current(generation, move |state| {
                    state.error = Some(message);
                    true
                });
                return Err(e);
            }
        };
        tracing::info!(%run_id, job_id = %job_id, "inference job created");

        let job = Job::new(job_id.clone(), &input, behavior_id);
        let installed = self.shared.update_if_current(generation, move |state| {
            *state = EngineState {
                job: Some(job),
                prediction: None,
                error: None,
            };
            true
        });
        if installed == Applied::Stale {
            // Superseded while the create call was in flight. The backend
            // job runs on, orphaned; nobody polls it.
            return Ok(job_id);
        }

        let outcome = poll_once(&self.client, &self.shared, generation, &job_id).await;
        if outcome == PollOutcome::Continue {
            let task = tokio::spawn(poll_loop(
                Arc::clone(&self.client),
                Arc::clone(&self.shared),
                generation,
                job_id.clone(),
                self.poll_interval,
            ));
            self.shared.install_task(generation, task);
        }
        Ok(job_id)
    }

    /// Stop polling and clear `{job, prediction, error}`. Safe to call from
    /// any state, repeatedly, and during teardown.
    pub fn reset(&self) {
        self.shared.retire_current();
    }

    /// Subscribe to state snapshots. The receiver always holds the latest
    /// published value.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.shared.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> EngineState {
        self.shared.state_tx.borrow().clone()
    }

    /// Whether a poll task is currently live.
    pub fn is_polling(&self) -> bool {
        self.shared.is_polling()
    }
}

impl Drop for InferenceEngine {
    fn drop(&mut self) {
        // Teardown stops the timer unconditionally; a response landing
        // afterwards has no listener and must not run.
        if let Ok(mut inner) = self.shared.inner.lock() {
            if let Some(task) = inner.poll_task.take() {
                task.abort();
            }
        }
    }
}

/// Repeating poll driver for one job. Ends when the job reaches a terminal
/// status or the generation is superseded; `start`/`reset` abort it early.
async fn poll_loop(
    client: Arc<BackendClient>,
    shared: Arc<EngineShared>,
    generation: u64,
    job_id: String,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    // A slow in-flight request must not cause a burst of catch-up polls:
    // ticks are advisory snapshots, so late ones are dropped.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately and the initial check already
    // ran inside start(); consume it so polling begins one interval out.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match poll_once(&client, &shared, generation, &job_id).await {
            PollOutcome::Continue => {}
            PollOutcome::Done | PollOutcome::Superseded => break,
        }
    }
}

/// One status check: fetch, validate, merge, and handle terminal states.
async fn poll_once(
    client: &BackendClient,
    shared: &EngineShared,
    generation: u64,
    job_id: &str,
) -> PollOutcome {
    let payload = match client.get_status(job_id).await {
        Ok(payload) => payload,
        Err(e) => {
            // A single failed status fetch is not an event: skip the tick
            // and let the interval keep running.
            tracing::debug!(job_id, error = %e, "status poll failed, skipping tick");
            metrics::counter!("inference_poll_ticks_skipped").increment(1);
            return PollOutcome::Continue;
        }
    };

    let Some(status) = payload.parsed_status() else {
        tracing::warn!(job_id, status = %payload.status, "backend reported unrecognized status");
        return PollOutcome::Continue;
    };

    let merged = shared.update_if_current(generation, |state| {
        let Some(job) = state.job.as_mut() else {
            return false;
        };
        if job.status.is_terminal() {
            return false;
        }
        job.merge_status(status, &payload);
        true
    });
    match merged {
        Applied::Stale => return PollOutcome::Superseded,
        Applied::Rejected => return PollOutcome::Done,
        Applied::Ok => {}
    }

    match status {
        JobStatus::Pending | JobStatus::Processing => PollOutcome::Continue,
        JobStatus::Completed => {
            match client.get_results(job_id).await {
                Ok(raw) => {
                    let prediction = translator::translate(&raw);
                    let applied = shared.update_if_current(generation, move |state| {
                        state.prediction = Some(prediction);
                        state.error = None;
                        true
                    });
                    if applied == Applied::Ok {
                        metrics::counter!("inference_jobs_completed").increment(1);
                        tracing::info!(job_id, "inference job completed");
                    }
                }
                Err(e) => {
                    // The job itself succeeded; only the artifact fetch
                    // failed. The job record stays completed.
                    tracing::warn!(job_id, error = %e, "failed to fetch results for completed job");
                    let message = e.to_string();
                    shared.update_if_current(generation, move |state| {
                        state.error = Some(message);
                        true
                    });
                }
            }
            PollOutcome::Done
        }
        JobStatus::Failed => {
            let message = payload
                .error
                .clone()
                .unwrap_or_else(|| "inference job failed".to_string());
            tracing::warn!(job_id, error = %message, "inference job failed");
            let applied = shared.update_if_current(generation, move |state| {
                state.error = Some(message);
                true
            });
            if applied == Applied::Ok {
                metrics::counter!("inference_jobs_failed").increment(1);
            }
            PollOutcome::Done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> Arc<BackendClient> {
        // Reserved port that nothing listens on; connection attempts fail
        // fast enough for tests.
        Arc::new(BackendClient::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap())
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let engine = InferenceEngine::new(unreachable_client());
        engine.reset();
        engine.reset();
        let state = engine.state();
        assert!(state.job.is_none());
        assert!(state.prediction.is_none());
        assert!(state.error.is_none());
        assert!(!engine.is_polling());
    }

    #[tokio::test]
    async fn test_creation_failure_publishes_error_and_stays_idle() {
        let engine = InferenceEngine::new(unreachable_client());
        let result = engine.start(InputReference::video("vid-1"), "A01").await;
        assert!(result.is_err());

        let state = engine.state();
        assert!(state.job.is_none());
        assert!(state.prediction.is_none());
        assert!(state.error.is_some());
        assert!(!engine.is_polling());
    }

    #[test]
    fn test_settled_states() {
        let mut state = EngineState::default();
        assert!(!state.is_settled());

        state.error = Some("creation failed".to_string());
        assert!(state.is_settled());

        let input = InputReference::video("vid-1");
        let mut with_job = EngineState {
            job: Some(Job::new("job-1", &input, "A01")),
            prediction: None,
            error: None,
        };
        assert!(!with_job.is_settled());

        with_job.job.as_mut().unwrap().status = JobStatus::Failed;
        assert!(with_job.is_settled());
    }
}
