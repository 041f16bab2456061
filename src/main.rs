use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use garde::Validate;
use tracing_subscriber::EnvFilter;

use tgmd_assess::config::AppConfig;
use tgmd_assess::models::{InputReference, SkeletonUploadRequest};
use tgmd_assess::services::backend::BackendClient;
use tgmd_assess::services::engine::{EngineState, InferenceEngine};
use tgmd_assess::services::rubric;

/// Submit a motor-skill recording for grading and wait for the result.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input artifact: a video file or a skeleton JSON file
    #[arg(value_name = "INPUT", required_unless_present = "list_behaviors")]
    input: Option<PathBuf>,

    /// Behavior code to grade (A01..A04, B01..B04, C01..C04)
    #[arg(long, value_name = "CODE", required_unless_present = "list_behaviors")]
    behavior: Option<String>,

    /// Treat the input as skeleton JSON even without a .json extension
    #[arg(long)]
    skeleton: bool,

    /// List the twelve behavior codes and exit
    #[arg(long)]
    list_behaviors: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Structured logging on stderr; progress and results go to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_behaviors {
        println!("Known behaviors:");
        for behavior in rubric::BEHAVIORS {
            println!("  {}  {} ({})", behavior.id, behavior.name, behavior.name_es);
        }
        return ExitCode::SUCCESS;
    }

    let input_path = args.input.expect("clap enforces INPUT");
    let behavior_id = args.behavior.expect("clap enforces --behavior");

    if !rubric::is_known_behavior(&behavior_id) {
        eprintln!(
            "Unknown behavior code '{}'. Use --list-behaviors to see the valid codes.",
            behavior_id
        );
        return ExitCode::FAILURE;
    }

    let config = AppConfig::from_env().expect("failed to load configuration from environment");
    let client = Arc::new(
        BackendClient::new(&config.backend_url, config.request_timeout())
            .expect("failed to initialize backend client"),
    );

    match client.health().await {
        Ok(health) => tracing::info!(
            status = %health.status,
            model_available = health.model_available,
            dummy_mode = health.dummy_mode,
            "backend reachable"
        ),
        Err(e) => {
            eprintln!("Backend at {} is not reachable: {}", config.backend_url, e);
            return ExitCode::FAILURE;
        }
    }

    let input = match upload_input(&client, &input_path, args.skeleton).await {
        Ok(reference) => reference,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let engine = InferenceEngine::with_poll_interval(Arc::clone(&client), config.poll_interval());
    let mut updates = engine.subscribe();

    if let Err(e) = engine.start(input, &behavior_id).await {
        eprintln!("Failed to start inference job: {e}");
        return ExitCode::FAILURE;
    }

    // Render progress lines until the lifecycle settles.
    let mut last_line = String::new();
    loop {
        let state = updates.borrow_and_update().clone();
        if let Some(job) = &state.job {
            let line = format!("[{:>3.0}%] {}", job.progress, job.message);
            if !job.message.is_empty() && line != last_line {
                println!("{line}");
                last_line = line;
            }
        }
        if state.is_settled() {
            return render_outcome(&state);
        }
        if updates.changed().await.is_err() {
            return ExitCode::FAILURE;
        }
    }
}

/// Upload the artifact and return its backend-assigned reference.
async fn upload_input(
    client: &BackendClient,
    path: &Path,
    force_skeleton: bool,
) -> Result<InputReference, String> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("invalid input path: {}", path.display()))?
        .to_string();

    let is_skeleton = force_skeleton
        || path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_skeleton {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?;

        let request = SkeletonUploadRequest { filename, data };
        request
            .validate()
            .map_err(|e| format!("invalid skeleton upload: {e}"))?;

        let upload = client
            .upload_skeleton(&request)
            .await
            .map_err(|e| format!("skeleton upload failed: {e}"))?;
        tracing::info!(
            skeleton_id = %upload.skeleton_id,
            frame_count = upload.frame_count,
            "skeleton uploaded"
        );
        Ok(upload.reference())
    } else {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let upload = client
            .upload_video(&filename, bytes)
            .await
            .map_err(|e| format!("video upload failed: {e}"))?;
        tracing::info!(
            video_id = %upload.video_id,
            duration = upload.duration,
            fps = upload.fps,
            "video uploaded"
        );
        Ok(upload.reference())
    }
}

/// Print the final grade or error and pick the exit code.
fn render_outcome(state: &EngineState) -> ExitCode {
    if let Some(prediction) = &state.prediction {
        let name = rubric::find_behavior(&prediction.behavior_id)
            .map(|behavior| behavior.name)
            .unwrap_or("unknown behavior");
        println!();
        println!("Behavior:   {} ({})", prediction.behavior_id, name);
        println!("Score:      {} / 2", prediction.pred);
        println!("Confidence: {:.1}%", prediction.confidence * 100.0);
        if !prediction.rubric_text.is_empty() {
            println!("Rubric:     {}", prediction.rubric_text);
        }
        if !prediction.rubric_text_es.is_empty() {
            println!("Rúbrica:    {}", prediction.rubric_text_es);
        }
        ExitCode::SUCCESS
    } else {
        let message = state
            .error
            .as_deref()
            .unwrap_or("inference did not produce a result");
        eprintln!("Inference failed: {message}");
        ExitCode::FAILURE
    }
}
