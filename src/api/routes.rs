use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
    extract::{Form, State},
    response::{Html, IntoResponse},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::analyzer::AnalysisResult;
use crate::api::models::AnalyzeForm;
use crate::api::response;
use crate::call_log::LogEntry;
use crate::error::{AppError, Result};
use crate::AppState;

pub const EMPTY_TRANSCRIPT_MESSAGE: &str = "Please provide a transcript.";
pub const NOT_CONFIGURED_MESSAGE: &str = "Groq client is not configured. Please check your API key.";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_handler() -> Html<String> {
    response::index(None)
}

async fn analyze_handler(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> impl IntoResponse {
    let transcript = form.trimmed();

    match process_analyze_request(&state, transcript).await {
        Ok(analysis) => response::result(transcript, &analysis),
        Err(err) => {
            let message = match &err {
                AppError::ValidationError(msg) => msg.clone(),
                AppError::ConnectionError => NOT_CONFIGURED_MESSAGE.to_string(),
                other => {
                    error!("An unexpected error occurred: {}", other);
                    format!("An error occurred during analysis: {}", other)
                }
            };
            response::error(err.status(), &message)
        }
    }
}

/// Validates, analyzes and logs one transcript. Nothing is logged unless analysis returned.
async fn process_analyze_request(state: &AppState, transcript: &str) -> Result<AnalysisResult> {
    if transcript.is_empty() {
        return Err(AppError::ValidationError(EMPTY_TRANSCRIPT_MESSAGE.to_string()));
    }

    if !state.analyzer.is_configured() {
        return Err(AppError::ConnectionError);
    }

    let start_time = std::time::Instant::now();
    let outcome = state.analyzer.analyze(transcript).await?;
    let parse_failed = outcome.is_parse_failure();
    let analysis = outcome.into_result();

    info!(
        sentiment = %analysis.sentiment,
        parse_failed,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Analyzed transcript"
    );

    // Blocking file I/O runs off the async workers.
    let call_log = Arc::clone(&state.call_log);
    let entry = LogEntry::new(transcript, &analysis);
    tokio::task::spawn_blocking(move || call_log.append(&entry))
        .await
        .map_err(|e| AppError::LogError(std::io::Error::other(format!("log writer task failed: {e}"))))??;

    Ok(analysis)
}
