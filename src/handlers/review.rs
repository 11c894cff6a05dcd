use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::json;
use std::fs;
use tower_sessions::Session;

use crate::config::Config;
use crate::errors::{AppError, AppResult, ModelError};
use crate::llm::{self, ChatMessage, ModelClient, REVIEW_SAMPLING};
use crate::models::{AnalyzeForm, ApiKeyForm, ExecutionOutcome, ReviewReport, RunForm};
use crate::runner;
use crate::services::UserStore;

pub async fn serve_review_page(session: Session) -> AppResult<Response> {
    tracing::info!("Serving review page");

    let username = session_user(&session).await?;
    let template = fs::read_to_string("templates/review.html").map_err(|e| {
        tracing::error!("Failed to read review template: {}", e);
        AppError::File(e)
    })?;

    Ok(Html(template.replace("{{username}}", &username)).into_response())
}

#[axum::debug_handler]
pub async fn set_api_key(
    session: Session,
    Form(form): Form<ApiKeyForm>,
) -> AppResult<Response> {
    let api_key = form.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(AppError::BadInput("Please enter a valid API key".into()));
    }

    session
        .insert("api_key", api_key)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;

    tracing::info!("API key configured for this session");
    Ok(Json(json!({ "message": "API key configured successfully" })).into_response())
}

#[axum::debug_handler]
pub async fn handle_analyze(
    State((user_store, model, config)): State<(UserStore, ModelClient, Config)>,
    session: Session,
    Form(form): Form<AnalyzeForm>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let report = analyze_code(&user_store, &model, &config, &session, &username, &form).await?;
    Ok(Json(review_payload(&report)).into_response())
}

#[axum::debug_handler]
pub async fn handle_run(
    State((_, _, config)): State<(UserStore, ModelClient, Config)>,
    Form(form): Form<RunForm>,
) -> AppResult<Response> {
    tracing::debug!("Running {} code snippet", form.language);

    let outcome = runner::run_code(&form.code, form.language, &config.runner)
        .await
        .map_err(AppError::File)?;

    Ok(Json(run_payload(&outcome)).into_response())
}

// Analysis first, then execution, matching the combined button in the UI.
#[axum::debug_handler]
pub async fn handle_analyze_and_run(
    State((user_store, model, config)): State<(UserStore, ModelClient, Config)>,
    session: Session,
    Form(form): Form<AnalyzeForm>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let report = analyze_code(&user_store, &model, &config, &session, &username, &form).await?;
    let outcome = runner::run_code(&form.code, form.language, &config.runner)
        .await
        .map_err(AppError::File)?;

    Ok(Json(json!({
        "review": review_payload(&report),
        "execution": run_payload(&outcome),
    }))
    .into_response())
}

// Shared analysis path: prompt -> model -> parse -> usage counter. The
// counter is bumped exactly once, after the reply has been parsed.
async fn analyze_code(
    user_store: &UserStore,
    model: &ModelClient,
    config: &Config,
    session: &Session,
    username: &str,
    form: &AnalyzeForm,
) -> AppResult<ReviewReport> {
    if form.code.trim().is_empty() {
        return Err(AppError::BadInput("Please enter code to analyze".into()));
    }

    let api_key = resolve_api_key(session, config).await?;
    let prompt = llm::build_review_prompt(
        &form.code,
        form.language,
        form.workflow,
        &form.custom_instructions,
    );
    let messages = [
        ChatMessage::system(prompt.system),
        ChatMessage::user(prompt.user),
    ];

    let reply = model.complete(&api_key, &messages, REVIEW_SAMPLING).await?;
    let report = llm::parse_review(&reply);

    let count = user_store.record_analysis(username).await?;
    tracing::info!(
        "Analysis #{} for user {} ({:?})",
        count,
        username,
        report.status
    );

    Ok(report)
}

fn review_payload(report: &ReviewReport) -> serde_json::Value {
    json!({
        "analysis": report.raw_text,
        "status": report.status,
        "status_headline": report.status.headline(),
        "corrected_code": report.corrected_code.display_or("No corrections needed"),
        "corrections_available": report.corrected_code.is_parsed(),
        "time_complexity": report.time_complexity.display_or("Not analyzed"),
        "space_complexity": report.space_complexity.display_or("Not analyzed"),
        "summary": report.summary,
        "completed_at": report.completed_at,
    })
}

fn run_payload(outcome: &ExecutionOutcome) -> serde_json::Value {
    json!({
        "outcome": outcome,
        "display": outcome.display(),
    })
}

// The session's key wins; the configured fallback key covers
// deployments where the operator provides one for everybody.
pub(super) async fn resolve_api_key(session: &Session, config: &Config) -> AppResult<String> {
    if let Ok(Some(key)) = session.get::<String>("api_key").await {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }

    config
        .model
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(AppError::Model(ModelError::MissingApiKey))
}

pub(super) async fn session_user(session: &Session) -> AppResult<String> {
    session
        .get::<String>("user_session")
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))
}
