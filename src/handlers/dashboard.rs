use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

use super::review::session_user;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::llm::ModelClient;
use crate::services::UserStore;

pub async fn serve_user_dashboard(
    State((user_store, model, _)): State<(UserStore, ModelClient, Config)>,
    session: Session,
) -> AppResult<Response> {
    tracing::info!("Accessing user dashboard");

    let username = session_user(&session).await?;
    let user = user_store
        .get(&username)
        .await
        .ok_or_else(|| AppError::Auth("User not found".into()))?;

    let dashboard_html = std::fs::read_to_string("templates/user_dashboard.html")
        .map_err(|e| {
            tracing::error!("Failed to read dashboard template: {}", e);
            AppError::File(e)
        })?;

    let dashboard_html = dashboard_html
        .replace("{{username}}", &user.username)
        .replace(
            "{{member_since}}",
            &user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .replace("{{analyses_count}}", &user.analyses_count.to_string())
        .replace("{{model}}", model.model_id());

    tracing::info!("Successfully rendered dashboard for user: {}", username);
    Ok(Html(dashboard_html).into_response())
}
