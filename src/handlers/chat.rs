use axum::{
    extract::{Form, State},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tower_sessions::Session;

use super::review::{resolve_api_key, session_user};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::llm::{self, ChatMessage, ModelClient, CHAT_SAMPLING};
use crate::models::ChatForm;
use crate::services::UserStore;

const CHAT_HISTORY_KEY: &str = "chat_history";

/// One assistant turn. History lives in the session and is replayed
/// into every completion call, oldest messages dropped past the cap.
#[axum::debug_handler]
pub async fn handle_chat(
    State((_, model, config)): State<(UserStore, ModelClient, Config)>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;

    let message = form.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::BadInput("Please enter a question".into()));
    }

    let api_key = resolve_api_key(&session, &config).await?;

    let mut history: Vec<ChatMessage> = session
        .get(CHAT_HISTORY_KEY)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?
        .unwrap_or_default();

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(llm::chat_system_prompt()));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(message.clone()));

    let reply = model.complete(&api_key, &messages, CHAT_SAMPLING).await?;

    history.push(ChatMessage::user(message));
    history.push(ChatMessage::assistant(reply.clone()));
    let cap = config.chat.max_history_messages;
    if history.len() > cap {
        history.drain(..history.len() - cap);
    }

    session
        .insert(CHAT_HISTORY_KEY, &history)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;

    tracing::debug!(
        "Chat turn for user {} ({} message(s) retained)",
        username,
        history.len()
    );

    Ok(Json(json!({ "reply": reply })).into_response())
}
