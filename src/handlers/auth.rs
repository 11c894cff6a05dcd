use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::fs;
use tower_sessions::Session;

use crate::config::Config;
use crate::llm::ModelClient;
use crate::models::{LoginForm, RegisterForm};
use crate::services::UserStore;

pub async fn serve_login_page() -> impl IntoResponse {
    let login_html = fs::read_to_string("templates/login.html")
        .unwrap_or_else(|_| "Error loading login page".to_string());
    Html(login_html)
}

#[axum::debug_handler]
pub async fn handle_login(
    State((user_store, _, _)): State<(UserStore, ModelClient, Config)>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> Response {
    println!("Login attempt for user: {}", login_form.username);

    match user_store
        .authenticate(&login_form.username, &login_form.password)
        .await
    {
        Ok(user) => {
            println!("Password verified for user: {}", user.username);
            if let Err(e) = session.insert("user_session", user.username).await {
                println!("Session error: {}", e);
                return Redirect::to("/?error=Server%20error").into_response();
            }
            Redirect::to("/review").into_response()
        }
        Err(e) if e.is_user_error() => {
            println!("Login rejected for user {}: {}", login_form.username, e);
            Redirect::to(&format!("/?error={}", urlencoding::encode(&e.to_string())))
                .into_response()
        }
        Err(e) => {
            eprintln!("Store error: {}", e);
            Redirect::to("/?error=Server%20error").into_response()
        }
    }
}

pub async fn handle_register(
    State((user_store, _, _)): State<(UserStore, ModelClient, Config)>,
    Form(register_form): Form<RegisterForm>,
) -> Response {
    match user_store
        .signup(
            &register_form.username,
            &register_form.password,
            &register_form.confirm_password,
        )
        .await
    {
        Ok(user) => {
            println!("Created account for user: {}", user.username);
            // Only successful registration returns to the login form
            Redirect::to("/?error=Registration%20successful!%20Please%20login").into_response()
        }
        Err(e) if e.is_user_error() => Redirect::to(&format!(
            "/?error={}&form=register",
            urlencoding::encode(&e.to_string())
        ))
        .into_response(),
        Err(e) => {
            eprintln!("Failed to save user: {}", e);
            Redirect::to("/?error=Registration%20failed&form=register").into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn handle_logout(session: Session) -> Response {
    // Drops the user identity together with the session-held API key
    // and chat history.
    if let Err(e) = session.flush().await {
        println!("Session flush error: {}", e);
    }
    Redirect::to("/").into_response()
}
