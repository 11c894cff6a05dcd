mod auth;
mod chat;
mod dashboard;
mod review;

pub use auth::{handle_login, handle_logout, handle_register, serve_login_page};
pub use chat::handle_chat;
pub use dashboard::serve_user_dashboard;
pub use review::{
    handle_analyze, handle_analyze_and_run, handle_run, serve_review_page, set_api_key,
};
